//! Shared helpers for the integration tests

#![allow(dead_code)]

use assert_cmd::Command;
use codegen_cli::test_utils::{TestProject, set_mtime};
use std::path::Path;
use std::time::{Duration, SystemTime};

/// A `codegen` command running inside `project`, without colors or `RUST_LOG`.
pub fn codegen(project: &TestProject) -> Command {
    let mut cmd = Command::cargo_bin("codegen").unwrap();
    cmd.current_dir(&project.root).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Move the modification time of project inputs an hour into the past, so
/// outputs written by a run are strictly newer than them.
pub fn backdate(project: &TestProject, relative_paths: &[&str]) {
    let past = SystemTime::now() - Duration::from_secs(3600);
    for relative in relative_paths {
        set_mtime(&project.path(relative), past);
    }
}

pub fn mtime(path: &Path) -> SystemTime {
    std::fs::metadata(path).unwrap().modified().unwrap()
}

pub const ENTITY_CONFIG: &str = r#"
templates:
  - name: entity
    renderPath: "src/model/{{ name | lower }}.rs"
    forModelPaths: [entities.user, entities.group]
  - name: registry
    renderPath: src/registry.rs
"#;

pub const ENTITY_MODEL: &str = r"
entities:
  user:
    name: User
    fields: [id, email]
  group:
    name: Group
    fields: [id, title]
";

pub const ENTITY_TEMPLATE: &str = "pub struct {{ name }} {
{% for f in fields %}    pub {{ f }}: String,
{% endfor %}}

impl {{ name }} {
    // [[@ section {{ name | lower }}-impl @]]
    // [[@ end @]]
}
";

pub const REGISTRY_TEMPLATE: &str = "pub const ENTITIES: &[&str] = &[{% for key, e in entities %}\"{{ e.name }}\", {% endfor %}];
";

/// A project with one expanding entry (two outputs) and one plain entry.
pub fn entity_project() -> TestProject {
    let project = TestProject::builder()
        .with_config(ENTITY_CONFIG)
        .with_model(ENTITY_MODEL)
        .with_template("entity", ENTITY_TEMPLATE)
        .with_template("registry", REGISTRY_TEMPLATE)
        .build()
        .unwrap();
    backdate(
        &project,
        &["codegen.yaml", "codegen_model.yaml", "codegen_tmpl/entity.tera", "codegen_tmpl/registry.tera"],
    );
    project
}
