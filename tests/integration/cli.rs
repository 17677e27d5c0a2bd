//! Argument handling and template selection.

use predicates::prelude::*;

use super::common::{codegen, entity_project};
use codegen_cli::test_utils::TestProject;

#[test]
fn test_selected_templates_only() {
    let project = entity_project();

    codegen(&project)
        .arg("registry")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 rendered"));

    assert!(project.file_exists("src/registry.rs"));
    assert!(!project.file_exists("src/model/user.rs"));
}

#[test]
fn test_unknown_template_suggests_closest_name() {
    let project = entity_project();

    codegen(&project)
        .arg("registy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown template 'registy'"))
        .stderr(predicate::str::contains("did you mean 'registry'?"));
}

#[test]
fn test_basedir_and_config_flags() {
    let project = TestProject::builder()
        .with_file(
            "conf/gen.yaml",
            "templateDir: tmpl\nmodelFile: data/model.yaml\ntemplates:\n  - name: main\n    renderPath: out/main.rs\n",
        )
        .with_file("data/model.yaml", "name: App\n")
        .with_file("tmpl/main.tera", "fn {{ name }}() {}\n")
        .build()
        .unwrap();

    let mut cmd = assert_cmd::Command::cargo_bin("codegen").unwrap();
    cmd.env("NO_COLOR", "1")
        .arg("--basedir")
        .arg(&project.root)
        .arg("--config")
        .arg(project.path("conf/gen.yaml"))
        .assert()
        .success();

    assert!(project.read_file("out/main.rs").unwrap().contains("fn App() {}"));
}

#[test]
fn test_model_file_and_template_dir_overrides() {
    let project = TestProject::builder()
        .with_config("templates:\n  - name: main\n    renderPath: main.rs\n")
        .with_model("name: FromDefault\n")
        .with_file("alt/model.yaml", "name: FromFlag\n")
        .with_file("alt/tmpl/main.tera", "// alt {{ name }}\n")
        .build()
        .unwrap();

    codegen(&project)
        .args(["-s", "alt/model.yaml", "-t", "alt/tmpl"])
        .assert()
        .success();

    assert!(project.read_file("main.rs").unwrap().contains("// alt FromFlag"));
}

#[test]
fn test_quiet_suppresses_progress() {
    let project = entity_project();

    codegen(&project).arg("--quiet").assert().success().stdout(predicate::str::is_empty());
    assert!(project.file_exists("src/registry.rs"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let project = entity_project();
    codegen(&project).args(["-v", "-q"]).assert().failure();
}
