//! Per-template failures and fatal configuration errors.

use predicates::prelude::*;

use super::common::codegen;
use codegen_cli::test_utils::TestProject;

#[test]
fn test_broken_template_does_not_stop_valid_one() {
    let project = TestProject::builder()
        .with_config(
            "templates:\n  - name: broken\n    renderPath: broken.rs\n  - name: valid\n    renderPath: valid.rs\n",
        )
        .with_model("name: App\n")
        .with_template("broken", "{% if name %}never closed\n")
        .with_template("valid", "pub struct {{ name }};\n")
        .build()
        .unwrap();

    codegen(&project)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("1 rendered, 0 up to date, 1 failed"))
        .stderr(predicate::str::contains("Template 'broken' failed to compile"));

    assert!(!project.file_exists("broken.rs"));
    assert!(project.read_file("valid.rs").unwrap().contains("pub struct App;"));
}

#[test]
fn test_missing_variable_is_reported_per_template() {
    let project = TestProject::builder()
        .with_config("templates:\n  - name: main\n    renderPath: main.rs\n")
        .with_model("name: App\n")
        .with_template("main", "{{ nmae }}\n")
        .build()
        .unwrap();

    codegen(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template 'main' failed to render"))
        .stderr(predicate::str::contains("nmae"));
}

#[test]
fn test_missing_template_file_is_reported() {
    let project = TestProject::builder()
        .with_config("templates:\n  - name: ghost\n    renderPath: ghost.rs\n")
        .with_model("name: App\n")
        .build()
        .unwrap();

    codegen(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
    assert!(!project.file_exists("ghost.rs"));
}

#[test]
fn test_unresolvable_model_path_names_segment() {
    let project = TestProject::builder()
        .with_config(
            "templates:\n  - name: entity\n    renderPath: \"{{ name }}.rs\"\n    forModelPaths: [entities.order]\n",
        )
        .with_model("entities:\n  user:\n    name: User\n")
        .with_template("entity", "x")
        .build()
        .unwrap();

    codegen(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Cannot resolve path element 'order' in path 'entities.order'",
        ));
}

#[test]
fn test_missing_templates_property_is_fatal() {
    let project = TestProject::builder()
        .with_config("prettyPrint: true\n")
        .with_model("name: App\n")
        .build()
        .unwrap();

    codegen(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("You must define a 'templates' property"))
        .stdout(predicate::str::contains("rendered").not());
}

#[test]
fn test_missing_config_file_is_fatal() {
    let project = TestProject::builder().build().unwrap();

    codegen(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("codegen.yaml"));
}

#[test]
fn test_missing_model_file_is_fatal() {
    let project = TestProject::builder()
        .with_config("templates:\n  - name: main\n    renderPath: main.rs\n")
        .with_template("main", "x")
        .build()
        .unwrap();

    codegen(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("codegen_model.yaml"));
    assert!(!project.file_exists("main.rs"));
}

#[test]
fn test_invalid_extension_order_is_fatal() {
    let project = TestProject::builder()
        .with_config(
            "extensions: [sections, banner]\ntemplates:\n  - name: main\n    renderPath: main.rs\n",
        )
        .with_model("name: App\n")
        .with_template("main", "x")
        .build()
        .unwrap();

    codegen(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be the last stage"));
}
