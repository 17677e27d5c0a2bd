//! Render cycle: first run, up-to-date skips and re-renders.

use predicates::prelude::*;
use std::fs;
use std::time::SystemTime;

use super::common::{backdate, codegen, entity_project, mtime};

#[test]
fn test_first_run_writes_every_output() {
    let project = entity_project();

    codegen(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 rendered, 0 up to date, 0 failed"));

    let user = project.read_file("src/model/user.rs").unwrap();
    assert!(user.starts_with("// GENERATED FILE - DO NOT EDIT OUTSIDE CUSTOM SECTIONS\n"));
    assert!(user.contains("pub struct User {\n    pub id: String,\n    pub email: String,\n}"));
    assert!(user.contains("// [[@ section user-impl @]]\n    // [[@ end @]]"));

    let group = project.read_file("src/model/group.rs").unwrap();
    assert!(group.contains("pub struct Group"));

    let registry = project.read_file("src/registry.rs").unwrap();
    assert!(registry.contains("\"User\""));
    assert!(registry.contains("\"Group\""));
}

#[test]
fn test_second_run_is_idempotent_and_writes_nothing() {
    let project = entity_project();
    codegen(&project).assert().success();

    let output = project.path("src/model/user.rs");
    let before = fs::read(&output).unwrap();
    let modified_before = mtime(&output);

    codegen(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 rendered, 3 up to date, 0 failed"))
        .stdout(predicate::str::contains("Wrote").not());

    assert_eq!(fs::read(&output).unwrap(), before);
    assert_eq!(mtime(&output), modified_before);
}

#[test]
fn test_forced_run_produces_identical_bytes() {
    let project = entity_project();
    codegen(&project).assert().success();
    let first = project.read_file("src/model/group.rs").unwrap();

    codegen(&project)
        .arg("--force")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 rendered"));

    assert_eq!(project.read_file("src/model/group.rs").unwrap(), first);
}

#[test]
fn test_touching_model_rerenders() {
    let project = entity_project();
    codegen(&project).assert().success();

    let model = project.read_file("codegen_model.yaml").unwrap().replace("title", "label");
    project.write_file("codegen_model.yaml", &model).unwrap();
    codegen_cli::test_utils::set_mtime(&project.path("codegen_model.yaml"), SystemTime::now());

    codegen(&project).assert().success().stdout(predicate::str::contains("3 rendered"));

    assert!(project.read_file("src/model/group.rs").unwrap().contains("pub label: String"));
}

#[test]
fn test_touching_template_rerenders_only_its_outputs() {
    let project = entity_project();
    codegen(&project).assert().success();

    project
        .write_template("registry", "pub const COUNT: usize = {{ entities | length }};\n")
        .unwrap();
    codegen(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 rendered, 2 up to date"));

    assert!(project.read_file("src/registry.rs").unwrap().contains("COUNT: usize = 2;"));
}

#[test]
fn test_for_each_renders_one_output_per_element() {
    let project = codegen_cli::test_utils::TestProject::builder()
        .with_config(
            "templates:\n  - name: table\n    renderPath: \"sql/{{ name }}.sql\"\n    forEach: tables\n",
        )
        .with_model("tables:\n  - name: orders\n  - name: items\n")
        .with_template("table", "CREATE TABLE {{ name }} ();\n")
        .build()
        .unwrap();
    backdate(&project, &["codegen_model.yaml", "codegen_tmpl/table.tera"]);

    codegen(&project).assert().success();

    let orders = project.read_file("sql/orders.sql").unwrap();
    assert_eq!(
        orders,
        "-- GENERATED FILE - DO NOT EDIT OUTSIDE CUSTOM SECTIONS\n\
         -- Generated by codegen from template 'table'.\n\
         -- Changes outside custom sections are overwritten on the next run.\n\
         \n\
         CREATE TABLE orders ();\n"
    );
    assert!(project.file_exists("sql/items.sql"));
}
