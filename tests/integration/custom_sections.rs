//! Hand-written custom sections surviving regeneration.

use predicates::prelude::*;
use std::time::SystemTime;

use super::common::{codegen, entity_project};
use codegen_cli::test_utils::set_mtime;

const EMPTY_SECTION: &str = "    // [[@ section user-impl @]]\n    // [[@ end @]]";
const FILLED_SECTION: &str = "    // [[@ section user-impl @]]\n    pub fn is_admin(&self) -> bool {\n        self.email.ends_with(\"@example.com\")\n    }\n    // [[@ end @]]";

#[test]
fn test_custom_section_survives_template_change() {
    let project = entity_project();
    codegen(&project).assert().success();

    let edited = project.read_file("src/model/user.rs").unwrap().replace(EMPTY_SECTION, FILLED_SECTION);
    project.write_file("src/model/user.rs", &edited).unwrap();

    // Change the template outside the section and make it newer than the output
    let template = super::common::ENTITY_TEMPLATE.replace("pub struct", "#[derive(Debug)]\npub struct");
    project.write_template("entity", &template).unwrap();
    set_mtime(&project.template_path("entity"), SystemTime::now());

    codegen(&project).assert().success();

    let user = project.read_file("src/model/user.rs").unwrap();
    assert!(user.contains("#[derive(Debug)]\npub struct User"));
    assert!(user.contains(FILLED_SECTION));

    // The other output of the same entry keeps its own (empty) section
    let group = project.read_file("src/model/group.rs").unwrap();
    assert!(group.contains("// [[@ section group-impl @]]\n    // [[@ end @]]"));
}

#[test]
fn test_section_removed_from_template_is_dropped() {
    let project = entity_project();
    codegen(&project).assert().success();

    let edited = project.read_file("src/model/user.rs").unwrap().replace(EMPTY_SECTION, FILLED_SECTION);
    project.write_file("src/model/user.rs", &edited).unwrap();

    project.write_template("entity", "pub struct {{ name }};\n").unwrap();

    codegen(&project).arg("-f").assert().success();

    let user = project.read_file("src/model/user.rs").unwrap();
    assert!(!user.contains("is_admin"));
    assert!(user.ends_with("pub struct User;\n"));
}

#[test]
fn test_new_section_keeps_rendered_content() {
    let project = entity_project();
    codegen(&project).assert().success();

    let template = format!(
        "{}\n// [[@ section extra @]]\n// default {{{{ name }}}}\n// [[@ end @]]\n",
        super::common::ENTITY_TEMPLATE
    );
    project.write_template("entity", &template).unwrap();

    codegen(&project).arg("--force").assert().success().stdout(predicate::str::contains("3 rendered"));

    let user = project.read_file("src/model/user.rs").unwrap();
    assert!(user.contains("// [[@ section extra @]]\n// default User\n// [[@ end @]]"));
}

#[test]
fn test_regenerating_edited_output_twice_is_stable() {
    let project = entity_project();
    codegen(&project).assert().success();

    let edited = project.read_file("src/model/user.rs").unwrap().replace(EMPTY_SECTION, FILLED_SECTION);
    project.write_file("src/model/user.rs", &edited).unwrap();

    codegen(&project).arg("-f").assert().success();
    let once = project.read_file("src/model/user.rs").unwrap();
    codegen(&project).arg("-f").assert().success();
    let twice = project.read_file("src/model/user.rs").unwrap();

    assert_eq!(once, edited);
    assert_eq!(twice, once);
}
