//! The `--pretty` formatter stage.

use predicates::prelude::*;

use super::common::codegen;
use codegen_cli::test_utils::TestProject;

fn project_with_formatter(command: &str) -> TestProject {
    TestProject::builder()
        .with_config(format!(
            "formatterTimeoutSecs: 5\nformatters:\n  txt: \"{command}\"\n\
             templates:\n  - name: notes\n    renderPath: notes.txt\n"
        ))
        .with_model("title: hello world\n")
        .with_template("notes", "{{ title }}\n[[@ section body @]]\n[[@ end @]]\n")
        .build()
        .unwrap()
}

#[cfg(unix)]
#[test]
fn test_pretty_runs_formatter() {
    let project = project_with_formatter("sed s/hello/HELLO/");

    codegen(&project).arg("--pretty").assert().success();

    assert_eq!(
        project.read_file("notes.txt").unwrap(),
        "HELLO world\n[[@ section body @]]\n[[@ end @]]\n"
    );
}

#[cfg(unix)]
#[test]
fn test_formatter_runs_before_section_merge() {
    let project = project_with_formatter("sed s/hello/HELLO/");
    project
        .write_file("notes.txt", "OLD\n[[@ section body @]]\nkeep lower case\n[[@ end @]]\n")
        .unwrap();

    codegen(&project).args(["-p", "-f"]).assert().success();

    assert_eq!(
        project.read_file("notes.txt").unwrap(),
        "HELLO world\n[[@ section body @]]\nkeep lower case\n[[@ end @]]\n"
    );
}

#[test]
fn test_without_pretty_formatter_is_not_run() {
    let project = project_with_formatter("sed s/hello/HELLO/");

    codegen(&project).assert().success();

    assert!(project.read_file("notes.txt").unwrap().starts_with("hello world\n"));
}

#[test]
fn test_missing_formatter_falls_back_to_unformatted_text() {
    let project = project_with_formatter("codegen-no-such-formatter --stdin");

    codegen(&project)
        .arg("--pretty")
        .assert()
        .success()
        .stderr(predicate::str::contains("left unformatted"));

    assert!(project.read_file("notes.txt").unwrap().starts_with("hello world\n"));
}

#[cfg(unix)]
#[test]
fn test_failing_formatter_falls_back_to_unformatted_text() {
    let project = project_with_formatter("false");

    codegen(&project).arg("-p").assert().success();

    assert!(project.read_file("notes.txt").unwrap().starts_with("hello world\n"));
}
