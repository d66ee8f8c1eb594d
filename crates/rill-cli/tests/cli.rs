//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_program(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(source.as_bytes()).expect("write program");
    file
}

fn rill() -> Command {
    Command::cargo_bin("rill").expect("binary exists")
}

#[test]
fn test_run_prints_program_output() {
    let file = write_program("for (integer i = 0; i < 3; i = i + 1) { print(i); }");

    rill()
        .arg("run")
        .arg(file.path())
        .assert()
        .success()
        .stdout("0\n1\n2\n");
}

#[test]
fn test_run_fault_exits_nonzero_with_report() {
    let file = write_program("print(\"ok\"); print(missing)");

    rill()
        .arg("run")
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stdout("ok\n")
        .stderr(predicate::str::contains("undefined variable 'missing'"))
        .stderr(predicate::str::contains("offset 19"));
}

#[test]
fn test_run_fault_as_json() {
    let file = write_program("print(missing)");

    rill()
        .arg("run")
        .arg(file.path())
        .arg("--json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"offset\": 6"))
        .stderr(predicate::str::contains("UndefinedVariable"));
}

#[test]
fn test_ast_dumps_json() {
    let file = write_program("x = 1 + 2;");

    rill()
        .arg("ast")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"stmts\""))
        .stdout(predicate::str::contains("Assign"));
}

#[test]
fn test_ast_parse_fault_exits_nonzero() {
    let file = write_program("if (1) {");

    rill()
        .arg("ast")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected"));
}

#[test]
fn test_missing_file_reports_error() {
    rill()
        .arg("run")
        .arg("no/such/file.rill")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
