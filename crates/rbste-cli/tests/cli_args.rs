use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("rbste").unwrap()
}

#[test]
fn help_flag_lists_options() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--input"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("FILE"));
}

#[test]
fn help_shows_default_output() {
    cmd()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("./output.xlsx"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rbste"));
}

#[test]
fn missing_input_is_usage_error() {
    cmd()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn output_without_input_is_usage_error() {
    cmd()
        .args(["-o", "out.xlsx"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn unknown_flag_is_usage_error() {
    cmd()
        .args(["-i", "a.pdf", "--pages", "1"])
        .assert()
        .failure()
        .code(2);
}
