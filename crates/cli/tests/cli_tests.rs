use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("helpdesk-migrate").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Apply and revert helpdesk PostgreSQL schema migrations"));
}

#[test]
fn test_cli_lists_subcommands() {
    let mut cmd = Command::cargo_bin("helpdesk-migrate").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("up"))
        .stdout(predicate::str::contains("down"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_cli_down_help_mentions_step() {
    let mut cmd = Command::cargo_bin("helpdesk-migrate").unwrap();
    cmd.arg("down").arg("--help").assert().success().stdout(predicate::str::contains("step"));
}

#[test]
fn test_cli_rejects_zero_step() {
    let mut cmd = Command::cargo_bin("helpdesk-migrate").unwrap();
    cmd.env_remove("DATABASE_URL").args(["down", "--step", "0"]).assert().failure();
}

#[test]
fn test_cli_requires_database_url() {
    let mut cmd = Command::cargo_bin("helpdesk-migrate").unwrap();
    cmd.env_remove("DATABASE_URL")
        .arg("up")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL"));
}

#[test]
fn test_cli_rejects_unknown_subcommand() {
    let mut cmd = Command::cargo_bin("helpdesk-migrate").unwrap();
    cmd.arg("redo-everything").assert().failure();
}
