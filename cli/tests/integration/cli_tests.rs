//! Integration tests for the CLI skeleton: help, version and global flags.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn pushctl() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pushctl"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    pushctl()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Push apps"));
}

#[test]
fn test_cli_help_lists_commands() {
    pushctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    pushctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pushctl"));
}

#[test]
fn test_version_command_shows_version() {
    pushctl()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!(
            "pushctl ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = pushctl()
        .args(["version", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_push_help_shows_flags() {
    pushctl()
        .args(["push", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--path"))
        .stdout(predicate::str::contains("--hostname"))
        .stdout(predicate::str::contains("--domain"))
        .stdout(predicate::str::contains("--no-route"));
}

#[test]
fn test_unknown_command_fails() {
    pushctl()
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
