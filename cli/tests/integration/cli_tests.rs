//! Argument parsing, help and version output.

use assert_cmd::Command;
use predicates::prelude::*;

fn piclaw() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("piclaw"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    piclaw().assert().code(2).stderr(predicate::str::contains(
        "Provision an always-on AI agent gateway on a Raspberry Pi",
    ));
}

#[test]
fn test_cli_help_flag_lists_commands() {
    piclaw()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    piclaw()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("piclaw"));
}

#[test]
fn test_version_command_shows_version() {
    piclaw()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("piclaw 0.1.0"));
}

#[test]
fn test_install_help_shows_arch_override() {
    piclaw()
        .args(["install", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--allow-unsupported-arch"));
}

#[test]
fn test_global_flags_accepted_after_subcommand() {
    piclaw()
        .args(["version", "--quiet", "--no-color"])
        .assert()
        .success();
}

#[test]
fn test_unknown_command_is_usage_error() {
    piclaw()
        .arg("uninstall")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
