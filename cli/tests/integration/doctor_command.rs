//! Integration tests for `piclaw doctor` failure paths.
//!
//! Every test points `--settings` at a temp file and `HOME` at a temp dir so
//! the operator's real configuration is never read.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn piclaw() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("piclaw"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// A temp home with a settings file containing `yaml`.
fn home_with_settings(yaml: &str) -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("settings.yaml");
    std::fs::write(&path, yaml).expect("write settings");
    (dir, path.to_string_lossy().into_owned())
}

#[test]
fn test_doctor_invalid_settings_exits_one() {
    let (dir, path) = home_with_settings("agent:\n  binary: ../evil\n");
    piclaw()
        .args(["doctor", "--settings", &path])
        .env("HOME", dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("agent.binary"));
}

#[test]
fn test_doctor_missing_agent_binary_exits_one() {
    let (dir, path) = home_with_settings("agent:\n  binary: piclaw-test-missing-agent\n");
    piclaw()
        .args(["doctor", "--settings", &path])
        .env("HOME", dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("piclaw-test-missing-agent"))
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_doctor_settings_env_var_is_honoured() {
    let (dir, path) = home_with_settings("agent:\n  binary: /abs/path\n");
    piclaw()
        .arg("doctor")
        .env("PICLAW_SETTINGS", &path)
        .env("HOME", dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("agent.binary"));
}
