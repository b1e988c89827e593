//! Tests for agent binary resolution and systemd registration.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use piclaw::application::services::registrar::{register, resolve_agent_binary, start_service};
use piclaw::domain::error::ProvisionError;
use piclaw::domain::service::ServiceDescriptor;
use piclaw::domain::settings::Settings;
use piclaw::infra::fs::HostFs;

use crate::helpers::{RecordingRunner, err_output, layout_in};

const T: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_resolve_prefers_path_lookup() {
    let home = tempfile::tempdir().expect("tempdir");
    let runner = RecordingRunner::new().on_path("openclaw", "/opt/node/bin/openclaw");
    let path = resolve_agent_binary(&runner, &HostFs, "openclaw", &layout_in(home.path()))
        .await
        .expect("resolve");
    assert_eq!(path, PathBuf::from("/opt/node/bin/openclaw"));
}

#[tokio::test]
async fn test_resolve_falls_back_to_user_npm_prefix() {
    let home = tempfile::tempdir().expect("tempdir");
    let bin_dir = home.path().join(".npm-global").join("bin");
    std::fs::create_dir_all(&bin_dir).expect("mkdir");
    let binary = "piclaw-test-agent";
    std::fs::write(bin_dir.join(binary), "#!/bin/sh\n").expect("write");

    let runner = RecordingRunner::new();
    let path = resolve_agent_binary(&runner, &HostFs, binary, &layout_in(home.path()))
        .await
        .expect("resolve");
    assert_eq!(path, bin_dir.join(binary));
}

#[tokio::test]
async fn test_resolve_unresolvable_binary_is_fatal() {
    let home = tempfile::tempdir().expect("tempdir");
    let runner = RecordingRunner::new();
    let err = resolve_agent_binary(
        &runner,
        &HostFs,
        "piclaw-test-missing-agent",
        &layout_in(home.path()),
    )
    .await
    .expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::BinaryNotFound { .. })
    ));
    assert!(err.to_string().contains(".npm-global"));
}

fn descriptor(home: &Path) -> ServiceDescriptor {
    ServiceDescriptor::derive(
        Path::new("/usr/bin/openclaw"),
        "pi",
        "pi",
        &Settings::default(),
        &layout_in(home),
    )
}

#[tokio::test]
async fn test_register_installs_reloads_and_enables_without_starting() {
    let home = tempfile::tempdir().expect("tempdir");
    let runner = RecordingRunner::new();
    register(&runner, &descriptor(home.path()), &layout_in(home.path()), T)
        .await
        .expect("register");

    let calls = runner.calls();
    let lines: Vec<&str> = calls.iter().map(|c| c.line.as_str()).collect();
    assert_eq!(
        lines,
        vec![
            "sudo tee /etc/systemd/system/openclaw.service",
            "sudo systemctl daemon-reload",
            "sudo systemctl enable openclaw",
        ]
    );
    let unit = calls[0].stdin.as_deref().expect("unit on stdin");
    assert!(unit.contains("ExecStart=/usr/bin/openclaw gateway --port 18789"));
    assert!(unit.contains("User=pi"));
    assert!(!runner.ran("sudo systemctl start openclaw"));
}

#[tokio::test]
async fn test_register_stops_when_unit_cannot_be_written() {
    let home = tempfile::tempdir().expect("tempdir");
    let runner = RecordingRunner::new().on(
        "sudo tee /etc/systemd/system/openclaw.service",
        err_output(1, b"sudo: a password is required"),
    );
    let err = register(&runner, &descriptor(home.path()), &layout_in(home.path()), T)
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("password is required"));
    assert!(!runner.ran("sudo systemctl daemon-reload"));
}

#[tokio::test]
async fn test_start_service_reports_systemctl_failure() {
    let runner = RecordingRunner::new().on(
        "sudo systemctl start openclaw",
        err_output(1, b"Job for openclaw.service failed"),
    );
    let err = start_service(&runner, "openclaw", T)
        .await
        .expect_err("must fail");
    assert!(format!("{err:#}").contains("Job for openclaw.service failed"));
}
