//! Application service: systemd registration of the agent gateway.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! The unit file is system-owned: it is re-derived and reinstalled on every
//! run. Registration enables the unit but never starts it; starting is the
//! operator's decision at the final gate.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, LocalFs};
use crate::application::services::host_probe::{run_checked, which};
use crate::domain::error::ProvisionError;
use crate::domain::layout::InstallLayout;
use crate::domain::service::ServiceDescriptor;

/// Absolute path of the agent binary.
///
/// PATH lookup first, then the well-known npm install locations.
///
/// # Errors
///
/// Returns [`ProvisionError::BinaryNotFound`] when no location has it.
pub async fn resolve_agent_binary(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    binary: &str,
    layout: &InstallLayout,
) -> Result<PathBuf> {
    if let Some(path) = which(runner, binary).await {
        tracing::debug!(path = %path.display(), "agent binary found on PATH");
        return Ok(path);
    }
    let candidates = layout.binary_candidates(binary);
    if let Some(path) = candidates.iter().find(|p| fs.exists(p)) {
        tracing::debug!(path = %path.display(), "agent binary found in fallback location");
        return Ok(path.clone());
    }
    Err(ProvisionError::BinaryNotFound {
        name: binary.to_string(),
        searched: candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
    .into())
}

/// Install the unit file, reload systemd and enable the unit.
///
/// # Errors
///
/// Returns an error if any privileged step fails.
pub async fn register(
    runner: &impl CommandRunner,
    descriptor: &ServiceDescriptor,
    layout: &InstallLayout,
    timeout: Duration,
) -> Result<()> {
    let unit_path = layout.unit_path.display().to_string();
    let content = descriptor.render();

    let output = runner
        .run_with_stdin("sudo", &["tee", &unit_path], content.as_bytes())
        .await
        .with_context(|| format!("writing {unit_path}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("failed to write {unit_path}.\n{}", stderr.trim());
    }

    run_checked(runner, "sudo", &["systemctl", "daemon-reload"], timeout).await?;
    run_checked(
        runner,
        "sudo",
        &["systemctl", "enable", &descriptor.unit_name],
        timeout,
    )
    .await?;
    tracing::info!(unit = %descriptor.unit_name, "service registered");
    Ok(())
}

/// Start the registered unit now.
///
/// # Errors
///
/// Returns an error if `systemctl start` fails.
pub async fn start_service(
    runner: &impl CommandRunner,
    unit_name: &str,
    timeout: Duration,
) -> Result<()> {
    run_checked(runner, "sudo", &["systemctl", "start", unit_name], timeout)
        .await
        .map(|_| ())
}
