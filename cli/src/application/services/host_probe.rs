//! Application service: read-only probes of the host.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Nothing here changes the host, so every probe is safe to repeat.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::CommandRunner;
use crate::domain::host::{self, HostFacts};

/// Run a command and fail with its stderr when it exits non-zero.
///
/// # Errors
///
/// Returns an error if the process cannot be spawned, times out, or exits
/// with a non-zero status.
pub async fn run_checked(
    runner: &impl CommandRunner,
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<Output> {
    let output = runner
        .run_with_timeout(program, args, timeout)
        .await
        .with_context(|| format!("running {program} {}", args.join(" ")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "{program} {} exited with {}\n{}",
            args.join(" "),
            output.status,
            stderr.trim()
        );
    }
    Ok(output)
}

/// First line of stdout of a successful command.
async fn first_line(runner: &impl CommandRunner, program: &str, args: &[&str]) -> Result<String> {
    let output = runner
        .run(program, args)
        .await
        .with_context(|| format!("running {program}"))?;
    if !output.status.success() {
        anyhow::bail!("{program} {} exited with {}", args.join(" "), output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string())
}

/// Gather the invoking identity and machine architecture.
///
/// # Errors
///
/// Returns an error if `id` or `uname` cannot be run or print garbage.
pub async fn probe_host(runner: &impl CommandRunner) -> Result<HostFacts> {
    let uid = first_line(runner, "id", &["-u"]).await?;
    let uid: u32 = uid
        .parse()
        .with_context(|| format!("unexpected output from id -u: {uid}"))?;
    let user = first_line(runner, "id", &["-un"]).await?;
    let group = first_line(runner, "id", &["-gn"]).await?;
    let arch = first_line(runner, "uname", &["-m"]).await?;
    tracing::debug!(uid, %user, %group, %arch, "host probed");
    Ok(HostFacts {
        uid,
        user,
        group,
        arch,
    })
}

/// Resolve `binary` through the login shell's PATH.
pub async fn which(runner: &impl CommandRunner, binary: &str) -> Option<PathBuf> {
    let output = runner
        .run("sh", &["-c", "command -v \"$1\"", "sh", binary])
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!path.is_empty()).then(|| PathBuf::from(path))
}

/// Whether `binary` is on PATH.
pub async fn is_on_path(runner: &impl CommandRunner, binary: &str) -> bool {
    which(runner, binary).await.is_some()
}

/// Major version of the installed Node.js, if any.
pub async fn node_major(runner: &impl CommandRunner) -> Option<u64> {
    let output = runner.run("node", &["--version"]).await.ok()?;
    if !output.status.success() {
        return None;
    }
    host::parse_node_major(&String::from_utf8_lossy(&output.stdout))
}

/// Whether the local-model runtime already has `model`.
///
/// # Errors
///
/// Returns an error if `ollama list` cannot be run.
pub async fn has_local_model(runner: &impl CommandRunner, model: &str) -> Result<bool> {
    let output = runner
        .run("ollama", &["list"])
        .await
        .context("listing local models")?;
    if !output.status.success() {
        anyhow::bail!("ollama list exited with {}", output.status);
    }
    Ok(host::model_listed(
        &String::from_utf8_lossy(&output.stdout),
        model,
    ))
}
