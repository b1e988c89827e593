//! Host precondition checks: pure functions over probed facts.
//!
//! This module is intentionally free of I/O, async, and external layer imports.

use anyhow::Result;

use crate::domain::error::ProvisionError;

/// Facts about the host gathered before anything is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFacts {
    pub uid: u32,
    pub user: String,
    pub group: String,
    /// `uname -m` output, e.g. `aarch64`.
    pub arch: String,
}

/// Architecture gate verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchVerdict {
    Supported,
    /// Unsupported but the operator passed an explicit override.
    Overridden,
}

/// Refuse to run as root.
///
/// # Errors
///
/// Returns [`ProvisionError::ElevatedPrivileges`] when `uid` is 0.
pub fn check_privileges(uid: u32) -> Result<()> {
    if uid == 0 {
        return Err(ProvisionError::ElevatedPrivileges.into());
    }
    Ok(())
}

/// Check `arch` against the supported list.
///
/// # Errors
///
/// Returns [`ProvisionError::UnsupportedArchitecture`] when the architecture is
/// not supported and `allow_override` is false.
pub fn check_architecture(
    arch: &str,
    supported: &[String],
    allow_override: bool,
) -> Result<ArchVerdict> {
    if supported.iter().any(|s| s == arch) {
        return Ok(ArchVerdict::Supported);
    }
    if allow_override {
        return Ok(ArchVerdict::Overridden);
    }
    Err(ProvisionError::UnsupportedArchitecture {
        arch: arch.to_string(),
    }
    .into())
}

/// Parse the major version out of `node --version` output (`v22.11.0`).
#[must_use]
pub fn parse_node_major(output: &str) -> Option<u64> {
    let raw = output.lines().next()?.trim();
    let raw = raw.strip_prefix('v').unwrap_or(raw);
    semver::Version::parse(raw).ok().map(|v| v.major)
}

/// Pipeline that registers the apt source named by `setup_url`.
#[must_use]
pub fn node_source_script(setup_url: &str) -> String {
    format!("curl -fsSL {setup_url} | sudo -E bash -")
}

/// apt packages that provide Node.js.
///
/// The packaged `nodejs` from a setup script bundles npm and conflicts with
/// the distribution's `npm`.
#[must_use]
pub fn node_packages(setup_url: Option<&str>) -> &'static [&'static str] {
    if setup_url.is_some() {
        &["nodejs"]
    } else {
        &["nodejs", "npm"]
    }
}

/// One-line shell command that installs Node.js by hand.
#[must_use]
pub fn node_install_command(setup_url: Option<&str>) -> String {
    let apt = format!("sudo apt-get install -y {}", node_packages(setup_url).join(" "));
    match setup_url {
        Some(url) => format!("{} && {apt}", node_source_script(url)),
        None => apt,
    }
}

/// Whether `model` appears in `ollama list` output.
///
/// The first column of every row after the header is a model reference. A
/// bare name matches its `:latest` tag.
#[must_use]
pub fn model_listed(list_output: &str, model: &str) -> bool {
    let wanted = normalize_model(model);
    list_output
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .any(|name| normalize_model(name) == wanted)
}

fn normalize_model(name: &str) -> String {
    if name.contains(':') {
        name.to_string()
    } else {
        format!("{name}:latest")
    }
}
