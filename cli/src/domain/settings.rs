//! Domain types and validators for piclaw's own settings.
//!
//! Pure functions only, no I/O, no async, no filesystem access. The YAML
//! file is optional; every field falls back to a Pi-friendly default.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::SettingsError;

// ── Settings schema ──────────────────────────────────────────────────────────

/// Top-level settings stored in `~/.config/piclaw/settings.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub agent: AgentSettings,
    pub host: HostSettings,
    pub models: ModelSettings,
    pub browser: BrowserSettings,
    pub timeouts: TimeoutSettings,
}

/// The third-party agent being provisioned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentSettings {
    /// Executable name looked up on PATH.
    pub binary: String,
    /// npm package spec passed to `npm install -g`.
    pub npm_package: String,
    /// systemd unit name (without `.service`).
    pub unit_name: String,
    /// Config directory name under `$HOME`.
    pub config_dir_name: String,
    pub gateway_port: u16,
    /// Sandbox mode written into agent defaults.
    pub sandbox_mode: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            binary: "openclaw".to_string(),
            npm_package: "openclaw@latest".to_string(),
            unit_name: "openclaw".to_string(),
            config_dir_name: ".openclaw".to_string(),
            gateway_port: 18789,
            sandbox_mode: "off".to_string(),
        }
    }
}

/// Host prerequisites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HostSettings {
    /// Tools that must be on PATH before anything else runs.
    pub required_tools: Vec<String>,
    /// apt packages that provide `required_tools`.
    pub packages: Vec<String>,
    /// Minimum Node.js major version.
    pub node_major_min: u64,
    /// Script that adds an apt source carrying a recent enough Node.js.
    /// `None` installs the distribution's own `nodejs` and `npm`.
    pub node_setup_url: Option<String>,
    /// Architectures accepted without `--allow-unsupported-arch`.
    pub supported_arch: Vec<String>,
    /// Shell rc file under `$HOME` that receives PATH and alias blocks.
    pub shell_rc: String,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            required_tools: vec!["git".to_string(), "curl".to_string()],
            packages: vec![
                "git".to_string(),
                "curl".to_string(),
                "ca-certificates".to_string(),
                "build-essential".to_string(),
            ],
            node_major_min: 22,
            node_setup_url: Some("https://deb.nodesource.com/setup_22.x".to_string()),
            supported_arch: vec!["aarch64".to_string()],
            shell_rc: ".bashrc".to_string(),
        }
    }
}

/// Local model runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModelSettings {
    pub ollama_installer_url: String,
    /// Offered as the default answer when the operator opts into a local model.
    pub default_local_model: String,
    /// Optional small companion model pulled after the primary one.
    pub secondary_model: Option<String>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            ollama_installer_url: "https://ollama.com/install.sh".to_string(),
            default_local_model: "llama3.2:3b".to_string(),
            secondary_model: Some("nomic-embed-text".to_string()),
        }
    }
}

/// Headless browser used by the agent's browser tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowserSettings {
    pub enabled: bool,
    pub package: String,
    pub executable: String,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            package: "chromium".to_string(),
            executable: "/usr/bin/chromium".to_string(),
        }
    }
}

/// Timeouts, in seconds, for external commands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutSettings {
    /// Quick probes (`command -v`, `id`, `node --version`).
    pub probe_secs: u64,
    /// Package installs and model pulls.
    pub install_secs: u64,
    /// The agent's own `doctor` command.
    pub doctor_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            probe_secs: 30,
            install_secs: 1800,
            doctor_secs: 120,
        }
    }
}

impl TimeoutSettings {
    #[must_use]
    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }

    #[must_use]
    pub fn install(&self) -> Duration {
        Duration::from_secs(self.install_secs)
    }

    #[must_use]
    pub fn doctor(&self) -> Duration {
        Duration::from_secs(self.doctor_secs)
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

impl Settings {
    /// Reject settings that would produce broken artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        let invalid = |key: &str, reason: &str| -> anyhow::Error {
            SettingsError::Invalid {
                key: key.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };
        if !is_plain_name(&self.agent.binary) {
            return Err(invalid("agent.binary", "must be a bare executable name"));
        }
        if !is_plain_name(&self.agent.unit_name) {
            return Err(invalid("agent.unit_name", "must be a bare unit name"));
        }
        if !is_plain_name(&self.agent.config_dir_name) {
            return Err(invalid("agent.config_dir_name", "must be a single path segment"));
        }
        if self.agent.gateway_port == 0 {
            return Err(invalid("agent.gateway_port", "must be non-zero"));
        }
        if self
            .host
            .node_setup_url
            .as_deref()
            .is_some_and(|url| !is_shell_safe_url(url))
        {
            return Err(invalid("host.node_setup_url", "must be a plain https:// URL"));
        }
        if !is_shell_safe_url(&self.models.ollama_installer_url) {
            return Err(invalid(
                "models.ollama_installer_url",
                "must be a plain https:// URL",
            ));
        }
        if !is_plain_name(&self.host.shell_rc) {
            return Err(invalid("host.shell_rc", "must be a file name under $HOME"));
        }
        if self.timeouts.probe_secs == 0
            || self.timeouts.install_secs == 0
            || self.timeouts.doctor_secs == 0
        {
            return Err(invalid("timeouts", "must be greater than zero"));
        }
        Ok(())
    }
}

fn is_plain_name(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains('/')
        && !value.chars().any(char::is_whitespace)
}

/// Installer URLs are spliced into `sh -c`, so only a conservative
/// character set is accepted.
fn is_shell_safe_url(value: &str) -> bool {
    value.strip_prefix("https://").is_some_and(|rest| {
        !rest.is_empty()
            && rest
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-._~/:%+=".contains(c))
    })
}

// ── Unit tests ───────────────────────────────────────────────────────────────
