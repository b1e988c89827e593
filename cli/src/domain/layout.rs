//! Every filesystem location the orchestrator writes to.
//!
//! Derived from `$HOME` and [`Settings`] once per run so the rest of the code
//! never concatenates paths on its own.

use std::path::{Path, PathBuf};

use crate::domain::settings::Settings;

/// Persona documents rendered into the agent workspace.
pub const PERSONA_DOCUMENTS: &[&str] = &["SOUL.md", "IDENTITY.md"];

/// Resolved artifact paths for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub home: PathBuf,
    /// `~/.openclaw`
    pub config_dir: PathBuf,
    /// `~/.openclaw/.env`
    pub env_file: PathBuf,
    /// `~/.openclaw/openclaw.json`
    pub config_file: PathBuf,
    /// `~/.openclaw/workspace`
    pub workspace_dir: PathBuf,
    /// `~/.bashrc`
    pub shell_rc: PathBuf,
    /// `/etc/systemd/system/openclaw.service`
    pub unit_path: PathBuf,
}

impl InstallLayout {
    #[must_use]
    pub fn new(home: &Path, settings: &Settings) -> Self {
        let config_dir = home.join(&settings.agent.config_dir_name);
        Self {
            home: home.to_path_buf(),
            env_file: config_dir.join(".env"),
            config_file: config_dir.join(format!("{}.json", settings.agent.binary)),
            workspace_dir: config_dir.join("workspace"),
            config_dir,
            shell_rc: home.join(&settings.host.shell_rc),
            unit_path: PathBuf::from("/etc/systemd/system")
                .join(format!("{}.service", settings.agent.unit_name)),
        }
    }

    /// Paths of the persona documents inside the workspace.
    #[must_use]
    pub fn persona_paths(&self) -> Vec<PathBuf> {
        PERSONA_DOCUMENTS
            .iter()
            .map(|name| self.workspace_dir.join(name))
            .collect()
    }

    /// Directories that must exist before artifacts are written.
    #[must_use]
    pub fn owned_dirs(&self) -> [&Path; 2] {
        [&self.config_dir, &self.workspace_dir]
    }

    /// Well-known places an npm-installed binary ends up, in search order.
    #[must_use]
    pub fn binary_candidates(&self, binary: &str) -> Vec<PathBuf> {
        vec![
            self.home.join(".npm-global").join("bin").join(binary),
            self.home.join(".local").join("bin").join(binary),
            PathBuf::from("/usr/local/bin").join(binary),
            PathBuf::from("/usr/bin").join(binary),
        ]
    }
}
