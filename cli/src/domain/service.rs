//! systemd service descriptor for the agent gateway.
//!
//! Pure rendering, the registrar installs the result.

#![allow(clippy::format_push_string)]

use std::path::{Path, PathBuf};

use crate::domain::layout::InstallLayout;
use crate::domain::settings::Settings;

/// Seconds systemd waits before restarting a crashed gateway.
pub const RESTART_DELAY_SECS: u32 = 10;
/// Scheduling niceness so the gateway yields to interactive work on a Pi.
pub const NICE_LEVEL: i8 = 10;
/// Open file descriptor ceiling.
pub const NOFILE_LIMIT: u32 = 65536;

/// Everything needed to render the unit file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub unit_name: String,
    pub description: String,
    pub binary: PathBuf,
    pub args: Vec<String>,
    pub user: String,
    pub group: String,
    pub working_dir: PathBuf,
    pub env_file: PathBuf,
    pub restart_delay_secs: u32,
    pub nice: i8,
    pub nofile: u32,
}

impl ServiceDescriptor {
    /// Derive the descriptor from the resolved binary and invoking identity.
    #[must_use]
    pub fn derive(
        binary: &Path,
        user: &str,
        group: &str,
        settings: &Settings,
        layout: &InstallLayout,
    ) -> Self {
        Self {
            unit_name: settings.agent.unit_name.clone(),
            description: format!("{} agent gateway", settings.agent.binary),
            binary: binary.to_path_buf(),
            args: vec![
                "gateway".to_string(),
                "--port".to_string(),
                settings.agent.gateway_port.to_string(),
            ],
            user: user.to_string(),
            group: group.to_string(),
            working_dir: layout.config_dir.clone(),
            env_file: layout.env_file.clone(),
            restart_delay_secs: RESTART_DELAY_SECS,
            nice: NICE_LEVEL,
            nofile: NOFILE_LIMIT,
        }
    }

    /// Render the unit file.
    #[must_use]
    pub fn render(&self) -> String {
        let mut exec = self.binary.display().to_string();
        for arg in &self.args {
            exec.push(' ');
            exec.push_str(arg);
        }

        let mut out = String::new();
        out.push_str("# Generated by piclaw - regenerated on every install run\n");
        out.push_str("[Unit]\n");
        out.push_str(&format!("Description={}\n", self.description));
        out.push_str("After=network-online.target\n");
        out.push_str("Wants=network-online.target\n");
        out.push('\n');
        out.push_str("[Service]\n");
        out.push_str("Type=simple\n");
        out.push_str(&format!("User={}\n", self.user));
        out.push_str(&format!("Group={}\n", self.group));
        out.push_str(&format!("WorkingDirectory={}\n", self.working_dir.display()));
        // Leading '-' keeps the unit startable before any secret was captured.
        out.push_str(&format!("EnvironmentFile=-{}\n", self.env_file.display()));
        out.push_str("Environment=NODE_ENV=production\n");
        out.push_str(&format!("ExecStart={exec}\n"));
        out.push('\n');
        out.push_str("Restart=always\n");
        out.push_str(&format!("RestartSec={}\n", self.restart_delay_secs));
        out.push_str(&format!("Nice={}\n", self.nice));
        out.push_str(&format!("LimitNOFILE={}\n", self.nofile));
        out.push('\n');
        out.push_str("[Install]\n");
        out.push_str("WantedBy=multi-user.target\n");
        out
    }
}
