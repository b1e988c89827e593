//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::profile::Secret;
use crate::domain::settings::Settings;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Start a long-running step; the next `success` or `warn` ends it.
    fn begin(&self, message: &str) {
        self.step(message);
    }
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Operator Input Port ───────────────────────────────────────────────────────

/// Blocking reads from the controlling terminal.
pub trait Prompter {
    /// Masked input, retried until non-empty. The value is never echoed.
    fn secret(&self, prompt: &str) -> Result<Secret>;
    /// Free text; returns `default` when the input is empty and one exists.
    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String>;
    /// `y`/`yes` (any case) is true, anything else false. No retry.
    fn confirm(&self, prompt: &str) -> Result<bool>;
    /// Menu selection; returns the chosen index into `items`.
    fn select(&self, prompt: &str, items: &[&str]) -> Result<usize>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the user-owned part of the local filesystem.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// `Ok(None)` when the file does not exist.
    fn read_to_string(&self, path: &Path) -> Result<Option<String>>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Replace `path` with a file that never carries wider permissions than
    /// `mode`, including while it is being written.
    fn write_private(&self, path: &Path, content: &str, mode: u32) -> Result<()>;
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
}

// ── Settings Port ─────────────────────────────────────────────────────────────

/// Loads orchestrator settings.
pub trait SettingsStore {
    /// Load settings, falling back to defaults when no file exists.
    fn load(&self) -> Result<Settings>;
    /// Path the settings are read from.
    fn path(&self) -> Result<PathBuf>;
}
