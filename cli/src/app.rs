//! Application context: unified state passed to every command handler.
//!
//! `AppContext` bundles the output context, the loaded settings and the
//! production port implementations. Commands that need none of these
//! (`version`) never build one, so a broken settings file cannot stop them.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::SettingsStore;
use crate::domain::layout::InstallLayout;
use crate::domain::settings::Settings;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::HostFs;
use crate::infra::settings::YamlSettingsStore;
use crate::output::{HumanRenderer, OutputContext};

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Explicit settings file (`--settings`).
    pub settings: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Orchestrator settings, validated.
    pub settings: Settings,
    /// Host command runner with the probe timeout as its default.
    pub runner: TokioCommandRunner,
    /// Host filesystem.
    pub fs: HostFs,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but is unreadable or
    /// invalid.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let settings = YamlSettingsStore::new(flags.settings).load()?;
        let runner = TokioCommandRunner::new(settings.timeouts.probe());
        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            settings,
            runner,
            fs: HostFs,
        })
    }

    /// Human renderer over this context's output.
    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// Artifact locations for the invoking user.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn layout(&self) -> Result<InstallLayout> {
        let home = dirs::home_dir().context("cannot determine home directory")?;
        Ok(InstallLayout::new(&home, &self.settings))
    }
}
