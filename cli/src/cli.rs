//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::output::OutputContext;

/// Provision an always-on AI agent gateway on a Raspberry Pi
#[derive(Parser)]
#[command(
    name = "piclaw",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log debug diagnostics to stderr (see also PICLAW_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file [default: ~/.config/piclaw/settings.yaml, or PICLAW_SETTINGS]
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Interview, install and register the agent service
    Install(commands::install::InstallArgs),

    /// Run the agent's health check
    Doctor,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            verbose,
            settings,
            command,
        } = self;
        crate::logging::init(verbose);

        let flags = AppFlags {
            output: OutputFlags { no_color, quiet },
            settings,
        };
        match command {
            Command::Version => {
                commands::version::run(&OutputContext::new(no_color, quiet));
                Ok(())
            }
            Command::Install(args) => {
                let app = AppContext::new(flags)?;
                commands::install::run(&app, &args).await
            }
            Command::Doctor => {
                let app = AppContext::new(flags)?;
                commands::doctor::run(&app).await
            }
        }
    }
}
