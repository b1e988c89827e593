//! `piclaw install`: interview the operator and provision the host.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::provision::{InstallOptions, InstallPorts, run_install};
use crate::infra::assets::persona_templates;
use crate::infra::prompt::DialoguerPrompter;
use crate::output::TerminalReporter;

/// Arguments for the install command.
#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// Continue on a CPU architecture other than aarch64 without asking
    #[arg(long)]
    pub allow_unsupported_arch: bool,
}

/// Run the install command.
///
/// # Errors
///
/// Returns an error if a fatal precondition fails, the operator declines,
/// or a fatal phase fails.
pub async fn run(app: &AppContext, args: &InstallArgs) -> Result<()> {
    let renderer = app.renderer();
    renderer.render_banner(env!("CARGO_PKG_VERSION"), &app.settings.agent.binary);

    let layout = app.layout()?;
    let reporter = TerminalReporter::new(&app.output);
    let prompter = DialoguerPrompter::new(&reporter);
    let personas = persona_templates();
    let ports = InstallPorts {
        runner: &app.runner,
        fs: &app.fs,
        prompter: &prompter,
        reporter: &reporter,
    };

    let summary = run_install(
        &ports,
        &app.settings,
        &layout,
        &personas,
        InstallOptions {
            allow_unsupported_arch: args.allow_unsupported_arch,
        },
    )
    .await?;

    renderer.render_summary(&summary, &layout);
    Ok(())
}
