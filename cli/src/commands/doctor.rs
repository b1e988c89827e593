//! `piclaw doctor`: run the agent's own health check.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::health_verifier::verify;
use crate::application::services::registrar::resolve_agent_binary;
use crate::output::progress;

/// Run the doctor command.
///
/// # Errors
///
/// Returns an error if the agent binary cannot be found or the diagnostic
/// reports problems.
pub async fn run(app: &AppContext) -> Result<()> {
    let agent = &app.settings.agent.binary;
    let layout = app.layout()?;
    let binary = resolve_agent_binary(&app.runner, &app.fs, agent, &layout).await?;
    let renderer = app.renderer();

    let pb = app
        .output
        .show_progress()
        .then(|| progress::spinner(&format!("Running {agent} doctor...")));
    let report = verify(&app.runner, &binary, app.settings.timeouts.doctor()).await;

    match pb {
        Some(pb) if report.passed => progress::finish_ok(&pb, &report.headline()),
        Some(pb) => {
            progress::finish_warn(&pb, &report.headline());
            renderer.render_excerpt(&report);
        }
        None => renderer.render_diagnostics(&report),
    }

    if !report.passed {
        anyhow::bail!(
            "{agent} doctor reported problems. Logs: journalctl -u {}",
            app.settings.agent.unit_name
        );
    }
    Ok(())
}
