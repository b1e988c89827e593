//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::health::DiagnosticReport;
use crate::domain::layout::InstallLayout;
use crate::domain::phase::PhaseOutcome;
use crate::domain::summary::ProvisionSummary;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("piclaw {version}");
    }

    /// Opening banner of an install run.
    pub fn render_banner(&self, version: &str, agent: &str) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx
            .header(&format!("piclaw {version} · always-on {agent} for Raspberry Pi"));
        println!();
    }

    /// Render the end-of-run summary: phase outcomes, artifact paths, gaps.
    pub fn render_summary(&self, summary: &ProvisionSummary, layout: &InstallLayout) {
        if !self.ctx.quiet {
            println!();
            self.ctx.header("Summary");
            for record in &summary.report.records {
                let name = record.id.describe();
                match &record.outcome {
                    PhaseOutcome::Completed => self.ctx.success(&format!("{name}: installed")),
                    PhaseOutcome::AlreadyDone => self.ctx.success(&format!(
                        "{name}: {}",
                        "already in place".style(self.ctx.styles.dim)
                    )),
                    PhaseOutcome::NotNeeded(reason) => self.ctx.info(&format!(
                        "{name}: {}",
                        format!("skipped, {reason}").style(self.ctx.styles.dim)
                    )),
                    PhaseOutcome::Failed(_) => self.ctx.warn(&format!("{name}: failed")),
                }
            }

            println!();
            self.ctx.kv("Config:", &layout.config_file.display().to_string());
            self.ctx.kv("Secrets:", &layout.env_file.display().to_string());
            self.ctx.kv("Workspace:", &layout.workspace_dir.display().to_string());
            self.ctx.kv("Service:", &layout.unit_path.display().to_string());
        }

        // Gaps are shown even in quiet mode; they are the actionable part.
        if summary.gaps.is_empty() {
            self.ctx.success("Everything is configured.");
            return;
        }
        println!();
        println!("  {}", "Still to do:".style(self.ctx.styles.bold));
        for gap in &summary.gaps {
            println!("  {} {}", "⚠".style(self.ctx.styles.warning), gap.what);
            println!("      {}", gap.remediation.style(self.ctx.styles.command));
        }
    }

    /// Render the agent's own diagnostic result.
    pub fn render_diagnostics(&self, report: &DiagnosticReport) {
        if report.passed {
            self.ctx.success(&report.headline());
            return;
        }
        self.ctx.error(&report.headline());
        self.render_excerpt(report);
    }

    /// Trailing output of a failed diagnostic, dimmed, on stderr.
    pub fn render_excerpt(&self, report: &DiagnosticReport) {
        for line in &report.excerpt {
            eprintln!("      {}", line.style(self.ctx.styles.dim));
        }
    }
}
