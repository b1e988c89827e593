//! Application service: ordered execution of provisioning phases.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! The sequencer knows nothing about what a phase does; a [`PhaseHandler`]
//! supplies the precondition and the action for each [`PhaseId`].

use anyhow::Result;

use crate::application::ports::ProgressReporter;
use crate::domain::error::ProvisionError;
use crate::domain::phase::{
    FailurePolicy, PhaseId, PhaseOutcome, PhaseRecord, PhaseSpec, Readiness, RunReport,
};

/// Precondition and action for every phase.
#[allow(async_fn_in_trait)]
pub trait PhaseHandler {
    /// Decide whether the phase's effect is already present.
    async fn check(&mut self, id: PhaseId) -> Result<Readiness>;
    /// Produce the phase's effect.
    async fn apply(&mut self, id: PhaseId) -> Result<()>;
}

/// Run `phases` in order.
///
/// Completed phases are never rolled back.
///
/// # Errors
///
/// Returns [`ProvisionError::PhaseFailed`] for the first failing phase whose
/// policy is [`FailurePolicy::Fatal`]; later phases do not run.
pub async fn run_phases(
    phases: &[PhaseSpec],
    handler: &mut impl PhaseHandler,
    reporter: &impl ProgressReporter,
) -> Result<RunReport> {
    let mut report = RunReport::default();

    for spec in phases {
        let name = spec.id.describe();
        let outcome = match handler.check(spec.id).await {
            Ok(Readiness::Done) => {
                reporter.success(&format!("{name}: already done"));
                PhaseOutcome::AlreadyDone
            }
            Ok(Readiness::NotNeeded(reason)) => {
                reporter.step(&format!("{name}: skipped ({reason})"));
                PhaseOutcome::NotNeeded(reason)
            }
            Ok(Readiness::Pending) => {
                reporter.begin(&format!("Setting up {name}..."));
                match handler.apply(spec.id).await {
                    Ok(()) => {
                        reporter.success(&format!("{name}: done"));
                        PhaseOutcome::Completed
                    }
                    Err(e) => on_failure(spec, &e, reporter)?,
                }
            }
            Err(e) => on_failure(spec, &e, reporter)?,
        };
        tracing::debug!(phase = %spec.id, ?outcome, "phase finished");
        report.records.push(PhaseRecord {
            id: spec.id,
            outcome,
            remediation: spec.remediation.clone(),
        });
    }

    Ok(report)
}

fn on_failure(
    spec: &PhaseSpec,
    err: &anyhow::Error,
    reporter: &impl ProgressReporter,
) -> Result<PhaseOutcome> {
    let message = format!("{err:#}");
    match spec.policy {
        FailurePolicy::Fatal => Err(ProvisionError::PhaseFailed {
            phase: spec.id.as_str().to_string(),
            message: format!("{message}\nRetry manually with: {}", spec.remediation),
        }
        .into()),
        FailurePolicy::WarnAndContinue => {
            reporter.warn(&format!("{} failed: {message}", spec.id.describe()));
            reporter.warn(&format!("  fix later with: {}", spec.remediation));
            Ok(PhaseOutcome::Failed(message))
        }
    }
}
