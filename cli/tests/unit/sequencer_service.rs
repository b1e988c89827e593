//! Tests for the phase sequencer: policies, skips and ordering.

#![allow(clippy::expect_used)]

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use piclaw::application::services::sequencer::{PhaseHandler, run_phases};
use piclaw::domain::error::ProvisionError;
use piclaw::domain::phase::{FailurePolicy, PhaseId, PhaseOutcome, PhaseSpec, Readiness};

use crate::helpers::{NoopReporter, RecordingReporter};

#[derive(Default)]
struct FakeHandler {
    readiness: HashMap<PhaseId, Readiness>,
    failing: HashSet<PhaseId>,
    broken_checks: HashSet<PhaseId>,
    applied: Vec<PhaseId>,
}

impl PhaseHandler for FakeHandler {
    async fn check(&mut self, id: PhaseId) -> Result<Readiness> {
        if self.broken_checks.contains(&id) {
            anyhow::bail!("probe crashed");
        }
        Ok(self.readiness.get(&id).cloned().unwrap_or(Readiness::Pending))
    }

    async fn apply(&mut self, id: PhaseId) -> Result<()> {
        self.applied.push(id);
        if self.failing.contains(&id) {
            anyhow::bail!("exit status 100");
        }
        Ok(())
    }
}

fn spec(id: PhaseId, policy: FailurePolicy) -> PhaseSpec {
    PhaseSpec {
        id,
        policy,
        remediation: format!("fix {id}"),
    }
}

fn plan() -> Vec<PhaseSpec> {
    vec![
        spec(PhaseId::SystemPackages, FailurePolicy::Fatal),
        spec(PhaseId::LocalModelPull, FailurePolicy::WarnAndContinue),
        spec(PhaseId::EnvironmentSecrets, FailurePolicy::Fatal),
        spec(PhaseId::Diagnostics, FailurePolicy::WarnAndContinue),
    ]
}

#[tokio::test]
async fn test_run_phases_applies_pending_phases_in_order() {
    let mut handler = FakeHandler::default();
    let report = run_phases(&plan(), &mut handler, &NoopReporter)
        .await
        .expect("run");
    assert_eq!(
        handler.applied,
        vec![
            PhaseId::SystemPackages,
            PhaseId::LocalModelPull,
            PhaseId::EnvironmentSecrets,
            PhaseId::Diagnostics,
        ]
    );
    assert!(
        report
            .records
            .iter()
            .all(|r| r.outcome == PhaseOutcome::Completed)
    );
}

#[tokio::test]
async fn test_run_phases_skips_done_and_not_needed_without_applying() {
    let mut handler = FakeHandler::default();
    handler
        .readiness
        .insert(PhaseId::SystemPackages, Readiness::Done);
    handler.readiness.insert(
        PhaseId::LocalModelPull,
        Readiness::NotNeeded("no local model selected".to_string()),
    );

    let report = run_phases(&plan(), &mut handler, &NoopReporter)
        .await
        .expect("run");

    assert!(!handler.applied.contains(&PhaseId::SystemPackages));
    assert!(!handler.applied.contains(&PhaseId::LocalModelPull));
    assert_eq!(
        report.outcome(PhaseId::SystemPackages),
        Some(&PhaseOutcome::AlreadyDone)
    );
    assert_eq!(
        report.outcome(PhaseId::LocalModelPull),
        Some(&PhaseOutcome::NotNeeded("no local model selected".to_string()))
    );
}

#[tokio::test]
async fn test_run_phases_fatal_failure_stops_the_run() {
    let mut handler = FakeHandler::default();
    handler.failing.insert(PhaseId::SystemPackages);

    let err = run_phases(&plan(), &mut handler, &NoopReporter)
        .await
        .expect_err("fatal phase must abort");

    match err.downcast_ref::<ProvisionError>() {
        Some(ProvisionError::PhaseFailed { phase, message }) => {
            assert_eq!(phase, "system-packages");
            assert!(message.contains("exit status 100"));
            assert!(message.contains("fix system-packages"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(handler.applied, vec![PhaseId::SystemPackages]);
}

#[tokio::test]
async fn test_run_phases_warn_failure_continues_and_is_recorded() {
    let mut handler = FakeHandler::default();
    handler.failing.insert(PhaseId::LocalModelPull);
    let reporter = RecordingReporter::default();

    let report = run_phases(&plan(), &mut handler, &reporter)
        .await
        .expect("warn failure must not abort");

    assert!(handler.applied.contains(&PhaseId::Diagnostics));
    let failures: Vec<PhaseId> = report.failures().map(|r| r.id).collect();
    assert_eq!(failures, vec![PhaseId::LocalModelPull]);
    assert!(
        reporter
            .warnings()
            .iter()
            .any(|w| w.contains("fix local-model-pull"))
    );
}

#[tokio::test]
async fn test_run_phases_check_error_follows_phase_policy() {
    let mut handler = FakeHandler::default();
    handler.broken_checks.insert(PhaseId::Diagnostics);
    let report = run_phases(&plan(), &mut handler, &NoopReporter)
        .await
        .expect("warn phase");
    assert!(matches!(
        report.outcome(PhaseId::Diagnostics),
        Some(PhaseOutcome::Failed(m)) if m.contains("probe crashed")
    ));

    let mut handler = FakeHandler::default();
    handler.broken_checks.insert(PhaseId::EnvironmentSecrets);
    let result = run_phases(&plan(), &mut handler, &NoopReporter).await;
    assert!(result.is_err());
    assert!(!handler.applied.contains(&PhaseId::Diagnostics));
}

#[tokio::test]
async fn test_run_phases_never_revisits_completed_phases_after_failure() {
    let mut handler = FakeHandler::default();
    handler.failing.insert(PhaseId::EnvironmentSecrets);
    let _ = run_phases(&plan(), &mut handler, &NoopReporter).await;
    assert_eq!(
        handler.applied,
        vec![
            PhaseId::SystemPackages,
            PhaseId::LocalModelPull,
            PhaseId::EnvironmentSecrets,
        ]
    );
}

#[tokio::test]
async fn test_run_phases_wraps_only_applied_phases_in_a_progress_span() {
    let mut handler = FakeHandler::default();
    handler
        .readiness
        .insert(PhaseId::SystemPackages, Readiness::Done);
    handler.failing.insert(PhaseId::LocalModelPull);
    let reporter = RecordingReporter::default();

    run_phases(&plan()[..3], &mut handler, &reporter)
        .await
        .expect("warn failures do not abort");

    assert_eq!(
        reporter.events(),
        vec![
            "ok:system packages: already done".to_string(),
            "begin:Setting up local model...".to_string(),
            "warn:local model failed: exit status 100".to_string(),
            "warn:  fix later with: fix local-model-pull".to_string(),
            "begin:Setting up environment secrets...".to_string(),
            "ok:environment secrets: done".to_string(),
        ]
    );
}
