//! Application service: post-install health check.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Runs the agent's own `doctor` subcommand. Never fails and never changes
//! anything; a broken diagnostic becomes a report, not an error.

use std::path::Path;
use std::time::Duration;

use crate::application::ports::CommandRunner;
use crate::domain::health::{self, DiagnosticReport, EXCERPT_LINES};

/// Run `<binary> doctor` bounded by `timeout`.
pub async fn verify(
    runner: &impl CommandRunner,
    binary: &Path,
    timeout: Duration,
) -> DiagnosticReport {
    let program = binary.display().to_string();
    match runner.run_with_timeout(&program, &["doctor"], timeout).await {
        Ok(output) => {
            let report = DiagnosticReport {
                passed: output.status.success(),
                exit_code: output.status.code(),
                excerpt: health::excerpt(
                    &String::from_utf8_lossy(&output.stdout),
                    &String::from_utf8_lossy(&output.stderr),
                    EXCERPT_LINES,
                ),
            };
            tracing::debug!(passed = report.passed, code = ?report.exit_code, "doctor finished");
            report
        }
        Err(e) => {
            tracing::debug!(error = %e, "doctor could not run");
            DiagnosticReport::unavailable(&format!("{e:#}"))
        }
    }
}
