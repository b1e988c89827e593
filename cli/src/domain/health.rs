//! Health check domain types: the result of the agent's own diagnostic.
//!
//! This module is intentionally free of I/O, async, and external layer imports.

/// Number of trailing output lines kept for the operator.
pub const EXCERPT_LINES: usize = 12;

/// Outcome of running `<agent> doctor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub passed: bool,
    /// Exit code, `None` when the process could not be run or was killed.
    pub exit_code: Option<i32>,
    /// Last lines of combined output, or the spawn error.
    pub excerpt: Vec<String>,
}

impl DiagnosticReport {
    /// Report for a diagnostic that could not be executed at all.
    #[must_use]
    pub fn unavailable(reason: &str) -> Self {
        Self {
            passed: false,
            exit_code: None,
            excerpt: vec![reason.to_string()],
        }
    }

    /// One-line summary suitable for a warning.
    #[must_use]
    pub fn headline(&self) -> String {
        match (self.passed, self.exit_code) {
            (true, _) => "diagnostics passed".to_string(),
            (false, Some(code)) => format!("diagnostics reported problems (exit {code})"),
            (false, None) => "diagnostics could not run".to_string(),
        }
    }
}

/// Keep the last `max` non-blank lines of stdout followed by stderr.
#[must_use]
pub fn excerpt(stdout: &str, stderr: &str, max: usize) -> Vec<String> {
    let lines: Vec<&str> = stdout
        .lines()
        .chain(stderr.lines())
        .filter(|l| !l.trim().is_empty())
        .collect();
    let skip = lines.len().saturating_sub(max);
    lines[skip..].iter().map(|l| (*l).to_string()).collect()
}
