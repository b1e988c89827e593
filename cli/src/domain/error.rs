//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Fatal conditions that abort a provisioning run with exit code 1.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(
        "piclaw must not be run as root. Re-run as the user that will own the agent \
         (sudo is invoked only where needed)."
    )]
    ElevatedPrivileges,

    #[error(
        "Unsupported architecture '{arch}'. piclaw targets 64-bit Raspberry Pi OS (aarch64). \
         Pass --allow-unsupported-arch to continue anyway."
    )]
    UnsupportedArchitecture { arch: String },

    #[error("Installation cancelled. Nothing was changed.")]
    Declined,

    #[error(
        "Agent binary '{name}' not found on PATH or in: {searched}\n\
         Install it with: sudo npm install -g {name}"
    )]
    BinaryNotFound { name: String, searched: String },

    #[error("Phase '{phase}' failed: {message}")]
    PhaseFailed { phase: String, message: String },
}

// ── Settings errors ───────────────────────────────────────────────────────────

/// Errors related to orchestrator settings validation.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: String, reason: String },
}
