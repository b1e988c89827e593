//! Diagnostic logging setup.
//!
//! Operator-facing output goes through `crate::output`; this is the
//! `tracing` side channel on stderr for debugging a run.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "PICLAW_LOG";

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let fallback = if verbose { "piclaw=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
