//! Pure normalisation rules behind the interactive input primitives.
//!
//! The terminal adapter only reads raw lines; every decision about what a
//! line means lives here so it can be tested without a TTY.

/// Interpret a yes/no answer.
///
/// Only `y` and `yes` (any case, surrounding whitespace ignored) mean yes.
/// Everything else, including an empty line or garbage, means no.
#[must_use]
pub fn parse_confirmation(raw: &str) -> bool {
    let answer = raw.trim().to_ascii_lowercase();
    answer == "y" || answer == "yes"
}

/// Resolve a free-text answer against an optional default.
///
/// Empty input falls back to `default` when one exists; otherwise the trimmed
/// input is returned as-is (which may be empty).
#[must_use]
pub fn resolve_text(raw: &str, default: Option<&str>) -> String {
    let trimmed = raw.trim();
    match default {
        Some(d) if trimmed.is_empty() => d.to_string(),
        _ => trimmed.to_string(),
    }
}
