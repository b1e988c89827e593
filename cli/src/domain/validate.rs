//! Pure answer validation: no I/O, no async.
//!
//! Interview answers end up inside JSON keys, unit files and shell commands,
//! so identifiers are checked against strict patterns before they are kept.

use regex::Regex;
use std::sync::LazyLock;

/// Discord snowflake: 15–21 decimal digits.
pub static SNOWFLAKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern, cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[0-9]{15,21}$").expect("valid regex")
});

/// Ollama model reference, e.g. `llama3.2:3b` or `library/qwen2.5:1.5b`.
pub static MODEL_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9][a-z0-9._/-]{0,127}(:[A-Za-z0-9._-]{1,64})?$").expect("valid regex")
});

/// Whether `id` looks like a Discord guild or user id.
#[must_use]
pub fn is_valid_snowflake(id: &str) -> bool {
    SNOWFLAKE_RE.is_match(id)
}

/// Whether `name` is a safe Ollama model reference.
#[must_use]
pub fn is_valid_model_name(name: &str) -> bool {
    MODEL_NAME_RE.is_match(name)
}
