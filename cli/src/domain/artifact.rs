//! Generated artifacts and the write policies that protect operator edits.
//!
//! `plan_write` decides what a write would do given the current file
//! content; the filesystem adapter only carries the decision out.

use std::path::PathBuf;

/// How an artifact may touch an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WritePolicy {
    /// Never overwrite. An existing file is assumed operator-modified.
    CreateIfAbsent,
    /// Append the content unless a line equal to `marker` is already present.
    AppendIfMissingLine { marker: String },
    /// System-owned: always rewrite.
    Replace,
}

/// A rendered file ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub path: PathBuf,
    pub content: String,
    pub policy: WritePolicy,
    /// Unix permission bits applied after writing, e.g. `0o600`.
    pub mode: Option<u32>,
}

/// What applying an artifact did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    /// Existing file left untouched under `CreateIfAbsent`.
    Preserved,
    Appended,
    /// Marker already present under `AppendIfMissingLine`.
    AlreadyPresent,
    Replaced,
}

impl WriteOutcome {
    /// Whether the file on disk changed.
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, Self::Created | Self::Appended | Self::Replaced)
    }
}

/// Decide the new file content for `policy`.
///
/// Returns `(Some(content), outcome)` when the file must be written with
/// `content`, or `(None, outcome)` when it must be left alone.
#[must_use]
pub fn plan_write(
    existing: Option<&str>,
    policy: &WritePolicy,
    content: &str,
) -> (Option<String>, WriteOutcome) {
    match (policy, existing) {
        (WritePolicy::CreateIfAbsent, Some(_)) => (None, WriteOutcome::Preserved),
        (WritePolicy::CreateIfAbsent, None) => (Some(content.to_string()), WriteOutcome::Created),
        (WritePolicy::Replace, None) => (Some(content.to_string()), WriteOutcome::Created),
        (WritePolicy::Replace, Some(_)) => (Some(content.to_string()), WriteOutcome::Replaced),
        (WritePolicy::AppendIfMissingLine { .. }, None) => {
            (Some(content.to_string()), WriteOutcome::Created)
        }
        (WritePolicy::AppendIfMissingLine { marker }, Some(current)) => {
            if contains_line(current, marker) {
                return (None, WriteOutcome::AlreadyPresent);
            }
            let mut next = current.to_string();
            if !next.is_empty() && !next.ends_with('\n') {
                next.push('\n');
            }
            if !next.is_empty() {
                next.push('\n');
            }
            next.push_str(content);
            (Some(next), WriteOutcome::Appended)
        }
    }
}

/// Whether `haystack` has a line that equals `line` after trimming.
#[must_use]
pub fn contains_line(haystack: &str, line: &str) -> bool {
    let needle = line.trim();
    haystack.lines().any(|l| l.trim() == needle)
}
