//! Environment-secrets artifact: `KEY=VALUE` lines keyed by variable name.
//!
//! The file is rewritten on every run from the merge of what is already on
//! disk and what the interview captured. Empty values never survive a merge,
//! so no `KEY=` line can ever be written.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::profile::{CloudProvider, ConfigurationProfile};

pub const DISCORD_TOKEN_KEY: &str = "DISCORD_BOT_TOKEN";
pub const SEARCH_KEY: &str = "BRAVE_API_KEY";

/// Order in which known keys are emitted. Unknown keys follow in file order.
pub const CANONICAL_KEYS: &[&str] = &[
    "ANTHROPIC_API_KEY",
    "OPENAI_API_KEY",
    "OPENROUTER_API_KEY",
    "GEMINI_API_KEY",
    DISCORD_TOKEN_KEY,
    SEARCH_KEY,
];

/// One `KEY=VALUE` pair. `value` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
}

/// Parse existing file content. Comments, blank lines, malformed lines and
/// empty values are dropped; a later duplicate key wins.
#[must_use]
pub fn parse(content: &str) -> Vec<EnvEntry> {
    let mut entries: Vec<EnvEntry> = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        upsert(&mut entries, key, value);
    }
    entries
}

/// Secrets captured this run, as entries.
#[must_use]
pub fn captured(profile: &ConfigurationProfile) -> Vec<EnvEntry> {
    let mut out = Vec::new();
    if let Some(cred) = &profile.provider {
        out.push(entry(cred.provider.env_key(), cred.api_key.expose()));
    }
    if let Some(discord) = &profile.discord {
        out.push(entry(DISCORD_TOKEN_KEY, discord.token.expose()));
    }
    if let Some(key) = &profile.search_api_key {
        out.push(entry(SEARCH_KEY, key.expose()));
    }
    out
}

/// Merge fresh values over existing ones and order the result.
///
/// Fresh values replace existing values for the same key; keys only present
/// on disk are kept so secrets captured by an earlier run are not lost.
#[must_use]
pub fn merge(existing: &[EnvEntry], fresh: &[EnvEntry]) -> Vec<EnvEntry> {
    let mut merged: Vec<EnvEntry> = Vec::new();
    for e in existing.iter().chain(fresh) {
        if !e.value.is_empty() {
            upsert(&mut merged, &e.key, &e.value);
        }
    }

    let mut ordered: Vec<EnvEntry> = CANONICAL_KEYS
        .iter()
        .filter_map(|k| merged.iter().find(|e| e.key == *k).cloned())
        .collect();
    ordered.extend(
        merged
            .into_iter()
            .filter(|e| !CANONICAL_KEYS.contains(&e.key.as_str())),
    );
    ordered
}

/// Render the file with its generation header.
#[must_use]
pub fn render(entries: &[EnvEntry], generated_at: DateTime<Utc>) -> String {
    let mut out = format!(
        "# Generated by piclaw on {}\n# Secrets for the agent service. Keep this file private.\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    for e in entries.iter().filter(|e| !e.value.is_empty()) {
        out.push_str(&e.key);
        out.push('=');
        out.push_str(&e.value);
        out.push('\n');
    }
    out
}

/// Cloud providers with a key present, in precedence order.
#[must_use]
pub fn configured_providers(entries: &[EnvEntry]) -> Vec<CloudProvider> {
    CloudProvider::PRECEDENCE
        .into_iter()
        .filter(|p| entries.iter().any(|e| e.key == p.env_key()))
        .collect()
}

/// Whether `key` is present with a value.
#[must_use]
pub fn has_key(entries: &[EnvEntry], key: &str) -> bool {
    entries.iter().any(|e| e.key == key)
}

fn entry(key: &str, value: &str) -> EnvEntry {
    EnvEntry {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn upsert(entries: &mut Vec<EnvEntry>, key: &str, value: &str) {
    if let Some(existing) = entries.iter_mut().find(|e| e.key == key) {
        existing.value = value.to_string();
    } else {
        entries.push(entry(key, value));
    }
}
