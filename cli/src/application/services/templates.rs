//! Application service: applying generated artifacts to disk.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Rendering is pure (`crate::domain`); this module reads what is on disk,
//! asks `plan_write` what to do, and carries the decision out.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::application::ports::LocalFs;
use crate::domain::agent_config;
use crate::domain::artifact::{GeneratedArtifact, WriteOutcome, WritePolicy, contains_line, plan_write};
use crate::domain::env_file::{self, EnvEntry};
use crate::domain::layout::InstallLayout;
use crate::domain::persona::{self, PersonaTemplate};
use crate::domain::profile::ConfigurationProfile;
use crate::domain::settings::Settings;
use crate::domain::shell_profile;

/// Permission bits of the secrets file.
pub const SECRETS_MODE: u32 = 0o600;
/// Permission bits of the config directory.
pub const CONFIG_DIR_MODE: u32 = 0o700;

/// Apply one artifact according to its write policy.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written.
pub fn apply_artifact(fs: &impl LocalFs, artifact: &GeneratedArtifact) -> Result<WriteOutcome> {
    let existing = fs.read_to_string(&artifact.path)?;
    let (content, outcome) = plan_write(existing.as_deref(), &artifact.policy, &artifact.content);
    match (content, artifact.mode) {
        (Some(content), Some(mode)) => fs.write_private(&artifact.path, &content, mode)?,
        (Some(content), None) => fs.write(&artifact.path, &content)?,
        (None, _) => {}
    }
    tracing::debug!(path = %artifact.path.display(), ?outcome, "artifact applied");
    Ok(outcome)
}

/// Rewrite the environment-secrets file, keeping secrets from earlier runs.
///
/// Returns the entries now on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written.
pub fn write_env_secrets(
    fs: &impl LocalFs,
    profile: &ConfigurationProfile,
    layout: &InstallLayout,
    now: DateTime<Utc>,
) -> Result<Vec<EnvEntry>> {
    let existing = fs
        .read_to_string(&layout.env_file)?
        .map(|c| env_file::parse(&c))
        .unwrap_or_default();
    let merged = env_file::merge(&existing, &env_file::captured(profile));
    apply_artifact(
        fs,
        &GeneratedArtifact {
            path: layout.env_file.clone(),
            content: env_file::render(&merged, now),
            policy: WritePolicy::Replace,
            mode: Some(SECRETS_MODE),
        },
    )?;
    tracing::debug!(keys = merged.len(), "environment secrets written");
    Ok(merged)
}

/// Create the structured config unless one already exists.
///
/// `secrets` are the entries just written to the environment file; the
/// default model is chosen from every cloud key they contain.
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
pub fn write_structured_config(
    fs: &impl LocalFs,
    profile: &ConfigurationProfile,
    secrets: &[EnvEntry],
    settings: &Settings,
    layout: &InstallLayout,
) -> Result<WriteOutcome> {
    let configured = env_file::configured_providers(secrets);
    let config = agent_config::build(profile, &configured, settings, layout);
    apply_artifact(
        fs,
        &GeneratedArtifact {
            path: layout.config_file.clone(),
            content: agent_config::render(&config)?,
            policy: WritePolicy::CreateIfAbsent,
            mode: None,
        },
    )
}

/// Fragments this run asked for that a preserved config lacks.
///
/// # Errors
///
/// Returns an error if the config exists but cannot be read.
pub fn audit_preserved_config(
    fs: &impl LocalFs,
    profile: &ConfigurationProfile,
    layout: &InstallLayout,
) -> Result<Vec<String>> {
    Ok(fs
        .read_to_string(&layout.config_file)?
        .map(|existing| agent_config::missing_fragments(&existing, profile))
        .unwrap_or_default())
}

/// Persona documents as create-if-absent artifacts.
#[must_use]
pub fn persona_artifacts(
    templates: &[PersonaTemplate],
    profile: &ConfigurationProfile,
    layout: &InstallLayout,
) -> Vec<GeneratedArtifact> {
    templates
        .iter()
        .map(|t| GeneratedArtifact {
            path: layout.workspace_dir.join(t.file_name),
            content: persona::render(t.body, &profile.agent_name),
            policy: WritePolicy::CreateIfAbsent,
            mode: None,
        })
        .collect()
}

/// Write every persona document that does not exist yet.
///
/// # Errors
///
/// Returns an error on the first document that cannot be written.
pub fn write_persona_docs(
    fs: &impl LocalFs,
    templates: &[PersonaTemplate],
    profile: &ConfigurationProfile,
    layout: &InstallLayout,
) -> Result<Vec<WriteOutcome>> {
    persona_artifacts(templates, profile, layout)
        .iter()
        .map(|a| apply_artifact(fs, a))
        .collect()
}

/// Append the PATH and alias blocks that are not present yet.
///
/// # Errors
///
/// Returns an error if the shell rc file cannot be read or written.
pub fn write_shell_profile(
    fs: &impl LocalFs,
    settings: &Settings,
    layout: &InstallLayout,
) -> Result<Vec<WriteOutcome>> {
    shell_profile::artifacts(settings, layout)
        .iter()
        .map(|a| apply_artifact(fs, a))
        .collect()
}

/// Whether both shell blocks are already in the rc file.
///
/// # Errors
///
/// Returns an error if the rc file exists but cannot be read.
pub fn shell_profile_present(
    fs: &impl LocalFs,
    settings: &Settings,
    layout: &InstallLayout,
) -> Result<bool> {
    let Some(current) = fs.read_to_string(&layout.shell_rc)? else {
        return Ok(false);
    };
    Ok(shell_profile::artifacts(settings, layout)
        .iter()
        .all(|a| match &a.policy {
            WritePolicy::AppendIfMissingLine { marker } => {
                contains_line(&current, marker)
            }
            _ => false,
        }))
}
