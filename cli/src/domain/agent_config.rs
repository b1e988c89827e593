//! Structured agent configuration built from independent optional fragments.
//!
//! Each fragment is a typed sub-object gated on one profile field; the
//! serializer guarantees well-formed JSON for every combination of present
//! and absent fields.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::env_file::{DISCORD_TOKEN_KEY, SEARCH_KEY};
use crate::domain::layout::InstallLayout;
use crate::domain::profile::{CloudProvider, ConfigurationProfile, DiscordProfile, NonEmptyString};
use crate::domain::settings::Settings;

/// Model identifier written when no LLM source is configured yet.
pub const MODEL_PLACEHOLDER: &str = "skip-for-now";

// ── Schema ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentConfig {
    pub gateway: GatewayConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<ChannelsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchConfig>,
    pub browser: BrowserConfig,
    pub agents: AgentsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayConfig {
    pub mode: String,
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelsConfig {
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordConfig {
    pub enabled: bool,
    /// Environment reference, resolved by the agent at startup.
    pub token: String,
    pub allow_from: Vec<String>,
    pub guilds: BTreeMap<String, GuildConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildConfig {
    pub require_mention: bool,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    pub enabled: bool,
    pub provider: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfig {
    pub enabled: bool,
    pub headless: bool,
    pub executable_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentsConfig {
    pub defaults: AgentDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentDefaults {
    pub model: ModelConfig,
    pub workspace: String,
    pub sandbox: SandboxConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelConfig {
    pub primary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SandboxConfig {
    pub mode: String,
}

// ── Model selection ──────────────────────────────────────────────────────────

/// Result of the default-model precedence table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultModel {
    Local(String),
    Cloud(CloudProvider),
    Unconfigured,
}

impl DefaultModel {
    #[must_use]
    pub fn identifier(&self) -> String {
        match self {
            Self::Local(model) => format!("ollama/{model}"),
            Self::Cloud(provider) => provider.default_model().to_string(),
            Self::Unconfigured => MODEL_PLACEHOLDER.to_string(),
        }
    }
}

/// Explicit local model beats any cloud credential; among cloud credentials
/// the first in [`CloudProvider::PRECEDENCE`] wins.
#[must_use]
pub fn select_default_model(
    local_model: Option<&NonEmptyString>,
    configured: &[CloudProvider],
) -> DefaultModel {
    if let Some(model) = local_model {
        return DefaultModel::Local(model.as_str().to_string());
    }
    CloudProvider::PRECEDENCE
        .into_iter()
        .find(|p| configured.contains(p))
        .map_or(DefaultModel::Unconfigured, DefaultModel::Cloud)
}

// ── Fragments ────────────────────────────────────────────────────────────────

/// Messaging fragment. Guild block and owner allow-list are independent.
#[must_use]
pub fn discord_fragment(discord: &DiscordProfile) -> DiscordConfig {
    let owner: Vec<String> = discord
        .owner_id
        .iter()
        .map(|id| id.as_str().to_string())
        .collect();

    let guilds = discord
        .guild_id
        .iter()
        .map(|guild| {
            (
                guild.as_str().to_string(),
                GuildConfig {
                    require_mention: owner.is_empty(),
                    users: owner.clone(),
                },
            )
        })
        .collect();

    DiscordConfig {
        enabled: true,
        token: env_ref(DISCORD_TOKEN_KEY),
        allow_from: owner,
        guilds,
    }
}

/// Search fragment.
#[must_use]
pub fn search_fragment() -> SearchConfig {
    SearchConfig {
        enabled: true,
        provider: "brave".to_string(),
        api_key: env_ref(SEARCH_KEY),
    }
}

/// Compose the full configuration.
///
/// `configured` lists every cloud provider with a key available to the
/// service, including keys captured by earlier runs.
#[must_use]
pub fn build(
    profile: &ConfigurationProfile,
    configured: &[CloudProvider],
    settings: &Settings,
    layout: &InstallLayout,
) -> AgentConfig {
    let model = select_default_model(profile.local_model.as_ref(), configured);
    AgentConfig {
        gateway: GatewayConfig {
            mode: "local".to_string(),
            bind: "loopback".to_string(),
            port: settings.agent.gateway_port,
        },
        channels: profile.discord.as_ref().map(|d| ChannelsConfig {
            discord: discord_fragment(d),
        }),
        search: profile.search_api_key.as_ref().map(|_| search_fragment()),
        browser: BrowserConfig {
            enabled: settings.browser.enabled,
            headless: true,
            executable_path: settings.browser.executable.clone(),
        },
        agents: AgentsConfig {
            defaults: AgentDefaults {
                model: ModelConfig {
                    primary: model.identifier(),
                },
                workspace: layout.workspace_dir.display().to_string(),
                sandbox: SandboxConfig {
                    mode: settings.agent.sandbox_mode.clone(),
                },
            },
        },
    }
}

/// Pretty JSON with a trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(config: &AgentConfig) -> Result<String> {
    let mut out = serde_json::to_string_pretty(config).context("serializing agent config")?;
    out.push('\n');
    Ok(out)
}

// ── Configs on disk ──────────────────────────────────────────────────────────

/// Dotted path of the default model.
pub const MODEL_FRAGMENT: &str = "agents.defaults.model.primary";
/// Dotted path of the messaging fragment.
pub const DISCORD_FRAGMENT: &str = "channels.discord";
/// Dotted path of the search fragment.
pub const SEARCH_FRAGMENT: &str = "search";

/// Optional capabilities a structured config actually carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfiguredFeatures {
    /// A default model other than [`MODEL_PLACEHOLDER`].
    pub model: bool,
    pub discord: bool,
    pub search: bool,
}

/// Inspect a config file's content. `None` when it is not valid JSON.
#[must_use]
pub fn configured_features(existing: &str) -> Option<ConfiguredFeatures> {
    let value = serde_json::from_str::<serde_json::Value>(existing).ok()?;
    let primary = value
        .pointer("/agents/defaults/model/primary")
        .and_then(serde_json::Value::as_str);
    Some(ConfiguredFeatures {
        model: primary.is_some_and(|p| !p.is_empty() && p != MODEL_PLACEHOLDER),
        discord: value.pointer("/channels/discord").is_some(),
        search: value.pointer("/search").is_some(),
    })
}

/// Fragments the profile asks for that a preserved config does not contain.
///
/// Returns dotted key paths. An unparseable file yields `["(unparseable)"]`.
#[must_use]
pub fn missing_fragments(existing: &str, profile: &ConfigurationProfile) -> Vec<String> {
    let Some(features) = configured_features(existing) else {
        return vec!["(unparseable)".to_string()];
    };
    [
        (profile.discord.is_some() && !features.discord, DISCORD_FRAGMENT),
        (profile.search_api_key.is_some() && !features.search, SEARCH_FRAGMENT),
        (profile.has_model_source() && !features.model, MODEL_FRAGMENT),
    ]
    .into_iter()
    .filter(|(missing, _)| *missing)
    .map(|(_, fragment)| fragment.to_string())
    .collect()
}

fn env_ref(key: &str) -> String {
    format!("${{{key}}}")
}
