//! Application service: the operator interview.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Produces a [`ConfigurationProfile`] in which every captured field is
//! non-empty; anything skipped or invalid is simply absent.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, Prompter};
use crate::domain::profile::{
    CloudProvider, ConfigurationProfile, DEFAULT_AGENT_NAME, DiscordProfile, NonEmptyString,
    ProviderCredential,
};
use crate::domain::settings::Settings;
use crate::domain::validate::{is_valid_model_name, is_valid_snowflake};

/// Menu entries after the cloud providers.
const LOCAL_CHOICE: &str = "Local model via Ollama (no API key)";
const SKIP_CHOICE: &str = "Skip for now";

/// Ask every question and assemble the profile.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read.
pub fn collect_profile(
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    settings: &Settings,
) -> Result<ConfigurationProfile> {
    let mut profile = ConfigurationProfile::default();

    collect_model_source(prompter, reporter, settings, &mut profile)?;
    profile.discord = collect_discord(prompter, reporter)?;

    if prompter.confirm("Enable web search with a Brave Search API key? [y/N]")? {
        profile.search_api_key = Some(prompter.secret("Brave Search API key")?);
    }

    let name = prompter.text("Agent display name", Some(DEFAULT_AGENT_NAME))?;
    if let Some(name) = NonEmptyString::new(name) {
        profile.agent_name = name;
    }

    tracing::debug!(
        provider = ?profile.provider.as_ref().map(|c| c.provider),
        local_model = ?profile.local_model.as_ref().map(NonEmptyString::as_str),
        discord = profile.discord.is_some(),
        search = profile.search_api_key.is_some(),
        "interview complete"
    );
    Ok(profile)
}

fn collect_model_source(
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    settings: &Settings,
    profile: &mut ConfigurationProfile,
) -> Result<()> {
    let mut items: Vec<&str> = CloudProvider::PRECEDENCE
        .iter()
        .map(|p| p.label())
        .collect();
    items.push(LOCAL_CHOICE);
    items.push(SKIP_CHOICE);

    let choice = prompter.select("Which LLM should the agent use?", &items)?;
    if let Some(provider) = CloudProvider::PRECEDENCE.get(choice).copied() {
        let api_key = prompter.secret(&format!("{} API key", provider.label()))?;
        profile.provider = Some(ProviderCredential { provider, api_key });
    } else if items.get(choice) == Some(&LOCAL_CHOICE) {
        let default = settings.models.default_local_model.as_str();
        let model = prompter.text("Local model to pull", Some(default))?;
        let model = if is_valid_model_name(&model) {
            model
        } else {
            reporter.warn(&format!("'{model}' is not a valid model name, using {default}"));
            default.to_string()
        };
        profile.local_model = NonEmptyString::new(model);
    } else {
        reporter.warn("No LLM configured. The agent will not answer until a key is added.");
    }
    Ok(())
}

fn collect_discord(
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
) -> Result<Option<DiscordProfile>> {
    if !prompter.confirm("Connect a Discord bot? [y/N]")? {
        return Ok(None);
    }
    let token = prompter.secret("Discord bot token")?;
    let guild_id = optional_snowflake(
        prompter,
        reporter,
        "Discord server (guild) ID, blank for none",
    )?;
    let owner_id = optional_snowflake(prompter, reporter, "Your Discord user ID, blank for none")?;
    Ok(Some(DiscordProfile {
        token,
        guild_id,
        owner_id,
    }))
}

/// Optional Discord id; invalid input is reported and treated as absent.
fn optional_snowflake(
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    prompt: &str,
) -> Result<Option<NonEmptyString>> {
    let raw = prompter.text(prompt, None)?;
    let Some(id) = NonEmptyString::new(raw) else {
        return Ok(None);
    };
    if is_valid_snowflake(id.as_str()) {
        Ok(Some(id))
    } else {
        reporter.warn(&format!("'{id}' is not a Discord ID, ignoring it"));
        Ok(None)
    }
}
