//! Tests for the operator interview.

#![allow(clippy::expect_used)]

use piclaw::application::services::interview::collect_profile;
use piclaw::domain::profile::{CloudProvider, DEFAULT_AGENT_NAME};
use piclaw::domain::settings::Settings;

use crate::helpers::{Answer, NoopReporter, RecordingReporter, ScriptedPrompter};

const SKIP: usize = 5;
const LOCAL: usize = 4;

#[test]
fn test_collect_profile_cloud_provider_discord_and_search() {
    let prompter = ScriptedPrompter::new([
        Answer::Choice(1),
        Answer::Secret("sk-openai"),
        Answer::Line("YES"),
        Answer::Secret("discord-token"),
        Answer::Line("123456789012345678"),
        Answer::Line("876543210987654321"),
        Answer::Line("y"),
        Answer::Secret("brave"),
        Answer::Line("Nova"),
    ]);
    let profile =
        collect_profile(&prompter, &NoopReporter, &Settings::default()).expect("interview");

    let cred = profile.provider.expect("provider");
    assert_eq!(cred.provider, CloudProvider::OpenAi);
    assert_eq!(cred.api_key.expose(), "sk-openai");
    let discord = profile.discord.expect("discord");
    assert_eq!(discord.token.expose(), "discord-token");
    assert_eq!(
        discord.guild_id.as_ref().map(|g| g.as_str()),
        Some("123456789012345678")
    );
    assert_eq!(
        discord.owner_id.as_ref().map(|o| o.as_str()),
        Some("876543210987654321")
    );
    assert_eq!(profile.search_api_key.map(|s| s.expose().to_string()), Some("brave".into()));
    assert_eq!(profile.agent_name.as_str(), "Nova");
    assert_eq!(prompter.remaining(), 0);
}

#[test]
fn test_collect_profile_skip_everything_uses_defaults() {
    let prompter = ScriptedPrompter::new([
        Answer::Choice(SKIP),
        Answer::Line(""),
        Answer::Line("nope"),
        Answer::Line("   "),
    ]);
    let reporter = RecordingReporter::default();
    let profile = collect_profile(&prompter, &reporter, &Settings::default()).expect("interview");

    assert!(profile.provider.is_none());
    assert!(profile.local_model.is_none());
    assert!(profile.discord.is_none());
    assert!(profile.search_api_key.is_none());
    assert_eq!(profile.agent_name.as_str(), DEFAULT_AGENT_NAME);
    assert!(reporter.warnings().iter().any(|w| w.contains("No LLM")));
}

#[test]
fn test_collect_profile_local_model_default_and_invalid_name() {
    let settings = Settings::default();
    let prompter = ScriptedPrompter::new([
        Answer::Choice(LOCAL),
        Answer::Line(""),
        Answer::Line("n"),
        Answer::Line("n"),
        Answer::Line(""),
    ]);
    let profile = collect_profile(&prompter, &NoopReporter, &settings).expect("interview");
    assert_eq!(
        profile.local_model.as_ref().map(|m| m.as_str()),
        Some(settings.models.default_local_model.as_str())
    );

    let prompter = ScriptedPrompter::new([
        Answer::Choice(LOCAL),
        Answer::Line("rm -rf /"),
        Answer::Line("n"),
        Answer::Line("n"),
        Answer::Line(""),
    ]);
    let reporter = RecordingReporter::default();
    let profile = collect_profile(&prompter, &reporter, &settings).expect("interview");
    assert_eq!(
        profile.local_model.as_ref().map(|m| m.as_str()),
        Some(settings.models.default_local_model.as_str())
    );
    assert_eq!(reporter.warnings().len(), 1);
}

#[test]
fn test_collect_profile_discord_ids_are_optional_and_validated() {
    let prompter = ScriptedPrompter::new([
        Answer::Choice(SKIP),
        Answer::Line("y"),
        Answer::Secret("discord-token"),
        Answer::Line("not-a-snowflake"),
        Answer::Line(""),
        Answer::Line("n"),
        Answer::Line(""),
    ]);
    let reporter = RecordingReporter::default();
    let profile = collect_profile(&prompter, &reporter, &Settings::default()).expect("interview");

    let discord = profile.discord.expect("token captured");
    assert!(discord.guild_id.is_none());
    assert!(discord.owner_id.is_none());
    assert!(
        reporter
            .warnings()
            .iter()
            .any(|w| w.contains("not-a-snowflake"))
    );
}

#[test]
fn test_collect_profile_secret_prompts_never_contain_values() {
    let prompter = ScriptedPrompter::new([
        Answer::Choice(0),
        Answer::Secret("sk-ant-secret"),
        Answer::Line("n"),
        Answer::Line("n"),
        Answer::Line(""),
    ]);
    collect_profile(&prompter, &NoopReporter, &Settings::default()).expect("interview");
    assert!(
        prompter
            .prompts()
            .iter()
            .all(|p| !p.contains("sk-ant-secret"))
    );
}
