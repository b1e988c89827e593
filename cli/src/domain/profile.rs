//! The configuration profile accumulated by the operator interview.
//!
//! Pure types only. Absence of a value is always `None`; an empty string can
//! never be stored because both newtypes reject blank input at construction.

use std::fmt;

// ── Value newtypes ────────────────────────────────────────────────────────────

/// A trimmed string that is guaranteed not to be empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Returns `None` when `value` is empty or whitespace-only.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A non-empty secret value. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(NonEmptyString);

impl Secret {
    /// Returns `None` when `value` is empty or whitespace-only.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        NonEmptyString::new(value).map(Self)
    }

    /// The raw secret. Callers must not log it.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

// ── Providers ─────────────────────────────────────────────────────────────────

/// Cloud LLM providers that carry a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CloudProvider {
    /// Primary cloud provider.
    Anthropic,
    /// Secondary cloud provider.
    OpenAi,
    /// Aggregator.
    OpenRouter,
    Gemini,
}

impl CloudProvider {
    /// All providers in default-model precedence order.
    pub const PRECEDENCE: [CloudProvider; 4] = [
        CloudProvider::Anthropic,
        CloudProvider::OpenAi,
        CloudProvider::OpenRouter,
        CloudProvider::Gemini,
    ];

    /// Environment variable holding this provider's key.
    #[must_use]
    pub fn env_key(self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Human-readable menu label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Anthropic => "Anthropic (Claude)",
            Self::OpenAi => "OpenAI",
            Self::OpenRouter => "OpenRouter (many models, one key)",
            Self::Gemini => "Google Gemini",
        }
    }

    /// Model identifier used when this provider is the selected default.
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic/claude-sonnet-4-5",
            Self::OpenAi => "openai/gpt-4o",
            Self::OpenRouter => "openrouter/anthropic/claude-sonnet-4-5",
            Self::Gemini => "google/gemini-2.5-flash",
        }
    }
}

/// The single credential captured for the provider picked from the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCredential {
    pub provider: CloudProvider,
    pub api_key: Secret,
}

// ── Messaging ─────────────────────────────────────────────────────────────────

/// Discord bot settings. Guild and owner only exist alongside a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordProfile {
    pub token: Secret,
    pub guild_id: Option<NonEmptyString>,
    pub owner_id: Option<NonEmptyString>,
}

// ── Profile ───────────────────────────────────────────────────────────────────

/// Persona name used when the operator accepts the default.
pub const DEFAULT_AGENT_NAME: &str = "Claw";

/// Everything the interview collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationProfile {
    /// `None` means "configure later".
    pub provider: Option<ProviderCredential>,
    /// Explicit local model served by Ollama, e.g. `llama3.2:3b`.
    pub local_model: Option<NonEmptyString>,
    pub discord: Option<DiscordProfile>,
    /// Brave search API key.
    pub search_api_key: Option<Secret>,
    pub agent_name: NonEmptyString,
}

impl Default for ConfigurationProfile {
    fn default() -> Self {
        Self {
            provider: None,
            local_model: None,
            discord: None,
            search_api_key: None,
            agent_name: NonEmptyString(DEFAULT_AGENT_NAME.to_string()),
        }
    }
}

impl ConfigurationProfile {
    /// Whether any way of talking to an LLM was configured this run.
    #[must_use]
    pub fn has_model_source(&self) -> bool {
        self.provider.is_some() || self.local_model.is_some()
    }
}
