//! Phase model: identifiers, failure policies, preconditions and outcomes.
//!
//! The sequencer in `application::services::sequencer` interprets these
//! types; nothing here performs I/O.

use std::fmt;

use crate::domain::host;
use crate::domain::settings::Settings;

/// Stable identifiers for every provisioning phase, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseId {
    SystemPackages,
    NodeRuntime,
    AgentInstall,
    LocalModelRuntime,
    LocalModelPull,
    SecondaryModelPull,
    BrowserRuntime,
    WorkspaceDirs,
    EnvironmentSecrets,
    StructuredConfig,
    PersonaDocuments,
    ShellProfile,
    ServiceUnit,
    Diagnostics,
}

impl PhaseId {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SystemPackages => "system-packages",
            Self::NodeRuntime => "node-runtime",
            Self::AgentInstall => "agent-install",
            Self::LocalModelRuntime => "local-model-runtime",
            Self::LocalModelPull => "local-model-pull",
            Self::SecondaryModelPull => "secondary-model-pull",
            Self::BrowserRuntime => "browser-runtime",
            Self::WorkspaceDirs => "workspace-dirs",
            Self::EnvironmentSecrets => "environment-secrets",
            Self::StructuredConfig => "structured-config",
            Self::PersonaDocuments => "persona-documents",
            Self::ShellProfile => "shell-profile",
            Self::ServiceUnit => "service-unit",
            Self::Diagnostics => "diagnostics",
        }
    }

    /// One-line description shown while the phase runs.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::SystemPackages => "system packages",
            Self::NodeRuntime => "Node.js runtime",
            Self::AgentInstall => "agent install",
            Self::LocalModelRuntime => "Ollama runtime",
            Self::LocalModelPull => "local model",
            Self::SecondaryModelPull => "secondary local model",
            Self::BrowserRuntime => "headless browser",
            Self::WorkspaceDirs => "config directories",
            Self::EnvironmentSecrets => "environment secrets",
            Self::StructuredConfig => "agent configuration",
            Self::PersonaDocuments => "persona documents",
            Self::ShellProfile => "shell profile",
            Self::ServiceUnit => "systemd service",
            Self::Diagnostics => "health check",
        }
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens to the run when a phase fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole run with exit code 1.
    Fatal,
    /// Warn, record the gap, continue with the next phase.
    WarnAndContinue,
}

/// Result of a phase's precondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Effect already present; skip.
    Done,
    /// Phase does not apply to this profile; skip with a reason.
    NotNeeded(String),
    /// Action must run.
    Pending,
}

/// One entry of the phase plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSpec {
    pub id: PhaseId,
    pub policy: FailurePolicy,
    /// Command the operator can run to fill the gap if this phase fails.
    pub remediation: String,
}

/// How a phase ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    AlreadyDone,
    NotNeeded(String),
    Completed,
    Failed(String),
}

/// Outcome recorded for one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseRecord {
    pub id: PhaseId,
    pub outcome: PhaseOutcome,
    pub remediation: String,
}

/// Ordered outcomes of a sequencer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub records: Vec<PhaseRecord>,
}

impl RunReport {
    #[must_use]
    pub fn outcome(&self, id: PhaseId) -> Option<&PhaseOutcome> {
        self.records.iter().find(|r| r.id == id).map(|r| &r.outcome)
    }

    /// Records of warn-and-continue phases that failed.
    pub fn failures(&self) -> impl Iterator<Item = &PhaseRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, PhaseOutcome::Failed(_)))
    }
}

/// Build the full, ordered phase plan.
#[must_use]
pub fn phase_plan(settings: &Settings, local_model: Option<&str>) -> Vec<PhaseSpec> {
    use FailurePolicy::{Fatal, WarnAndContinue};

    let model = local_model.unwrap_or(&settings.models.default_local_model);
    let secondary = settings.models.secondary_model.as_deref().unwrap_or("<model>");
    let agent = &settings.agent;

    let spec = |id, policy, remediation: String| PhaseSpec {
        id,
        policy,
        remediation,
    };

    vec![
        spec(
            PhaseId::SystemPackages,
            Fatal,
            format!("sudo apt-get install -y {}", settings.host.packages.join(" ")),
        ),
        spec(
            PhaseId::NodeRuntime,
            Fatal,
            host::node_install_command(settings.host.node_setup_url.as_deref()),
        ),
        spec(
            PhaseId::AgentInstall,
            Fatal,
            format!("sudo npm install -g {}", agent.npm_package),
        ),
        spec(
            PhaseId::LocalModelRuntime,
            WarnAndContinue,
            format!(
                "curl -fsSL {} | sh",
                settings.models.ollama_installer_url
            ),
        ),
        spec(
            PhaseId::LocalModelPull,
            WarnAndContinue,
            format!("ollama pull {model}"),
        ),
        spec(
            PhaseId::SecondaryModelPull,
            WarnAndContinue,
            format!("ollama pull {secondary}"),
        ),
        spec(
            PhaseId::BrowserRuntime,
            WarnAndContinue,
            format!("sudo apt-get install -y {}", settings.browser.package),
        ),
        spec(PhaseId::WorkspaceDirs, Fatal, "piclaw install".to_string()),
        spec(PhaseId::EnvironmentSecrets, Fatal, "piclaw install".to_string()),
        spec(PhaseId::StructuredConfig, Fatal, "piclaw install".to_string()),
        spec(
            PhaseId::PersonaDocuments,
            WarnAndContinue,
            "piclaw install".to_string(),
        ),
        spec(
            PhaseId::ShellProfile,
            WarnAndContinue,
            "piclaw install".to_string(),
        ),
        spec(PhaseId::ServiceUnit, Fatal, "piclaw install".to_string()),
        spec(
            PhaseId::Diagnostics,
            WarnAndContinue,
            format!("{} doctor", agent.binary),
        ),
    ]
}
