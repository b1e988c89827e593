//! Final run summary: what was done and what remains unconfigured.
//!
//! Pure functions only; rendering lives in `output::human`. Capability gaps
//! are read from the structured config as it is on disk after the run, since
//! that file, not this run's answers, is what the agent loads.

use crate::domain::agent_config::{
    self, ConfiguredFeatures, DISCORD_FRAGMENT, MODEL_FRAGMENT, SEARCH_FRAGMENT,
};
use crate::domain::layout::InstallLayout;
use crate::domain::phase::{PhaseOutcome, RunReport};
use crate::domain::settings::Settings;

/// Something the operator still has to do, with the command that does it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gap {
    pub what: String,
    pub remediation: String,
}

/// Result of a completed (non-fatal) provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub report: RunReport,
    pub service_started: bool,
    pub gaps: Vec<Gap>,
}

/// Inputs gathered by the provision use-case.
pub struct SummaryInputs<'a> {
    pub report: &'a RunReport,
    /// Structured config content after the run; `None` if the file is absent.
    pub config: Option<&'a str>,
    /// Fragments this run asked for that a preserved config lacks.
    pub preserved_missing: &'a [String],
    pub service_started: bool,
    pub settings: &'a Settings,
    pub layout: &'a InstallLayout,
}

/// Collect every gap, failed phases first.
#[must_use]
pub fn collect_gaps(inputs: &SummaryInputs<'_>) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let unit = &inputs.settings.agent.unit_name;

    for record in inputs.report.failures() {
        if let PhaseOutcome::Failed(message) = &record.outcome {
            gaps.push(Gap {
                what: format!("{} failed: {message}", record.id.describe()),
                remediation: record.remediation.clone(),
            });
        }
    }

    gaps.extend(config_gaps(inputs));

    if !inputs.service_started {
        gaps.push(Gap {
            what: "Service is enabled but not running".to_string(),
            remediation: format!("sudo systemctl start {unit}"),
        });
    }
    gaps
}

/// The config is create-if-absent, so every capability gap is closed by
/// moving it aside and installing again.
fn config_gaps(inputs: &SummaryInputs<'_>) -> Vec<Gap> {
    let config = inputs.layout.config_file.display();
    let rebuild = format!("mv {config} {config}.bak && piclaw install");

    let Some(content) = inputs.config else {
        return vec![Gap {
            what: format!("{config} does not exist"),
            remediation: "piclaw install".to_string(),
        }];
    };
    let Some(ConfiguredFeatures {
        model,
        discord,
        search,
    }) = agent_config::configured_features(content)
    else {
        return vec![Gap {
            what: format!("{config} is not valid JSON"),
            remediation: rebuild,
        }];
    };

    [
        (
            model,
            MODEL_FRAGMENT,
            "No LLM provider configured",
            "choose an LLM provider",
        ),
        (
            discord,
            DISCORD_FRAGMENT,
            "Discord is not connected",
            "answer yes to the Discord question",
        ),
        (
            search,
            SEARCH_FRAGMENT,
            "Web search is disabled",
            "answer yes to the web search question",
        ),
    ]
    .into_iter()
    .filter(|(present, ..)| !present)
    .map(|(_, fragment, label, hint)| {
        let what = if inputs.preserved_missing.iter().any(|m| m == fragment) {
            format!("Existing {config} was preserved and lacks `{fragment}`")
        } else {
            label.to_string()
        };
        Gap {
            what,
            remediation: format!("{rebuild}   ({hint})"),
        }
    })
    .collect()
}
