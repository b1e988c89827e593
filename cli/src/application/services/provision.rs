//! Application service: the `install` use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Order: host probe, privilege and architecture gates, "proceed?" gate,
//! interview, phase sequence, "start now?" gate, summary. Nothing on the
//! host changes before the interview has finished.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::application::ports::{CommandRunner, LocalFs, ProgressReporter, Prompter};
use crate::application::services::health_verifier;
use crate::application::services::host_probe::{
    self, has_local_model, is_on_path, node_major, run_checked,
};
use crate::application::services::interview::collect_profile;
use crate::application::services::registrar::{register, resolve_agent_binary, start_service};
use crate::application::services::sequencer::{PhaseHandler, run_phases};
use crate::application::services::templates::{self, CONFIG_DIR_MODE};
use crate::domain::env_file::EnvEntry;
use crate::domain::error::ProvisionError;
use crate::domain::host::{self, ArchVerdict, HostFacts};
use crate::domain::layout::InstallLayout;
use crate::domain::persona::PersonaTemplate;
use crate::domain::phase::{PhaseId, Readiness, phase_plan};
use crate::domain::profile::ConfigurationProfile;
use crate::domain::service::ServiceDescriptor;
use crate::domain::settings::Settings;
use crate::domain::summary::{ProvisionSummary, SummaryInputs, collect_gaps};

/// Operator flags for one install run.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Continue on an unsupported architecture without asking.
    pub allow_unsupported_arch: bool,
}

/// Ports the install use-case talks through.
pub struct InstallPorts<'a, C, F, P, R> {
    pub runner: &'a C,
    pub fs: &'a F,
    pub prompter: &'a P,
    pub reporter: &'a R,
}

/// Provision the host.
///
/// # Errors
///
/// Returns [`ProvisionError::ElevatedPrivileges`] when run as root,
/// [`ProvisionError::UnsupportedArchitecture`] or [`ProvisionError::Declined`]
/// when the operator stops at the first gate, and
/// [`ProvisionError::PhaseFailed`] when a fatal phase fails.
pub async fn run_install<C, F, P, R>(
    ports: &InstallPorts<'_, C, F, P, R>,
    settings: &Settings,
    layout: &InstallLayout,
    personas: &[PersonaTemplate],
    options: InstallOptions,
) -> Result<ProvisionSummary>
where
    C: CommandRunner,
    F: LocalFs,
    P: Prompter,
    R: ProgressReporter,
{
    let facts = host_probe::probe_host(ports.runner).await?;
    host::check_privileges(facts.uid)?;
    initial_gate(ports, settings, &facts, options)?;

    let profile = collect_profile(ports.prompter, ports.reporter, settings)?;
    let plan = phase_plan(
        settings,
        profile.local_model.as_ref().map(|m| m.as_str()),
    );

    let mut phases = ProvisionPhases {
        runner: ports.runner,
        fs: ports.fs,
        reporter: ports.reporter,
        settings,
        layout,
        profile: &profile,
        facts: &facts,
        personas,
        now: Utc::now(),
        secrets: Vec::new(),
        preserved_missing: Vec::new(),
        agent_binary: None,
    };
    let report = run_phases(&plan, &mut phases, ports.reporter).await?;

    let service_started = final_gate(ports, settings).await?;

    let config = ports.fs.read_to_string(&layout.config_file)?;
    let gaps = collect_gaps(&SummaryInputs {
        report: &report,
        config: config.as_deref(),
        preserved_missing: &phases.preserved_missing,
        service_started,
        settings,
        layout,
    });
    Ok(ProvisionSummary {
        report,
        service_started,
        gaps,
    })
}

fn initial_gate<C, F, P, R>(
    ports: &InstallPorts<'_, C, F, P, R>,
    settings: &Settings,
    facts: &HostFacts,
    options: InstallOptions,
) -> Result<()>
where
    P: Prompter,
    R: ProgressReporter,
{
    match host::check_architecture(
        &facts.arch,
        &settings.host.supported_arch,
        options.allow_unsupported_arch,
    ) {
        Ok(ArchVerdict::Supported) => {}
        Ok(ArchVerdict::Overridden) => {
            ports
                .reporter
                .warn(&format!("Continuing on unsupported architecture {}", facts.arch));
        }
        Err(e) => {
            let prompt = format!(
                "Architecture {} is not supported. Continue anyway? [y/N]",
                facts.arch
            );
            if !ports.prompter.confirm(&prompt)? {
                return Err(e);
            }
            ports
                .reporter
                .warn(&format!("Continuing on unsupported architecture {}", facts.arch));
        }
    }

    let prompt = format!(
        "Install and configure {} for user {}? [y/N]",
        settings.agent.binary, facts.user
    );
    if !ports.prompter.confirm(&prompt)? {
        return Err(ProvisionError::Declined.into());
    }
    Ok(())
}

/// Returns whether the service is running afterwards.
async fn final_gate<C, F, P, R>(
    ports: &InstallPorts<'_, C, F, P, R>,
    settings: &Settings,
) -> Result<bool>
where
    C: CommandRunner,
    P: Prompter,
    R: ProgressReporter,
{
    let unit = &settings.agent.unit_name;
    if !ports
        .prompter
        .confirm(&format!("Start the {unit} service now? [y/N]"))?
    {
        ports
            .reporter
            .step(&format!("Start it later with: sudo systemctl start {unit}"));
        return Ok(false);
    }
    match start_service(ports.runner, unit, settings.timeouts.probe()).await {
        Ok(()) => {
            ports.reporter.success(&format!("{unit} started"));
            Ok(true)
        }
        Err(e) => {
            ports.reporter.warn(&format!("could not start {unit}: {e:#}"));
            Ok(false)
        }
    }
}

// ── Phase handler ─────────────────────────────────────────────────────────────

/// Preconditions and actions of every install phase.
///
/// Holds what later phases need from earlier ones: the secrets written to
/// disk and the resolved agent binary.
pub struct ProvisionPhases<'a, C, F, R> {
    pub runner: &'a C,
    pub fs: &'a F,
    pub reporter: &'a R,
    pub settings: &'a Settings,
    pub layout: &'a InstallLayout,
    pub profile: &'a ConfigurationProfile,
    pub facts: &'a HostFacts,
    pub personas: &'a [PersonaTemplate],
    pub now: DateTime<Utc>,
    /// Entries of the environment file after `environment-secrets`.
    pub secrets: Vec<EnvEntry>,
    /// Fragments missing from a preserved structured config.
    pub preserved_missing: Vec<String>,
    pub agent_binary: Option<PathBuf>,
}

impl<C, F, R> ProvisionPhases<'_, C, F, R>
where
    C: CommandRunner,
    F: LocalFs,
    R: ProgressReporter,
{
    async fn install(&self, program: &str, args: &[&str]) -> Result<()> {
        run_checked(self.runner, program, args, self.settings.timeouts.install())
            .await
            .map(|_| ())
    }

    fn local_model(&self) -> Option<&str> {
        self.profile.local_model.as_ref().map(|m| m.as_str())
    }

    async fn agent_binary(&mut self) -> Result<PathBuf> {
        if let Some(path) = &self.agent_binary {
            return Ok(path.clone());
        }
        let path =
            resolve_agent_binary(self.runner, self.fs, &self.settings.agent.binary, self.layout)
                .await?;
        self.agent_binary = Some(path.clone());
        Ok(path)
    }

    async fn check_model(&self, model: Option<&str>, reason: &str) -> Result<Readiness> {
        let Some(model) = model else {
            return Ok(Readiness::NotNeeded(reason.to_string()));
        };
        if has_local_model(self.runner, model).await? {
            Ok(Readiness::Done)
        } else {
            Ok(Readiness::Pending)
        }
    }

    async fn pull_model(&self, model: Option<&str>) -> Result<()> {
        let Some(model) = model else {
            return Ok(());
        };
        self.install("ollama", &["pull", model]).await
    }

    fn secondary_model(&self) -> Option<&str> {
        self.local_model()
            .and(self.settings.models.secondary_model.as_deref())
    }
}

impl<C, F, R> PhaseHandler for ProvisionPhases<'_, C, F, R>
where
    C: CommandRunner,
    F: LocalFs,
    R: ProgressReporter,
{
    async fn check(&mut self, id: PhaseId) -> Result<Readiness> {
        let settings = self.settings;
        let layout = self.layout;
        let done = |ok: bool| if ok { Readiness::Done } else { Readiness::Pending };

        Ok(match id {
            PhaseId::SystemPackages => {
                let mut all = true;
                for tool in &settings.host.required_tools {
                    all &= is_on_path(self.runner, tool).await;
                }
                done(all)
            }
            PhaseId::NodeRuntime => done(
                node_major(self.runner)
                    .await
                    .is_some_and(|major| major >= settings.host.node_major_min),
            ),
            PhaseId::AgentInstall => done(
                resolve_agent_binary(self.runner, self.fs, &settings.agent.binary, layout)
                    .await
                    .is_ok(),
            ),
            PhaseId::LocalModelRuntime => {
                if self.local_model().is_none() {
                    Readiness::NotNeeded("no local model selected".to_string())
                } else {
                    done(is_on_path(self.runner, "ollama").await)
                }
            }
            PhaseId::LocalModelPull => {
                self.check_model(self.local_model(), "no local model selected")
                    .await?
            }
            PhaseId::SecondaryModelPull => {
                self.check_model(self.secondary_model(), "no secondary model needed")
                    .await?
            }
            PhaseId::BrowserRuntime => {
                if settings.browser.enabled {
                    done(
                        self.fs.exists(std::path::Path::new(&settings.browser.executable))
                            || is_on_path(self.runner, &settings.browser.package).await,
                    )
                } else {
                    Readiness::NotNeeded("browser disabled in settings".to_string())
                }
            }
            PhaseId::WorkspaceDirs => done(layout.owned_dirs().iter().all(|d| self.fs.exists(d))),
            PhaseId::StructuredConfig => {
                if self.fs.exists(&layout.config_file) {
                    self.preserved_missing =
                        templates::audit_preserved_config(self.fs, self.profile, layout)?;
                    self.reporter.step(&format!(
                        "keeping existing {}",
                        layout.config_file.display()
                    ));
                    Readiness::Done
                } else {
                    Readiness::Pending
                }
            }
            PhaseId::PersonaDocuments => {
                done(layout.persona_paths().iter().all(|p| self.fs.exists(p)))
            }
            PhaseId::ShellProfile => {
                done(templates::shell_profile_present(self.fs, settings, layout)?)
            }
            PhaseId::EnvironmentSecrets | PhaseId::ServiceUnit | PhaseId::Diagnostics => {
                Readiness::Pending
            }
        })
    }

    async fn apply(&mut self, id: PhaseId) -> Result<()> {
        let settings = self.settings;
        let layout = self.layout;

        match id {
            PhaseId::SystemPackages => {
                self.install("sudo", &["apt-get", "update"]).await?;
                let mut args = vec!["apt-get", "install", "-y"];
                args.extend(settings.host.packages.iter().map(String::as_str));
                self.install("sudo", &args).await
            }
            PhaseId::NodeRuntime => {
                let setup_url = settings.host.node_setup_url.as_deref();
                if let Some(url) = setup_url {
                    self.install("sh", &["-c", &host::node_source_script(url)])
                        .await?;
                }
                let mut args = vec!["apt-get", "install", "-y"];
                args.extend(host::node_packages(setup_url));
                self.install("sudo", &args).await?;
                match node_major(self.runner).await {
                    Some(major) if major >= settings.host.node_major_min => Ok(()),
                    found => anyhow::bail!(
                        "Node.js {} or newer is required, found {}",
                        settings.host.node_major_min,
                        found.map_or_else(|| "none".to_string(), |m| m.to_string())
                    ),
                }
            }
            PhaseId::AgentInstall => {
                self.install("sudo", &["npm", "install", "-g", &settings.agent.npm_package])
                    .await?;
                self.agent_binary().await.map(|_| ())
            }
            PhaseId::LocalModelRuntime => {
                let script = format!("curl -fsSL {} | sh", settings.models.ollama_installer_url);
                self.install("sh", &["-c", &script]).await
            }
            PhaseId::LocalModelPull => self.pull_model(self.local_model()).await,
            PhaseId::SecondaryModelPull => self.pull_model(self.secondary_model()).await,
            PhaseId::BrowserRuntime => {
                self.install("sudo", &["apt-get", "install", "-y", &settings.browser.package])
                    .await
            }
            PhaseId::WorkspaceDirs => {
                for dir in layout.owned_dirs() {
                    self.fs.create_dir_all(dir)?;
                }
                self.fs.set_permissions(&layout.config_dir, CONFIG_DIR_MODE)
            }
            PhaseId::EnvironmentSecrets => {
                // The directory may predate this tool with a wider mode.
                self.fs.set_permissions(&layout.config_dir, CONFIG_DIR_MODE)?;
                self.secrets =
                    templates::write_env_secrets(self.fs, self.profile, layout, self.now)?;
                Ok(())
            }
            PhaseId::StructuredConfig => templates::write_structured_config(
                self.fs,
                self.profile,
                &self.secrets,
                settings,
                layout,
            )
            .map(|_| ()),
            PhaseId::PersonaDocuments => {
                templates::write_persona_docs(self.fs, self.personas, self.profile, layout)
                    .map(|_| ())
            }
            PhaseId::ShellProfile => {
                templates::write_shell_profile(self.fs, settings, layout).map(|_| ())
            }
            PhaseId::ServiceUnit => {
                let binary = self.agent_binary().await?;
                let descriptor = ServiceDescriptor::derive(
                    &binary,
                    &self.facts.user,
                    &self.facts.group,
                    settings,
                    layout,
                );
                register(self.runner, &descriptor, layout, settings.timeouts.probe()).await
            }
            PhaseId::Diagnostics => {
                let binary = self.agent_binary().await?;
                let report =
                    health_verifier::verify(self.runner, &binary, settings.timeouts.doctor())
                        .await;
                if report.passed {
                    return Ok(());
                }
                for line in &report.excerpt {
                    self.reporter.warn(&format!("  {line}"));
                }
                anyhow::bail!(report.headline())
            }
        }
    }
}
