//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod agent_config;
pub mod artifact;
pub mod env_file;
pub mod error;
pub mod health;
pub mod host;
pub mod input;
pub mod layout;
pub mod persona;
pub mod phase;
pub mod profile;
pub mod service;
pub mod settings;
pub mod shell_profile;
pub mod summary;
pub mod validate;

pub use error::{ProvisionError, SettingsError};
pub use layout::InstallLayout;
pub use phase::{FailurePolicy, PhaseId, PhaseOutcome, PhaseSpec, Readiness, RunReport};
pub use profile::{CloudProvider, ConfigurationProfile};
pub use settings::Settings;
