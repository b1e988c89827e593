//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod health_verifier;
pub mod host_probe;
pub mod interview;
pub mod provision;
pub mod registrar;
pub mod sequencer;
pub mod templates;
