//! Command implementations

pub mod doctor;
pub mod install;
pub mod version;
