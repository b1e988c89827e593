//! Persona document rendering.

use crate::domain::profile::NonEmptyString;

/// The only placeholder persona templates may contain.
pub const NAME_PLACEHOLDER: &str = "{{AGENT_NAME}}";

/// An embedded persona template and the file name it is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonaTemplate {
    pub file_name: &'static str,
    pub body: &'static str,
}

/// Substitute the display name into a persona template.
#[must_use]
pub fn render(template: &str, agent_name: &NonEmptyString) -> String {
    template.replace(NAME_PLACEHOLDER, agent_name.as_str())
}
