//! Persona templates compiled into the binary.

use include_dir::{Dir, include_dir};

use crate::domain::layout::PERSONA_DOCUMENTS;
use crate::domain::persona::PersonaTemplate;

static PERSONA_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets/persona");

/// Every persona document that has an embedded template, in write order.
#[must_use]
pub fn persona_templates() -> Vec<PersonaTemplate> {
    PERSONA_DOCUMENTS
        .iter()
        .filter_map(|name| {
            let body = PERSONA_TEMPLATES.get_file(name)?.contents_utf8()?;
            Some(PersonaTemplate {
                file_name: *name,
                body,
            })
        })
        .collect()
}
