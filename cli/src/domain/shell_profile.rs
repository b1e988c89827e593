//! Marker-guarded shell-profile blocks (PATH extension and aliases).

use crate::domain::artifact::{GeneratedArtifact, WritePolicy};
use crate::domain::layout::InstallLayout;
use crate::domain::settings::Settings;

pub const PATH_MARKER: &str = "# >>> piclaw path >>>";
const PATH_END: &str = "# <<< piclaw path <<<";
pub const ALIAS_MARKER: &str = "# >>> piclaw aliases >>>";
const ALIAS_END: &str = "# <<< piclaw aliases <<<";

/// PATH block exposing the user-level npm prefix.
#[must_use]
pub fn path_block() -> String {
    format!("{PATH_MARKER}\nexport PATH=\"$HOME/.npm-global/bin:$HOME/.local/bin:$PATH\"\n{PATH_END}\n")
}

/// Convenience aliases for the agent service.
#[must_use]
pub fn alias_block(settings: &Settings) -> String {
    let unit = &settings.agent.unit_name;
    let bin = &settings.agent.binary;
    format!(
        "{ALIAS_MARKER}\n\
         alias claw-status='systemctl status {unit}'\n\
         alias claw-logs='journalctl -u {unit} -f'\n\
         alias claw-restart='sudo systemctl restart {unit}'\n\
         alias claw-doctor='{bin} doctor'\n\
         {ALIAS_END}\n"
    )
}

/// Both blocks as append-if-missing artifacts targeting the shell rc file.
#[must_use]
pub fn artifacts(settings: &Settings, layout: &InstallLayout) -> Vec<GeneratedArtifact> {
    [(PATH_MARKER, path_block()), (ALIAS_MARKER, alias_block(settings))]
        .into_iter()
        .map(|(marker, content)| GeneratedArtifact {
            path: layout.shell_rc.clone(),
            content,
            policy: WritePolicy::AppendIfMissingLine {
                marker: marker.to_string(),
            },
            mode: None,
        })
        .collect()
}
