//! Infrastructure implementation of the `SettingsStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::SettingsStore;
use crate::domain::settings::Settings;

/// Environment variable overriding the settings file location.
pub const SETTINGS_ENV: &str = "PICLAW_SETTINGS";

/// Production implementation of `SettingsStore` that reads a YAML file.
///
/// Resolution order: explicit path (`--settings`), `PICLAW_SETTINGS`,
/// `<config dir>/piclaw/settings.yaml`. A missing file means defaults.
#[derive(Debug, Default)]
pub struct YamlSettingsStore {
    explicit: Option<PathBuf>,
}

impl YamlSettingsStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }
}

impl SettingsStore for YamlSettingsStore {
    fn load(&self) -> Result<Settings> {
        let path = self.path()?;
        let settings = match std::fs::read_to_string(&path) {
            Ok(content) => serde_yaml::from_str::<Settings>(&content)
                .with_context(|| format!("cannot parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                Settings::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read {}", path.display()));
            }
        };
        settings
            .validate()
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        Ok(settings)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(SETTINGS_ENV) {
            return Ok(PathBuf::from(val));
        }
        let base =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("cannot determine config directory"))?;
        Ok(base.join("piclaw").join("settings.yaml"))
    }
}
