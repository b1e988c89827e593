//! Terminal implementation of the `Prompter` port, backed by `dialoguer`.

use anyhow::{Context, Result};
use dialoguer::{Input, Password, Select};

use crate::application::ports::{Prompter, ProgressReporter};
use crate::domain::input::{parse_confirmation, resolve_text};
use crate::domain::profile::Secret;

/// Reads answers from the controlling terminal.
pub struct DialoguerPrompter<'a, R> {
    reporter: &'a R,
}

impl<'a, R: ProgressReporter> DialoguerPrompter<'a, R> {
    #[must_use]
    pub fn new(reporter: &'a R) -> Self {
        Self { reporter }
    }

    fn line(prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("reading from terminal")
    }
}

impl<R: ProgressReporter> Prompter for DialoguerPrompter<'_, R> {
    fn secret(&self, prompt: &str) -> Result<Secret> {
        loop {
            let raw = Password::new()
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
                .context("reading secret from terminal")?;
            if let Some(secret) = Secret::new(raw) {
                return Ok(secret);
            }
            self.reporter.warn("A value is required.");
        }
    }

    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let prompt = match default {
            Some(d) => format!("{prompt} [{d}]"),
            None => prompt.to_string(),
        };
        Ok(resolve_text(&Self::line(&prompt)?, default))
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(parse_confirmation(&Self::line(prompt)?))
    }

    fn select(&self, prompt: &str, items: &[&str]) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .context("reading selection from terminal")
    }
}
