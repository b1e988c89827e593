//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `begin()` starts a spinner on a TTY, otherwise behaves like `step()`
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ! {message}"` to stderr (never suppressed)
///
/// `success()` and `warn()` finish the running spinner with their message.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    /// Whether a spinner is currently running.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.active.borrow().is_some()
    }

    fn take_spinner(&self) -> Option<ProgressBar> {
        self.active.borrow_mut().take()
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        let line = format!("  {} {message}", "→".style(self.ctx.styles.step));
        match self.active.borrow().as_ref() {
            Some(pb) => pb.println(line),
            None => println!("{line}"),
        }
    }

    fn begin(&self, message: &str) {
        if let Some(pb) = self.take_spinner() {
            pb.finish_and_clear();
        }
        if self.ctx.show_progress() {
            *self.active.borrow_mut() = Some(progress::spinner(message));
        } else {
            self.step(message);
        }
    }

    fn success(&self, message: &str) {
        match self.take_spinner() {
            Some(pb) => progress::finish_ok(&pb, message),
            None if !self.ctx.quiet => {
                println!("  {} {message}", "✓".style(self.ctx.styles.success));
            }
            None => {}
        }
    }

    fn warn(&self, message: &str) {
        match self.take_spinner() {
            Some(pb) => progress::finish_warn(&pb, message),
            None => eprintln!("  {} {message}", "!".style(self.ctx.styles.warning)),
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(pb) = self.active.get_mut().take() {
            pb.finish_and_clear();
        }
    }
}
