//! Shared test helpers: output constructors and hand-written port mocks.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use piclaw::application::ports::{CommandRunner, ProgressReporter, Prompter};
use piclaw::domain::input::{parse_confirmation, resolve_text};
use piclaw::domain::layout::InstallLayout;
use piclaw::domain::profile::Secret;
use piclaw::domain::settings::Settings;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Recording command runner ─────────────────────────────────────────────────

/// One recorded invocation: the joined command line and any stdin.
#[derive(Debug, Clone)]
pub struct Call {
    pub line: String,
    pub stdin: Option<String>,
}

/// `CommandRunner` that answers from exact command-line rules and records
/// every call. Unknown commands succeed with empty output.
#[derive(Default)]
pub struct RecordingRunner {
    rules: Vec<(String, std::result::Result<Output, String>)>,
    /// Consumed on first match, before `rules` are consulted.
    one_shot: Mutex<Vec<(String, Output)>>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `line` with `output`. Later rules for the same line win.
    pub fn on(mut self, line: &str, output: Output) -> Self {
        self.rules.insert(0, (line.to_string(), Ok(output)));
        self
    }

    /// Answer the next run of `line` with `output`; later runs fall through
    /// to the regular rules. Queued answers are used in insertion order.
    pub fn once(self, line: &str, output: Output) -> Self {
        self.one_shot
            .lock()
            .expect("lock")
            .push((line.to_string(), output));
        self
    }

    /// Make `line` fail to run at all.
    pub fn fail(mut self, line: &str, message: &str) -> Self {
        self.rules.insert(0, (line.to_string(), Err(message.to_string())));
        self
    }

    /// Make `command -v <binary>` resolve to `path`.
    pub fn on_path(self, binary: &str, path: &str) -> Self {
        let line = which_line(binary);
        self.on(&line, ok_output(format!("{path}\n").as_bytes()))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.line).collect()
    }

    pub fn ran(&self, line: &str) -> bool {
        self.lines().iter().any(|l| l == line)
    }

    fn answer(&self, program: &str, args: &[&str], stdin: Option<&[u8]>) -> Result<Output> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().expect("lock").push(Call {
            line: line.clone(),
            stdin: stdin.map(|b| String::from_utf8_lossy(b).into_owned()),
        });
        {
            let mut one_shot = self.one_shot.lock().expect("lock");
            if let Some(pos) = one_shot.iter().position(|(l, _)| *l == line) {
                return Ok(one_shot.remove(pos).1);
            }
        }
        match self.rules.iter().find(|(l, _)| *l == line) {
            Some((_, Ok(output))) => Ok(output.clone()),
            Some((_, Err(message))) => anyhow::bail!("{message}"),
            None => Ok(ok_output(b"")),
        }
    }
}

/// The command line `which` runs for `binary`.
pub fn which_line(binary: &str) -> String {
    format!("sh -c command -v \"$1\" sh {binary}")
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.answer(program, args, None)
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Output> {
        self.answer(program, args, None)
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output> {
        self.answer(program, args, Some(stdin))
    }
}

/// A healthy aarch64 host for user `pi` with every prerequisite installed.
pub fn pi_host() -> RecordingRunner {
    RecordingRunner::new()
        .on("id -u", ok_output(b"1000\n"))
        .on("id -un", ok_output(b"pi\n"))
        .on("id -gn", ok_output(b"pi\n"))
        .on("uname -m", ok_output(b"aarch64\n"))
        .on_path("git", "/usr/bin/git")
        .on_path("curl", "/usr/bin/curl")
        .on_path("chromium", "/usr/bin/chromium")
        .on_path("openclaw", "/usr/bin/openclaw")
        .on("node --version", ok_output(b"v22.11.0\n"))
}

// ── Scripted prompter ────────────────────────────────────────────────────────

/// One scripted operator answer.
#[derive(Debug, Clone)]
pub enum Answer {
    /// Raw line typed at a text or confirmation prompt.
    Line(&'static str),
    /// Value typed at a masked prompt.
    Secret(&'static str),
    /// Menu index.
    Choice(usize),
}

/// `Prompter` that replays answers in order and records every prompt.
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Answer>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("lock").clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().expect("lock").len()
    }

    fn next(&self, prompt: &str) -> Result<Answer> {
        self.prompts.lock().expect("lock").push(prompt.to_string());
        self.answers
            .lock()
            .expect("lock")
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted answer for: {prompt}"))
    }
}

impl Prompter for ScriptedPrompter {
    fn secret(&self, prompt: &str) -> Result<Secret> {
        match self.next(prompt)? {
            Answer::Secret(value) => {
                Secret::new(value).ok_or_else(|| anyhow::anyhow!("empty scripted secret"))
            }
            other => anyhow::bail!("expected a secret for {prompt}, got {other:?}"),
        }
    }

    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        match self.next(prompt)? {
            Answer::Line(raw) => Ok(resolve_text(raw, default)),
            other => anyhow::bail!("expected a line for {prompt}, got {other:?}"),
        }
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        match self.next(prompt)? {
            Answer::Line(raw) => Ok(parse_confirmation(raw)),
            other => anyhow::bail!("expected a line for {prompt}, got {other:?}"),
        }
    }

    fn select(&self, prompt: &str, items: &[&str]) -> Result<usize> {
        match self.next(prompt)? {
            Answer::Choice(index) if index < items.len() => Ok(index),
            other => anyhow::bail!("expected a choice for {prompt}, got {other:?}"),
        }
    }
}

// ── Reporters ────────────────────────────────────────────────────────────────

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

/// Keeps every event for assertions, tagged `begin:`, `step:`, `ok:` or `warn:`.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock").clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("warn:").map(str::to_string))
            .collect()
    }

    fn record(&self, tag: &str, message: &str) {
        self.events
            .lock()
            .expect("lock")
            .push(format!("{tag}:{message}"));
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.record("step", message);
    }
    fn begin(&self, message: &str) {
        self.record("begin", message);
    }
    fn success(&self, message: &str) {
        self.record("ok", message);
    }
    fn warn(&self, message: &str) {
        self.record("warn", message);
    }
}

// ── Layout ───────────────────────────────────────────────────────────────────

pub fn layout_in(home: &Path) -> InstallLayout {
    InstallLayout::new(home, &Settings::default())
}
