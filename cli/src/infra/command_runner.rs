//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` runs host commands (`apt-get`, `npm`, `ollama`,
//! `systemctl`, the agent binary) with a hard timeout.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};

use crate::application::ports::CommandRunner;

/// Default timeout for short probes (`id`, `uname`, `command -v`, `node --version`).
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Production `CommandRunner` backed by `tokio::process`.
///
/// Dropping a `.output()` future on timeout does not reliably reap the
/// child, so the timeout branch of `tokio::select!` kills it explicitly.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        tracing::debug!(program, ?args, timeout_secs = timeout.as_secs(), "running command");
        let child = spawn(program, args, false)?;
        wait_with_timeout(child, program, None, timeout).await
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8]) -> Result<Output> {
        tracing::debug!(program, ?args, bytes = input.len(), "running command with stdin");
        let child = spawn(program, args, true)?;
        wait_with_timeout(child, program, Some(input), self.timeout).await
    }
}

fn spawn(program: &str, args: &[&str], piped_stdin: bool) -> Result<Child> {
    let stdin = if piped_stdin {
        Stdio::piped()
    } else {
        Stdio::inherit()
    };
    Command::new(program)
        .args(args)
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))
}

async fn read_all<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}

/// Feed `input`, drain stdout and stderr, and wait, killing the child if
/// `timeout` elapses first.
async fn wait_with_timeout(
    mut child: Child,
    program: &str,
    input: Option<&[u8]>,
    timeout: Duration,
) -> Result<Output> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let feed = async move {
        if let (Some(mut pipe), Some(bytes)) = (stdin, input) {
            let _ = pipe.write_all(bytes).await;
            // Dropping the pipe closes it so readers like `tee` see EOF.
        }
    };

    tokio::select! {
        result = async {
            let ((), status, stdout, stderr) =
                tokio::join!(feed, child.wait(), read_all(stdout), read_all(stderr));
            Ok(Output {
                status: status.with_context(|| format!("waiting for {program}"))?,
                stdout,
                stderr,
            })
        } => result,
        () = tokio::time::sleep(timeout) => {
            let _ = child.kill().await;
            tracing::warn!(program, "command timed out and was killed");
            anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
        }
    }
}
