// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shells out to run a job's command string (spec §4.2, §6.4).

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

/// Hard wall-clock timeout for a single command run.
pub const EXECUTION_TIMEOUT: Duration = Duration::from_secs(300);

/// Outcome of running a command. Never a Rust `Err` — infrastructural
/// failures (spawn failure, timeout) are reported as regular results with a
/// synthetic stderr, matching the Python original's subprocess wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs job commands via `sh -c`.
///
/// No shell-syntax translation or reinterpretation of the command string —
/// redirections, pipelines, and globs all work exactly as they would typed
/// at a shell prompt, because that's where they're evaluated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor {
    timeout: Option<Duration>,
}

impl Executor {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Override the default 300s timeout. Exposed for tests; production
    /// callers should use the default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn run(&self, command: &str) -> ExecOutput {
        let timeout = self.timeout.unwrap_or(EXECUTION_TIMEOUT);

        let spawned = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // If the timeout below fires, the in-flight `wait_with_output`
            // future (and the `Child` it owns) is dropped, which with this
            // flag set sends the child a kill rather than leaking it.
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(error = %e, "failed to spawn command");
                return ExecOutput {
                    exit_code: 1,
                    stdout: String::new(),
                    stderr: format!("Execution error: {e}"),
                };
            }
        };

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => ExecOutput {
                exit_code: output.status.code().unwrap_or(1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "failed to collect command output");
                ExecOutput {
                    exit_code: 1,
                    stdout: String::new(),
                    stderr: format!("Execution error: {e}"),
                }
            }
            Err(_elapsed) => {
                tracing::warn!(%command, ?timeout, "command execution timed out");
                ExecOutput {
                    exit_code: 124,
                    stdout: String::new(),
                    stderr: format!("Command execution timed out after {} seconds", timeout.as_secs()),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
