// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Executor` capability: discover, spawn, and time-box external
//! commands on behalf of every manager.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::process::Command as TokioCommand;

use crate::discovery::{command_exists, discover_command};
use crate::error::ExecError;
use crate::result::CommandResult;

/// Default wall-clock budget for `execute` when no explicit deadline is
/// given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Discovers, invokes, and time-boxes external commands.
///
/// Every manager holds an `Executor` (never calling `tokio::process::
/// Command` directly) so tests can flip `set_dry_run` or substitute a
/// fake in its place.
#[derive(Debug, Default)]
pub struct Executor {
    dry_run: AtomicBool,
}

impl Executor {
    pub fn new() -> Self {
        Self {
            dry_run: AtomicBool::new(false),
        }
    }

    pub fn set_dry_run(&self, enabled: bool) {
        self.dry_run.store(enabled, Ordering::SeqCst);
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run.load(Ordering::SeqCst)
    }

    pub fn command_exists(&self, cmd: &str) -> bool {
        command_exists(cmd)
    }

    /// Run `cmd args...` with [`DEFAULT_TIMEOUT`].
    pub async fn execute(&self, cmd: &str, args: &[String]) -> Result<CommandResult, ExecError> {
        self.execute_with_timeout(DEFAULT_TIMEOUT, cmd, args).await
    }

    /// Run `cmd args...`, failing with [`ExecError::Timeout`] if the
    /// child does not exit within `timeout`. The child is killed on
    /// timeout.
    pub async fn execute_with_timeout(
        &self,
        timeout: Duration,
        cmd: &str,
        args: &[String],
    ) -> Result<CommandResult, ExecError> {
        if self.is_dry_run() {
            tracing::info!(command = %cmd, ?args, "dry-run: skipping execution");
            return Ok(CommandResult::synthetic_dry_run(cmd, args));
        }

        let span = tracing::info_span!(
            "shell.execute",
            command = %cmd,
            exit_code = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        );
        let _entered = span.enter();

        let resolved = discover_command(cmd);

        let start = Instant::now();
        let spawn_result = TokioCommand::new(&resolved)
            .args(args)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawn_result {
            Ok(child) => child,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(ExecError::CommandNotFound(cmd.to_string()));
            }
            Err(source) => {
                return Err(ExecError::SpawnFailed {
                    command: cmd.to_string(),
                    source,
                })
            }
        };

        let wait = tokio::time::timeout(timeout, child.wait_with_output()).await;

        let output = match wait {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(ExecError::SpawnFailed {
                    command: cmd.to_string(),
                    source,
                })
            }
            Err(_elapsed) => {
                return Err(ExecError::Timeout {
                    command: cmd.to_string(),
                    timeout,
                });
            }
        };

        let duration = start.elapsed();
        let exit_code = output.status.code().unwrap_or(-1);

        tracing::Span::current().record("exit_code", exit_code);
        tracing::Span::current().record("duration_ms", duration.as_millis() as u64);

        Ok(CommandResult {
            command: cmd.to_string(),
            args: args.to_vec(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
            duration,
            success: exit_code == 0,
            dry_run: false,
        })
    }
}
