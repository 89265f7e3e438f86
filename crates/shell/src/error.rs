// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use swnas_core::OrchestrationError;
use thiserror::Error;

/// Errors that abort an `execute` call before a `CommandResult` can be
/// produced. A non-zero exit from a command that *did* spawn is carried
/// in `CommandResult::success`, not here.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("failed to spawn {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command {command} exceeded its {timeout:?} deadline")]
    Timeout {
        command: String,
        timeout: std::time::Duration,
    },
}

impl From<ExecError> for OrchestrationError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::CommandNotFound(cmd) => Self::NotFound(format!("command: {cmd}")),
            ExecError::SpawnFailed { command, source } => {
                Self::PersistentIo(format!("spawn {command}: {source}"))
            }
            ExecError::Timeout { command, timeout } => {
                let _ = command;
                Self::Timeout(timeout)
            }
        }
    }
}
