// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The transient `CommandResult` shape returned by every `execute` call.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outcome of a single shelled-out command invocation.
///
/// A non-zero exit code is not an error: `success` reflects `exit_code ==
/// 0` and callers inspect it directly. Only a failure to spawn the
/// process at all (not found, permission denied) surfaces as an
/// `ExecError`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    pub command: String,
    pub args: Vec<String>,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
    pub success: bool,
    pub dry_run: bool,
}

impl CommandResult {
    pub(crate) fn synthetic_dry_run(command: &str, args: &[String]) -> Self {
        Self {
            command: command.to_string(),
            args: args.to_vec(),
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
            duration: Duration::ZERO,
            success: true,
            dry_run: true,
        }
    }
}
