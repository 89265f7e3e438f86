// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The Shell Executor: discover, invoke, and time-box external commands.
//!
//! This is the single capability every manager uses to shell out to the
//! underlying system tools (Samba, ZFS, mdadm, systemctl, ...). Managers
//! never call `tokio::process::Command` directly — they hold an
//! `Executor` and call `execute`/`execute_with_timeout`, so tests can
//! substitute a dry-run or fake executor.

mod discovery;
mod error;
mod executor;
mod result;

pub use discovery::{command_exists, discover_command, ADMIN_DIRS};
pub use error::ExecError;
pub use executor::{Executor, DEFAULT_TIMEOUT};
pub use result::CommandResult;

#[cfg(test)]
mod executor_tests;
