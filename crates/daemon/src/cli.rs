// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI surface of the `stumpfworksd` binary: flag-based, no subcommands,
//! per the external interfaces design.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "stumpfworksd", version, about = "StumpfWorks NAS orchestration daemon")]
pub struct Cli {
    /// Generate a new random password for an existing admin user, print
    /// it once to stdout, and exit. Exits 1 if the user does not exist
    /// or is not an admin.
    #[arg(long = "reset-admin-password", value_name = "USERNAME")]
    pub reset_admin_password: Option<String>,
}
