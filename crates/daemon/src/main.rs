// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `stumpfworksd`: the StumpfWorks NAS orchestration daemon.
//!
//! Parses CLI flags, then either runs the one-shot admin password reset
//! or starts the full server. Exit code 0 on a clean server shutdown or a
//! successful password reset; 1 on a required-component health failure,
//! a database initialization failure, or a failed admin reset.

use clap::Parser;
use swnas_core::Clock;
use swnas_daemon::{admin_reset, boot, logging, Cli};
use swnas_storage::open_pool;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match swnas_core::Config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let _log_guard = logging::init(&config.logging, None);

    if let Some(username) = cli.reset_admin_password {
        std::process::exit(run_admin_reset(&config, &username).await);
    }

    match boot::run_server(config).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            tracing::error!(error = %e, "server exited with an error");
            std::process::exit(1);
        }
    }
}

async fn run_admin_reset(config: &swnas_core::Config, username: &str) -> i32 {
    let pool = match open_pool(&config.database.dsn).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("failed to open database: {e}");
            return 1;
        }
    };

    let now_ms = swnas_core::SystemClock.epoch_ms() as i64;
    match admin_reset::reset_admin_password(&pool, username, now_ms).await {
        Ok(password) => {
            println!("New password for {username}: {password}");
            0
        }
        Err(e) => {
            eprintln!("failed to reset password for {username}: {e}");
            1
        }
    }
}
