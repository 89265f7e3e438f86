// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging setup. Logging *configuration surface* is a
//! non-goal for the feature set this crate builds, but the ambient
//! `tracing` stack itself is carried regardless: every manager and loop
//! emits through `tracing`, initialized once here from the `logging`
//! config section.

use swnas_core::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Initialize the global `tracing` subscriber from `logging.level` /
/// `logging.format`. Call exactly once, as early in `main` as possible.
/// Returns the `tracing-appender` guard; dropping it flushes the
/// non-blocking writer, so the caller must hold it for the process
/// lifetime when a log file is configured.
pub fn init(config: &LoggingConfig, log_file: Option<&std::path::Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let (dir, file_name) = split_log_path(path);
            let file_appender = tracing_appender::rolling::daily(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            if config.format == "json" {
                builder.json().with_writer(non_blocking).init();
            } else {
                builder.with_writer(non_blocking).init();
            }
            Some(guard)
        }
        None => {
            if config.format == "json" {
                builder.json().init();
            } else {
                builder.init();
            }
            None
        }
    }
}

fn split_log_path(path: &std::path::Path) -> (std::path::PathBuf, String) {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).map(Into::into).unwrap_or_else(|| std::path::PathBuf::from("."));
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("stumpfworks.log").to_string();
    (dir, file_name)
}
