// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task kind dispatch: the behavior behind `cleanup`, `maintenance`, and
//! `log_rotation`. The kind registry is open — an unrecognized custom
//! kind fails its execution with "unsupported task type" rather than the
//! scheduler refusing to store it (validation already happened at
//! create/update time via `TaskConfig::parse`).

use std::path::Path;

use swnas_storage::scheduled_task::TaskConfig;
use swnas_storage::{audit_log, task_execution, DbPool};

const MS_PER_DAY: i64 = 86_400_000;

/// Run the task-kind-specific body and produce the execution's terminal
/// output or error text.
pub async fn dispatch(
    pool: &DbPool,
    config: &TaskConfig,
    now_ms: i64,
    log_path: Option<&Path>,
) -> Result<String, String> {
    match config {
        TaskConfig::Cleanup { retention_days } => run_cleanup(pool, *retention_days, now_ms).await,
        TaskConfig::Maintenance => run_maintenance(pool).await,
        TaskConfig::LogRotation => run_log_rotation(log_path).await,
        TaskConfig::Custom { kind, .. } => Err(format!("unsupported task type: {kind}")),
    }
}

async fn run_cleanup(pool: &DbPool, retention_days: u32, now_ms: i64) -> Result<String, String> {
    let cutoff_ms = now_ms - (retention_days as i64) * MS_PER_DAY;

    let audit_deleted = audit_log::delete_older_than(pool, cutoff_ms).await.map_err(|e| e.to_string())?;
    let executions_deleted =
        task_execution::delete_older_than(pool, cutoff_ms).await.map_err(|e| e.to_string())?;
    let alerts_deleted =
        swnas_storage::alert_log::delete_older_than(pool, cutoff_ms).await.map_err(|e| e.to_string())?;

    Ok(format!(
        "Cleanup completed: {audit_deleted} audit logs, {executions_deleted} task executions, {alerts_deleted} alert logs deleted"
    ))
}

async fn run_maintenance(pool: &DbPool) -> Result<String, String> {
    sqlx::query("VACUUM").execute(pool).await.map_err(|e| e.to_string())?;
    sqlx::query("ANALYZE").execute(pool).await.map_err(|e| e.to_string())?;
    Ok("Maintenance completed: vacuum and analyze".to_string())
}

async fn run_log_rotation(log_path: Option<&Path>) -> Result<String, String> {
    let Some(path) = log_path else {
        return Ok("Log rotation skipped: no log file configured".to_string());
    };
    if !path.exists() {
        return Ok(format!("Log rotation skipped: {} does not exist", path.display()));
    }

    let rotated = path.with_extension("log.1");
    tokio::fs::rename(path, &rotated).await.map_err(|e| e.to_string())?;
    tokio::fs::File::create(path).await.map_err(|e| e.to_string())?;

    Ok(format!("Log rotation completed: rotated to {}", rotated.display()))
}

#[cfg(test)]
#[path = "task_kind_tests.rs"]
mod tests;
