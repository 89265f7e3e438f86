// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `scheduled_task` table: persistent definitions the scheduler fires.
//!
//! Per the REDESIGN FLAGS, the opaque JSON configuration blob is replaced
//! at the call site by a kind-tagged [`TaskConfig`] validated before the
//! row is ever written, not lazily at fire time. The `kind`/`config_json`
//! columns themselves stay exactly as named in the data model so the
//! schema is portable, but every read/write goes through `TaskConfig` so
//! application code never juggles untyped JSON.

use serde_json::Value;
use sqlx::{FromRow, Row};
use swnas_core::TaskId;

use crate::error::StorageError;
use crate::pool::DbPool;

/// Registry of well-known task kinds, open for extension: an unrecognized
/// string is kept verbatim as `Custom` rather than rejected, matching the
/// distilled spec's "registry is open" note.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskConfig {
    Cleanup { retention_days: u32 },
    Maintenance,
    LogRotation,
    Custom { kind: String, params: Value },
}

fn default_retention_days() -> u32 {
    30
}

impl TaskConfig {
    pub fn kind_str(&self) -> &str {
        match self {
            Self::Cleanup { .. } => "cleanup",
            Self::Maintenance => "maintenance",
            Self::LogRotation => "log_rotation",
            Self::Custom { kind, .. } => kind,
        }
    }

    /// Validate and parse a `(kind, config_json)` pair at insert time
    /// rather than deferring validation to task fire time.
    pub fn parse(kind: &str, config_json: &str) -> Result<Self, StorageError> {
        match kind {
            "cleanup" => {
                let parsed: serde_json::Map<String, Value> = if config_json.trim().is_empty() {
                    serde_json::Map::new()
                } else {
                    serde_json::from_str(config_json)
                        .map_err(|e| StorageError::InvalidConfig(format!("cleanup config: {e}")))?
                };
                let retention_days = parsed
                    .get("retentionDays")
                    .and_then(Value::as_u64)
                    .map(|v| v as u32)
                    .unwrap_or_else(default_retention_days);
                Ok(Self::Cleanup { retention_days })
            }
            "maintenance" => Ok(Self::Maintenance),
            "log_rotation" => Ok(Self::LogRotation),
            other => {
                let params: Value = if config_json.trim().is_empty() {
                    Value::Object(serde_json::Map::new())
                } else {
                    serde_json::from_str(config_json)
                        .map_err(|e| StorageError::InvalidConfig(format!("{other} config: {e}")))?
                };
                Ok(Self::Custom {
                    kind: other.to_string(),
                    params,
                })
            }
        }
    }

    /// Render back to the wire shape stored in `config_json`. Uses the
    /// original camelCase key expected by the kind-specific dispatchers.
    pub fn to_config_json(&self) -> String {
        match self {
            Self::Cleanup { retention_days } => {
                serde_json::json!({ "retentionDays": retention_days }).to_string()
            }
            Self::Maintenance | Self::LogRotation => "{}".to_string(),
            Self::Custom { params, .. } => params.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub name: String,
    pub enabled: bool,
    pub cron_expr: String,
    pub config: TaskConfig,
    pub timeout_seconds: u64,
    pub run_count: u64,
    pub last_status: Option<String>,
    pub last_error: Option<String>,
    pub next_run_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(FromRow)]
struct TaskRow {
    id: String,
    name: String,
    enabled: i64,
    cron_expr: String,
    kind: String,
    config_json: String,
    timeout_seconds: i64,
    run_count: i64,
    last_status: Option<String>,
    last_error: Option<String>,
    next_run_ms: Option<i64>,
    created_at_ms: i64,
    updated_at_ms: i64,
}

impl TaskRow {
    fn into_task(self) -> Result<ScheduledTask, StorageError> {
        Ok(ScheduledTask {
            id: TaskId::from_string(self.id),
            name: self.name,
            enabled: self.enabled != 0,
            cron_expr: self.cron_expr,
            config: TaskConfig::parse(&self.kind, &self.config_json)?,
            timeout_seconds: self.timeout_seconds.max(0) as u64,
            run_count: self.run_count.max(0) as u64,
            last_status: self.last_status,
            last_error: self.last_error,
            next_run_ms: self.next_run_ms,
            created_at_ms: self.created_at_ms,
            updated_at_ms: self.updated_at_ms,
        })
    }
}

/// Insert a new scheduled task row. Caller is expected to have already
/// validated the cron expression.
pub async fn insert(
    pool: &DbPool,
    id: &TaskId,
    name: &str,
    enabled: bool,
    cron_expr: &str,
    config: &TaskConfig,
    timeout_seconds: u64,
    now_ms: i64,
) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        INSERT INTO scheduled_task
            (id, name, enabled, cron_expr, kind, config_json, timeout_seconds,
             run_count, last_status, last_error, next_run_ms, created_at_ms, updated_at_ms)
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, NULL, NULL, NULL, ?, ?)
        "#,
    )
    .bind(id.as_str())
    .bind(name)
    .bind(enabled as i64)
    .bind(cron_expr)
    .bind(config.kind_str())
    .bind(config.to_config_json())
    .bind(timeout_seconds as i64)
    .bind(now_ms)
    .bind(now_ms)
    .execute(pool)
    .await?;
    Ok(())
}

/// Update an existing task's editable fields. Resets `next_run_ms` to
/// `None` so the scheduler recomputes it on the next cache refresh — per
/// the edit semantics, an enabled task's next fire is effectively "now".
pub async fn update(
    pool: &DbPool,
    id: &TaskId,
    name: &str,
    enabled: bool,
    cron_expr: &str,
    config: &TaskConfig,
    timeout_seconds: u64,
    now_ms: i64,
) -> Result<(), StorageError> {
    let affected = sqlx::query(
        r#"
        UPDATE scheduled_task
        SET name = ?, enabled = ?, cron_expr = ?, kind = ?, config_json = ?,
            timeout_seconds = ?, next_run_ms = NULL, updated_at_ms = ?
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(enabled as i64)
    .bind(cron_expr)
    .bind(config.kind_str())
    .bind(config.to_config_json())
    .bind(timeout_seconds as i64)
    .bind(now_ms)
    .bind(id.as_str())
    .execute(pool)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(StorageError::NotFound(format!("scheduled_task {id}")));
    }
    Ok(())
}

pub async fn delete(pool: &DbPool, id: &TaskId) -> Result<(), StorageError> {
    sqlx::query("DELETE FROM scheduled_task WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get(pool: &DbPool, id: &TaskId) -> Result<Option<ScheduledTask>, StorageError> {
    let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM scheduled_task WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;
    row.map(TaskRow::into_task).transpose()
}

pub async fn list_all(pool: &DbPool) -> Result<Vec<ScheduledTask>, StorageError> {
    let rows: Vec<TaskRow> = sqlx::query_as("SELECT * FROM scheduled_task").fetch_all(pool).await?;
    rows.into_iter().map(TaskRow::into_task).collect()
}

pub async fn list_enabled(pool: &DbPool) -> Result<Vec<ScheduledTask>, StorageError> {
    let rows: Vec<TaskRow> = sqlx::query_as("SELECT * FROM scheduled_task WHERE enabled = 1")
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(TaskRow::into_task).collect()
}

/// Update `next_run_ms` for a task without touching any other column.
pub async fn set_next_run(pool: &DbPool, id: &TaskId, next_run_ms: Option<i64>) -> Result<(), StorageError> {
    sqlx::query("UPDATE scheduled_task SET next_run_ms = ? WHERE id = ?")
        .bind(next_run_ms)
        .bind(id.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

/// Atomically record the outcome of one fire: increment `run_count` and
/// set `last_status`/`last_error`/`next_run_ms` in a single statement.
pub async fn record_fire_outcome(
    pool: &DbPool,
    id: &TaskId,
    status: &str,
    error: Option<&str>,
    next_run_ms: Option<i64>,
) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        UPDATE scheduled_task
        SET run_count = run_count + 1, last_status = ?, last_error = ?, next_run_ms = ?
        WHERE id = ?
        "#,
    )
    .bind(status)
    .bind(error)
    .bind(next_run_ms)
    .bind(id.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

/// Deleting rows older than `cutoff_ms` across this table's execution log
/// siblings is handled by the `cleanup` task kind in the scheduler crate;
/// this module only exposes the count helper the cleanup dispatcher needs.
/// `scheduled_task` rows themselves are never pruned by retention — tasks
/// are operator-managed, not time-bounded.
pub async fn count(pool: &DbPool) -> Result<i64, StorageError> {
    let row = sqlx::query("SELECT COUNT(*) AS c FROM scheduled_task").fetch_one(pool).await?;
    Ok(row.try_get::<i64, _>("c")?)
}

#[cfg(test)]
#[path = "scheduled_task_tests.rs"]
mod tests;
