// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `task_execution` table: one row per fire, created on fire and
//! updated exactly once on completion.

use sqlx::FromRow;
use swnas_core::{ExecutionId, TaskId};

use crate::error::StorageError;
use crate::pool::DbPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Running,
    Success,
    Failed,
    Timeout,
}

impl ExecutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Timeout => "timeout",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionTrigger {
    Scheduler,
    Manual,
}

impl ExecutionTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduler => "scheduler",
            Self::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskExecution {
    pub id: ExecutionId,
    pub task_id: TaskId,
    pub status: String,
    pub trigger: String,
    pub started_at_ms: i64,
    pub completed_at_ms: Option<i64>,
    pub duration_ms: Option<i64>,
    pub output: Option<String>,
    pub error: Option<String>,
}

#[derive(FromRow)]
struct ExecutionRow {
    id: String,
    task_id: String,
    status: String,
    trigger: String,
    started_at_ms: i64,
    completed_at_ms: Option<i64>,
    duration_ms: Option<i64>,
    output: Option<String>,
    error: Option<String>,
}

impl From<ExecutionRow> for TaskExecution {
    fn from(row: ExecutionRow) -> Self {
        Self {
            id: ExecutionId::from_string(row.id),
            task_id: TaskId::from_string(row.task_id),
            status: row.status,
            trigger: row.trigger,
            started_at_ms: row.started_at_ms,
            completed_at_ms: row.completed_at_ms,
            duration_ms: row.duration_ms,
            output: row.output,
            error: row.error,
        }
    }
}

/// Create the `running` row for a newly fired task.
pub async fn start(
    pool: &DbPool,
    id: &ExecutionId,
    task_id: &TaskId,
    trigger: ExecutionTrigger,
    started_at_ms: i64,
) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        INSERT INTO task_execution
            (id, task_id, status, trigger, started_at_ms, completed_at_ms, duration_ms, output, error)
        VALUES (?, ?, ?, ?, ?, NULL, NULL, NULL, NULL)
        "#,
    )
    .bind(id.as_str())
    .bind(task_id.as_str())
    .bind(ExecutionStatus::Running.as_str())
    .bind(trigger.as_str())
    .bind(started_at_ms)
    .execute(pool)
    .await?;
    Ok(())
}

/// Transition a `running` row to a terminal state exactly once. Called
/// with the already-computed duration so the row's `duration_ms` always
/// equals `completed_at_ms - started_at_ms`.
pub async fn complete(
    pool: &DbPool,
    id: &ExecutionId,
    status: ExecutionStatus,
    completed_at_ms: i64,
    duration_ms: i64,
    output: Option<&str>,
    error: Option<&str>,
) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        UPDATE task_execution
        SET status = ?, completed_at_ms = ?, duration_ms = ?, output = ?, error = ?
        WHERE id = ? AND status = 'running'
        "#,
    )
    .bind(status.as_str())
    .bind(completed_at_ms)
    .bind(duration_ms)
    .bind(output)
    .bind(error)
    .bind(id.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get(pool: &DbPool, id: &ExecutionId) -> Result<Option<TaskExecution>, StorageError> {
    let row: Option<ExecutionRow> = sqlx::query_as("SELECT * FROM task_execution WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(row.map(TaskExecution::from))
}

pub async fn list_for_task(pool: &DbPool, task_id: &TaskId) -> Result<Vec<TaskExecution>, StorageError> {
    let rows: Vec<ExecutionRow> = sqlx::query_as(
        "SELECT * FROM task_execution WHERE task_id = ? ORDER BY started_at_ms DESC",
    )
    .bind(task_id.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(TaskExecution::from).collect())
}

/// Delete execution rows whose `started_at_ms` is older than `cutoff_ms`.
/// Returns the number of deleted rows — feeds the `cleanup` task kind's
/// output summary.
pub async fn delete_older_than(pool: &DbPool, cutoff_ms: i64) -> Result<u64, StorageError> {
    let result = sqlx::query("DELETE FROM task_execution WHERE started_at_ms < ?")
        .bind(cutoff_ms)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
#[path = "task_execution_tests.rs"]
mod tests;
