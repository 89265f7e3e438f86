// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal handle onto the `audit_log` table.
//!
//! Full audit-log CRUD (recording login attempts, config changes, etc.)
//! is out-of-scope ORM plumbing. This core only needs enough surface for
//! the scheduler's `cleanup` task kind to prune old rows alongside
//! `task_execution` and `alert_log`, per the data model's retention
//! invariant.

use crate::error::StorageError;
use crate::pool::DbPool;

pub async fn delete_older_than(pool: &DbPool, cutoff_ms: i64) -> Result<u64, StorageError> {
    let result = sqlx::query("DELETE FROM audit_log WHERE created_at_ms < ?")
        .bind(cutoff_ms)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count(pool: &DbPool) -> Result<i64, StorageError> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audit_log").fetch_one(pool).await?;
    Ok(row.0)
}
