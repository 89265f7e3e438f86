// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `alert_log` table: one append-only row per channel delivery
//! attempt. Silent skips (disabled, threshold, rate-limit gates) write
//! nothing here by design.

use sqlx::FromRow;
use swnas_core::AlertLogId;

use crate::error::StorageError;
use crate::pool::DbPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertChannel {
    Email,
    Webhook,
}

impl AlertChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Webhook => "webhook",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AlertLog {
    pub id: String,
    pub event_type: String,
    pub channel: String,
    pub subject: String,
    pub body: String,
    pub recipient: String,
    pub status: String,
    pub error: Option<String>,
    pub timestamp_ms: i64,
}

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    pool: &DbPool,
    id: &AlertLogId,
    event_type: &str,
    channel: AlertChannel,
    subject: &str,
    body: &str,
    recipient: &str,
    status: DeliveryStatus,
    error: Option<&str>,
    timestamp_ms: i64,
) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        INSERT INTO alert_log
            (id, event_type, channel, subject, body, recipient, status, error, timestamp_ms)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.as_str())
    .bind(event_type)
    .bind(channel.as_str())
    .bind(subject)
    .bind(body)
    .bind(recipient)
    .bind(status.as_str())
    .bind(error)
    .bind(timestamp_ms)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_for_event_type(pool: &DbPool, event_type: &str) -> Result<Vec<AlertLog>, StorageError> {
    let rows: Vec<AlertLog> = sqlx::query_as(
        "SELECT * FROM alert_log WHERE event_type = ? ORDER BY timestamp_ms DESC",
    )
    .bind(event_type)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_all(pool: &DbPool) -> Result<Vec<AlertLog>, StorageError> {
    let rows: Vec<AlertLog> = sqlx::query_as("SELECT * FROM alert_log ORDER BY timestamp_ms DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Delete log rows older than `cutoff_ms`. Used by the `cleanup` task
/// kind.
pub async fn delete_older_than(pool: &DbPool, cutoff_ms: i64) -> Result<u64, StorageError> {
    let result = sqlx::query("DELETE FROM alert_log WHERE timestamp_ms < ?")
        .bind(cutoff_ms)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
#[path = "alert_log_tests.rs"]
mod tests;
