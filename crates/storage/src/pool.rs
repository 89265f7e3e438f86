// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection pool setup and schema migration.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

use crate::error::StorageError;

pub type DbPool = SqlitePool;

/// Open a SQLite pool for `dsn`, creating the database file if it does
/// not already exist.
pub async fn open_pool(dsn: &str) -> Result<DbPool, StorageError> {
    let options = SqliteConnectOptions::from_str(dsn)
        .map_err(|e| StorageError::InvalidConfig(format!("bad database dsn {dsn:?}: {e}")))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    info!(dsn, "database pool opened and migrated");
    Ok(pool)
}

/// Create every table this crate owns if it does not already exist.
/// Idempotent — safe to call on every startup.
pub async fn run_migrations(pool: &DbPool) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scheduled_task (
            id              TEXT PRIMARY KEY,
            name            TEXT NOT NULL,
            enabled         INTEGER NOT NULL,
            cron_expr       TEXT NOT NULL,
            kind            TEXT NOT NULL,
            config_json     TEXT NOT NULL,
            timeout_seconds INTEGER NOT NULL,
            run_count       INTEGER NOT NULL DEFAULT 0,
            last_status     TEXT NULL,
            last_error      TEXT NULL,
            next_run_ms     INTEGER NULL,
            created_at_ms   INTEGER NOT NULL,
            updated_at_ms   INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS task_execution (
            id              TEXT PRIMARY KEY,
            task_id         TEXT NOT NULL,
            status          TEXT NOT NULL,
            trigger         TEXT NOT NULL,
            started_at_ms   INTEGER NOT NULL,
            completed_at_ms INTEGER NULL,
            duration_ms     INTEGER NULL,
            output          TEXT NULL,
            error           TEXT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_task_execution_task_id ON task_execution (task_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alert_configuration (
            id                      INTEGER PRIMARY KEY CHECK (id = 1),
            enabled                 INTEGER NOT NULL DEFAULT 0,
            failed_login_enabled    INTEGER NOT NULL DEFAULT 1,
            ip_block_enabled        INTEGER NOT NULL DEFAULT 1,
            critical_event_enabled  INTEGER NOT NULL DEFAULT 1,
            failed_login_threshold  INTEGER NOT NULL DEFAULT 3,
            rate_limit_minutes      INTEGER NOT NULL DEFAULT 15,
            smtp_host               TEXT NULL,
            smtp_port               INTEGER NOT NULL DEFAULT 587,
            smtp_username           TEXT NULL,
            smtp_password           TEXT NULL,
            smtp_tls                INTEGER NOT NULL DEFAULT 1,
            smtp_from_address       TEXT NULL,
            smtp_from_name          TEXT NULL,
            recipient               TEXT NULL,
            webhook_flavor          TEXT NOT NULL DEFAULT 'generic',
            webhook_url             TEXT NULL,
            webhook_enabled         INTEGER NOT NULL DEFAULT 0,
            webhook_username        TEXT NULL,
            webhook_avatar          TEXT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alert_log (
            id              TEXT PRIMARY KEY,
            event_type      TEXT NOT NULL,
            channel         TEXT NOT NULL,
            subject         TEXT NOT NULL,
            body            TEXT NOT NULL,
            recipient       TEXT NOT NULL,
            status          TEXT NOT NULL,
            error           TEXT NULL,
            timestamp_ms    INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_alert_log_event_type ON alert_log (event_type)")
        .execute(pool)
        .await?;

    // The user table is otherwise out-of-scope ORM plumbing (the full
    // account/role/2FA model lives behind the HTTP layer), but the CLI's
    // `--reset-admin-password` flow needs just enough of it to find a
    // user, check their role, and overwrite their password hash.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS app_user (
            id              TEXT PRIMARY KEY,
            username        TEXT NOT NULL UNIQUE,
            password_hash   TEXT NOT NULL,
            role            TEXT NOT NULL,
            created_at_ms   INTEGER NOT NULL,
            updated_at_ms   INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // audit_log belongs to the out-of-scope ORM/plumbing layer (login
    // attempts, config changes, etc.) but the in-scope `cleanup` task
    // kind prunes it alongside its own tables, so the core still owns
    // this one table's lifecycle.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audit_log (
            id              TEXT PRIMARY KEY,
            event           TEXT NOT NULL,
            actor            TEXT NULL,
            created_at_ms   INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // The following four tables back the boot reconciler's read side
    // only (§4.5). Full CRUD over shares/volumes/bridges/containers is
    // out-of-scope tool-wrapper surface owned elsewhere; the
    // reconciler just needs to list what is already configured.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS share (
            name            TEXT PRIMARY KEY,
            path            TEXT NOT NULL,
            owner           TEXT NOT NULL,
            group_name      TEXT NOT NULL,
            mode            INTEGER NOT NULL,
            is_default      INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS volume (
            device          TEXT PRIMARY KEY,
            mount_target    TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bridge (
            name            TEXT PRIMARY KEY,
            members_csv     TEXT NOT NULL,
            ip_cidr         TEXT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS container (
            name            TEXT PRIMARY KEY,
            autostart       INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
