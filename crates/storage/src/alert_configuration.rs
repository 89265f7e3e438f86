// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `alert_configuration` table: a singleton row (id = 1) holding the
//! alert engine's channel and threshold settings.

use sqlx::FromRow;

use crate::error::StorageError;
use crate::pool::DbPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookFlavor {
    Discord,
    Slack,
    Generic,
}

impl WebhookFlavor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discord => "discord",
            Self::Slack => "slack",
            Self::Generic => "generic",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "discord" => Self::Discord,
            "slack" => Self::Slack,
            _ => Self::Generic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AlertConfiguration {
    pub enabled: bool,
    pub failed_login_enabled: bool,
    pub ip_block_enabled: bool,
    pub critical_event_enabled: bool,
    pub failed_login_threshold: i64,
    pub rate_limit_minutes: i64,
    pub smtp_host: Option<String>,
    pub smtp_port: i64,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_tls: bool,
    pub smtp_from_address: Option<String>,
    pub smtp_from_name: Option<String>,
    pub recipient: Option<String>,
    pub webhook_flavor: String,
    pub webhook_url: Option<String>,
    pub webhook_enabled: bool,
    pub webhook_username: Option<String>,
    pub webhook_avatar: Option<String>,
}

impl Default for AlertConfiguration {
    fn default() -> Self {
        Self {
            enabled: false,
            failed_login_enabled: true,
            ip_block_enabled: true,
            critical_event_enabled: true,
            failed_login_threshold: 3,
            rate_limit_minutes: 15,
            smtp_host: None,
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_tls: true,
            smtp_from_address: None,
            smtp_from_name: None,
            recipient: None,
            webhook_flavor: WebhookFlavor::Generic.as_str().to_string(),
            webhook_url: None,
            webhook_enabled: false,
            webhook_username: None,
            webhook_avatar: None,
        }
    }
}

#[derive(FromRow)]
struct ConfigRow {
    enabled: i64,
    failed_login_enabled: i64,
    ip_block_enabled: i64,
    critical_event_enabled: i64,
    failed_login_threshold: i64,
    rate_limit_minutes: i64,
    smtp_host: Option<String>,
    smtp_port: i64,
    smtp_username: Option<String>,
    smtp_password: Option<String>,
    smtp_tls: i64,
    smtp_from_address: Option<String>,
    smtp_from_name: Option<String>,
    recipient: Option<String>,
    webhook_flavor: String,
    webhook_url: Option<String>,
    webhook_enabled: i64,
    webhook_username: Option<String>,
    webhook_avatar: Option<String>,
}

impl From<ConfigRow> for AlertConfiguration {
    fn from(r: ConfigRow) -> Self {
        Self {
            enabled: r.enabled != 0,
            failed_login_enabled: r.failed_login_enabled != 0,
            ip_block_enabled: r.ip_block_enabled != 0,
            critical_event_enabled: r.critical_event_enabled != 0,
            failed_login_threshold: r.failed_login_threshold,
            rate_limit_minutes: r.rate_limit_minutes,
            smtp_host: r.smtp_host,
            smtp_port: r.smtp_port,
            smtp_username: r.smtp_username,
            smtp_password: r.smtp_password,
            smtp_tls: r.smtp_tls != 0,
            smtp_from_address: r.smtp_from_address,
            smtp_from_name: r.smtp_from_name,
            recipient: r.recipient,
            webhook_flavor: r.webhook_flavor,
            webhook_url: r.webhook_url,
            webhook_enabled: r.webhook_enabled != 0,
            webhook_username: r.webhook_username,
            webhook_avatar: r.webhook_avatar,
        }
    }
}

/// Load the singleton row, creating it with defaults on first access.
pub async fn load_or_init(pool: &DbPool) -> Result<AlertConfiguration, StorageError> {
    if let Some(config) = load(pool).await? {
        return Ok(config);
    }
    let defaults = AlertConfiguration::default();
    save(pool, &defaults).await?;
    Ok(defaults)
}

pub async fn load(pool: &DbPool) -> Result<Option<AlertConfiguration>, StorageError> {
    let row: Option<ConfigRow> = sqlx::query_as("SELECT * FROM alert_configuration WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(AlertConfiguration::from))
}

pub async fn save(pool: &DbPool, config: &AlertConfiguration) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        INSERT INTO alert_configuration (
            id, enabled, failed_login_enabled, ip_block_enabled, critical_event_enabled,
            failed_login_threshold, rate_limit_minutes, smtp_host, smtp_port, smtp_username,
            smtp_password, smtp_tls, smtp_from_address, smtp_from_name, recipient,
            webhook_flavor, webhook_url, webhook_enabled, webhook_username, webhook_avatar
        ) VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (id) DO UPDATE SET
            enabled = excluded.enabled,
            failed_login_enabled = excluded.failed_login_enabled,
            ip_block_enabled = excluded.ip_block_enabled,
            critical_event_enabled = excluded.critical_event_enabled,
            failed_login_threshold = excluded.failed_login_threshold,
            rate_limit_minutes = excluded.rate_limit_minutes,
            smtp_host = excluded.smtp_host,
            smtp_port = excluded.smtp_port,
            smtp_username = excluded.smtp_username,
            smtp_password = excluded.smtp_password,
            smtp_tls = excluded.smtp_tls,
            smtp_from_address = excluded.smtp_from_address,
            smtp_from_name = excluded.smtp_from_name,
            recipient = excluded.recipient,
            webhook_flavor = excluded.webhook_flavor,
            webhook_url = excluded.webhook_url,
            webhook_enabled = excluded.webhook_enabled,
            webhook_username = excluded.webhook_username,
            webhook_avatar = excluded.webhook_avatar
        "#,
    )
    .bind(config.enabled as i64)
    .bind(config.failed_login_enabled as i64)
    .bind(config.ip_block_enabled as i64)
    .bind(config.critical_event_enabled as i64)
    .bind(config.failed_login_threshold)
    .bind(config.rate_limit_minutes)
    .bind(&config.smtp_host)
    .bind(config.smtp_port)
    .bind(&config.smtp_username)
    .bind(&config.smtp_password)
    .bind(config.smtp_tls as i64)
    .bind(&config.smtp_from_address)
    .bind(&config.smtp_from_name)
    .bind(&config.recipient)
    .bind(&config.webhook_flavor)
    .bind(&config.webhook_url)
    .bind(config.webhook_enabled as i64)
    .bind(&config.webhook_username)
    .bind(&config.webhook_avatar)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
#[path = "alert_configuration_tests.rs"]
mod tests;
