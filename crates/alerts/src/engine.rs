// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The alert engine: the fixed gate pipeline and per-channel delivery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use swnas_core::{AlertLogId, Clock, OrchestrationError};
use swnas_registry::Manager;
use swnas_storage::alert_configuration::AlertConfiguration;
use swnas_storage::alert_log::{self, AlertChannel, DeliveryStatus};
use swnas_storage::{alert_configuration, DbPool};
use tracing::warn;

use crate::email::send_email;
use crate::event::EventType;
use crate::rate_limit::RateLimiter;
use crate::template::render;
use crate::webhook::send_webhook;

fn ms_to_datetime(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_else(|| DateTime::from_timestamp_millis(0).unwrap_or_default())
}

/// The alert engine singleton. Generic over [`Clock`] so rate-limit
/// tests can drive time without sleeping.
pub struct AlertEngine<C: Clock + 'static> {
    pool: DbPool,
    clock: C,
    http_client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl<C: Clock + 'static> AlertEngine<C> {
    pub fn new(pool: DbPool, clock: C) -> Self {
        Self { pool, clock, http_client: reqwest::Client::new(), rate_limiter: RateLimiter::new() }
    }

    pub async fn send_failed_login(
        &self,
        username: &str,
        source_ip: &str,
        attempt_count: u32,
    ) -> Result<(), OrchestrationError> {
        let config = self.load_config().await?;
        if !config.enabled || !config.failed_login_enabled {
            return Ok(());
        }
        if (attempt_count as i64) < config.failed_login_threshold {
            return Ok(());
        }
        self.pipeline(
            &config,
            EventType::FailedLogin {
                username: username.to_string(),
                source_ip: source_ip.to_string(),
                attempt_count,
            },
        )
        .await
    }

    pub async fn send_ip_block(&self, source_ip: &str, reason: &str) -> Result<(), OrchestrationError> {
        let config = self.load_config().await?;
        if !config.enabled || !config.ip_block_enabled {
            return Ok(());
        }
        self.pipeline(&config, EventType::IpBlock { source_ip: source_ip.to_string(), reason: reason.to_string() })
            .await
    }

    pub async fn send_critical_event(&self, title: &str, detail: &str) -> Result<(), OrchestrationError> {
        let config = self.load_config().await?;
        if !config.enabled || !config.critical_event_enabled {
            return Ok(());
        }
        self.pipeline(&config, EventType::CriticalEvent { title: title.to_string(), detail: detail.to_string() }).await
    }

    /// `system_error` has no per-type flag in the configuration; it is
    /// gated only by the engine's global `enabled` switch.
    pub async fn send_system_error(&self, message: &str) -> Result<(), OrchestrationError> {
        let config = self.load_config().await?;
        if !config.enabled {
            return Ok(());
        }
        self.pipeline(&config, EventType::SystemError { message: message.to_string() }).await
    }

    /// Exercise the delivery layer with a synthetic payload, bypassing
    /// every gate. Used by configuration-validation UIs.
    pub async fn test_email(&self, config: &AlertConfiguration) -> Result<(), OrchestrationError> {
        send_email(config, "StumpfWorks NAS test alert", "<p>This is a test alert from your NAS.</p>")
            .await
            .map_err(OrchestrationError::TransientIo)
    }

    pub async fn test_webhook(&self, config: &AlertConfiguration) -> Result<(), OrchestrationError> {
        let now = ms_to_datetime(self.clock.epoch_ms() as i64);
        send_webhook(
            &self.http_client,
            config,
            &EventType::SystemError { message: "test alert".to_string() },
            "StumpfWorks NAS test alert",
            "This is a test alert from your NAS.",
            now,
        )
        .await
        .map_err(OrchestrationError::TransientIo)
    }

    async fn load_config(&self) -> Result<AlertConfiguration, OrchestrationError> {
        alert_configuration::load_or_init(&self.pool).await.map_err(Into::into)
    }

    async fn pipeline(&self, config: &AlertConfiguration, event: EventType) -> Result<(), OrchestrationError> {
        let now_ms = self.clock.epoch_ms() as i64;
        let now = ms_to_datetime(now_ms);
        let window = chrono::Duration::minutes(config.rate_limit_minutes.max(0));

        if !self.rate_limiter.try_acquire(event.key(), now, window) {
            return Ok(());
        }

        let rendered = render(&event);

        if config.smtp_host.is_some() && config.recipient.is_some() {
            let recipient = config.recipient.clone().unwrap_or_default();
            let result = send_email(config, &rendered.subject, &rendered.html_body).await;
            self.record(&event, AlertChannel::Email, &rendered.subject, &rendered.html_body, &recipient, result, now_ms)
                .await;
        }

        if config.webhook_enabled && config.webhook_url.is_some() {
            let recipient = config.webhook_url.clone().unwrap_or_default();
            let result = send_webhook(&self.http_client, config, &event, &rendered.subject, &rendered.plain_body, now)
                .await;
            self.record(
                &event,
                AlertChannel::Webhook,
                &rendered.subject,
                &rendered.plain_body,
                &recipient,
                result,
                now_ms,
            )
            .await;
        }

        Ok(())
    }

    async fn record(
        &self,
        event: &EventType,
        channel: AlertChannel,
        subject: &str,
        body: &str,
        recipient: &str,
        result: Result<(), String>,
        now_ms: i64,
    ) {
        let (status, error) = match &result {
            Ok(()) => (DeliveryStatus::Sent, None),
            Err(e) => (DeliveryStatus::Failed, Some(e.as_str())),
        };

        let id = AlertLogId::new();
        if let Err(e) =
            alert_log::insert(&self.pool, &id, event.key(), channel, subject, body, recipient, status, error, now_ms)
                .await
        {
            warn!(error = %e, channel = channel.as_str(), "failed to persist alert-log row");
        }
        if let Err(e) = &result {
            warn!(error = %e, channel = channel.as_str(), event = event.key(), "alert delivery failed");
        }
    }
}

#[async_trait]
impl<C: Clock + 'static> Manager for AlertEngine<C> {
    fn name(&self) -> &'static str {
        "alerts"
    }

    async fn start(&self) -> Result<(), OrchestrationError> {
        // The engine has no background loop: every call is driven by its
        // caller (failed-login tracker, scheduler, HTTP layer). Starting
        // just confirms the configuration row exists.
        self.load_config().await?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), OrchestrationError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
