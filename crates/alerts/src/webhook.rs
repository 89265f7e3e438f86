// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook delivery: POST JSON, 10s timeout, payload shape depending on
//! the configured flavor.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use swnas_storage::alert_configuration::{AlertConfiguration, WebhookFlavor};

use crate::event::EventType;

const TIMEOUT: Duration = Duration::from_secs(10);
const SOURCE: &str = "stumpfworks-nas";

fn discord_color(event: &EventType) -> u32 {
    match event {
        EventType::FailedLogin { .. } => 0xE67E22,
        EventType::IpBlock { .. } | EventType::CriticalEvent { .. } => 0xE74C3C,
        EventType::SystemError { .. } => 0x3498DB,
    }
}

fn slack_color(event: &EventType) -> &'static str {
    match event {
        EventType::FailedLogin { .. } => "warning",
        EventType::IpBlock { .. } | EventType::CriticalEvent { .. } => "danger",
        EventType::SystemError { .. } => "good",
    }
}

fn build_payload(
    config: &AlertConfiguration,
    event: &EventType,
    subject: &str,
    plain_body: &str,
    now: DateTime<Utc>,
) -> Value {
    match WebhookFlavor::parse(&config.webhook_flavor) {
        WebhookFlavor::Discord => json!({
            "username": config.webhook_username,
            "avatar_url": config.webhook_avatar,
            "embeds": [{
                "title": subject,
                "description": plain_body,
                "color": discord_color(event),
                "timestamp": now.to_rfc3339(),
            }],
        }),
        WebhookFlavor::Slack => json!({
            "username": config.webhook_username,
            "icon_url": config.webhook_avatar,
            "attachments": [{
                "color": slack_color(event),
                "title": subject,
                "text": plain_body,
                "footer": SOURCE,
                "ts": now.timestamp(),
            }],
        }),
        WebhookFlavor::Generic => json!({
            "alert_type": event.key(),
            "subject": subject,
            "body": plain_body,
            "timestamp": now.to_rfc3339(),
            "source": SOURCE,
            "username": config.webhook_username,
        }),
    }
}

pub async fn send_webhook(
    client: &reqwest::Client,
    config: &AlertConfiguration,
    event: &EventType,
    subject: &str,
    plain_body: &str,
    now: DateTime<Utc>,
) -> Result<(), String> {
    let url = config.webhook_url.as_deref().ok_or("no webhook URL configured")?;
    let payload = build_payload(config, event, subject, plain_body, now);

    let response = client
        .post(url)
        .timeout(TIMEOUT)
        .json(&payload)
        .send()
        .await
        .map_err(|e| format!("webhook request failed: {e}"))?;

    let status = response.status();
    if status.as_u16() >= 200 && status.as_u16() < 300 {
        Ok(())
    } else {
        Err(format!("webhook returned status {status}"))
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
