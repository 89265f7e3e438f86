// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Email delivery: authenticated SMTP submission via `lettre`.
//!
//! `lettre`'s transport is synchronous; submission is dispatched onto a
//! blocking thread so it does not hold up the async executor while the
//! SMTP transaction runs, per the suspension-point guidance covering
//! SMTP transactions.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use swnas_storage::alert_configuration::AlertConfiguration;

const DEFAULT_FROM_NAME: &str = "StumpfWorks NAS";

pub async fn send_email(config: &AlertConfiguration, subject: &str, html_body: &str) -> Result<(), String> {
    let config = config.clone();
    let subject = subject.to_string();
    let html_body = html_body.to_string();

    tokio::task::spawn_blocking(move || send_email_blocking(&config, &subject, &html_body))
        .await
        .map_err(|e| format!("email worker panicked: {e}"))?
}

fn send_email_blocking(config: &AlertConfiguration, subject: &str, html_body: &str) -> Result<(), String> {
    let host = config.smtp_host.as_deref().ok_or("no SMTP host configured")?;
    let recipient = config.recipient.as_deref().ok_or("no alert recipient configured")?;
    let username = config.smtp_username.clone().unwrap_or_default();

    let from_address = config.smtp_from_address.as_deref().unwrap_or(&username);
    let from_name = config.smtp_from_name.as_deref().unwrap_or(DEFAULT_FROM_NAME);

    let message = Message::builder()
        .from(format!("{from_name} <{from_address}>").parse().map_err(|e| format!("invalid from address: {e}"))?)
        .to(recipient.parse().map_err(|e| format!("invalid recipient: {e}"))?)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html_body.to_string())
        .map_err(|e| format!("failed to build message: {e}"))?;

    let mut builder = if config.smtp_tls {
        SmtpTransport::relay(host).map_err(|e| format!("failed to configure TLS transport: {e}"))?
    } else {
        SmtpTransport::builder_dangerous(host)
    };
    builder = builder.port(config.smtp_port as u16);

    if let Some(password) = config.smtp_password.clone().filter(|p| !p.is_empty()) {
        builder = builder.credentials(Credentials::new(username, password));
    }

    let transport = builder.build();
    transport.send(&message).map_err(|e| format!("SMTP submission failed: {e}"))?;
    Ok(())
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
