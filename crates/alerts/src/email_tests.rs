// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn base_config() -> AlertConfiguration {
    AlertConfiguration {
        smtp_host: Some("smtp.example.com".to_string()),
        smtp_username: Some("alerts@example.com".to_string()),
        smtp_password: Some("secret".to_string()),
        recipient: Some("admin@example.com".to_string()),
        ..AlertConfiguration::default()
    }
}

#[tokio::test]
async fn missing_host_is_rejected_before_any_network_call() {
    let mut config = base_config();
    config.smtp_host = None;
    let err = send_email(&config, "subject", "<p>body</p>").await.unwrap_err();
    assert!(err.contains("SMTP host"));
}

#[tokio::test]
async fn missing_recipient_is_rejected_before_any_network_call() {
    let mut config = base_config();
    config.recipient = None;
    let err = send_email(&config, "subject", "<p>body</p>").await.unwrap_err();
    assert!(err.contains("recipient"));
}

#[test]
fn from_address_falls_back_to_smtp_username() {
    let config = base_config();
    let username = config.smtp_username.clone().unwrap_or_default();
    let from_address = config.smtp_from_address.as_deref().unwrap_or(&username);
    assert_eq!(from_address, "alerts@example.com");
}
