// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::pool::open_pool;

async fn test_pool() -> DbPool {
    open_pool("sqlite::memory:").await.expect("open pool")
}

#[tokio::test]
async fn load_or_init_creates_defaults_on_first_access() {
    let pool = test_pool().await;
    assert!(load(&pool).await.expect("load").is_none());

    let config = load_or_init(&pool).await.expect("load_or_init");
    assert!(!config.enabled);
    assert_eq!(config.failed_login_threshold, 3);
    assert_eq!(config.rate_limit_minutes, 15);
    assert_eq!(config.webhook_flavor, "generic");

    // Row now exists for subsequent plain loads.
    assert!(load(&pool).await.expect("load").is_some());
}

#[tokio::test]
async fn save_upserts_the_singleton_row() {
    let pool = test_pool().await;
    let mut config = load_or_init(&pool).await.expect("load_or_init");
    config.enabled = true;
    config.smtp_host = Some("smtp.example.com".to_string());
    config.webhook_flavor = WebhookFlavor::Discord.as_str().to_string();
    save(&pool, &config).await.expect("save");

    let reloaded = load(&pool).await.expect("load").expect("row exists");
    assert!(reloaded.enabled);
    assert_eq!(reloaded.smtp_host.as_deref(), Some("smtp.example.com"));
    assert_eq!(reloaded.webhook_flavor, "discord");
}

#[test]
fn webhook_flavor_round_trips() {
    assert_eq!(WebhookFlavor::parse("discord").as_str(), "discord");
    assert_eq!(WebhookFlavor::parse("slack").as_str(), "slack");
    assert_eq!(WebhookFlavor::parse("anything-else").as_str(), "generic");
}
