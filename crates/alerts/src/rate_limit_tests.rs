// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::TimeZone;

use super::*;

fn at(minute: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + minute * 60, 0).unwrap()
}

#[test]
fn first_acquire_always_succeeds() {
    let limiter = RateLimiter::new();
    assert!(limiter.try_acquire("failed_login", at(0), chrono::Duration::minutes(15)));
}

#[test]
fn second_acquire_within_window_is_rejected() {
    let limiter = RateLimiter::new();
    assert!(limiter.try_acquire("failed_login", at(0), chrono::Duration::minutes(15)));
    assert!(!limiter.try_acquire("failed_login", at(5), chrono::Duration::minutes(15)));
}

#[test]
fn acquire_after_window_elapses_succeeds_and_resets_the_clock() {
    let limiter = RateLimiter::new();
    assert!(limiter.try_acquire("failed_login", at(0), chrono::Duration::minutes(15)));
    assert!(limiter.try_acquire("failed_login", at(16), chrono::Duration::minutes(15)));
    assert!(!limiter.try_acquire("failed_login", at(20), chrono::Duration::minutes(15)));
}

#[test]
fn event_types_are_independent() {
    let limiter = RateLimiter::new();
    assert!(limiter.try_acquire("failed_login", at(0), chrono::Duration::minutes(15)));
    assert!(limiter.try_acquire("ip_block", at(1), chrono::Duration::minutes(15)));
}
