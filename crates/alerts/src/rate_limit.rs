// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The rate-limit gate: a single mutex covering the whole `last_sent`
//! map, keyed by event type, global per type (not per recipient).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

#[derive(Default)]
pub struct RateLimiter {
    last_sent: Mutex<HashMap<&'static str, DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `event_key` may fire at `now` given `window`, and if
    /// so atomically record `now` as its new last-sent time. Returns
    /// `false` when the caller should silently skip.
    pub fn try_acquire(&self, event_key: &'static str, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        let mut map = self.last_sent.lock();
        if let Some(last) = map.get(event_key) {
            if now - *last <= window {
                return false;
            }
        }
        map.insert(event_key, now);
        true
    }
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
