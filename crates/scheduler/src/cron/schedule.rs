// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A parsed 5-field cron expression and its next-fire computation.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use thiserror::Error;

use super::field::{FieldParseError, FieldSet};

/// Four-year ceiling on the next-fire scan: guarantees termination for
/// leap-year + Feb-29 corner cases (`*/1 * 29 2 *` only fires once every
/// four years at most).
const MAX_SCAN_YEARS: i32 = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CronParseError {
    #[error("expected 5 space-separated fields, got {0}")]
    WrongFieldCount(usize),

    #[error(transparent)]
    Field(#[from] FieldParseError),
}

/// A parsed 5-field cron expression: minute, hour, day-of-month, month,
/// day-of-week. Weekday `7` normalizes to `0` (both mean Sunday).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub minute: FieldSet,
    pub hour: FieldSet,
    pub day_of_month: FieldSet,
    pub month: FieldSet,
    pub day_of_week: FieldSet,
}

impl Schedule {
    /// Parse a standard 5-field cron expression:
    /// `minute hour day-of-month month day-of-week`.
    pub fn parse(expr: &str) -> Result<Self, CronParseError> {
        let fields: Vec<&str> = expr.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(CronParseError::WrongFieldCount(fields.len()));
        }

        let minute = FieldSet::parse(fields[0], 0, 59, "minute")?;
        let hour = FieldSet::parse(fields[1], 0, 23, "hour")?;
        let day_of_month = FieldSet::parse(fields[2], 1, 31, "day_of_month")?;
        let month = FieldSet::parse(fields[3], 1, 12, "month")?;
        let mut day_of_week = FieldSet::parse(fields[4], 0, 7, "day_of_week")?;

        // Weekday 7 normalizes to 0: both mean Sunday.
        if day_of_week.values.remove(&7) {
            day_of_week.values.insert(0);
        }
        day_of_week.max = 6;

        Ok(Self { minute, hour, day_of_month, month, day_of_week })
    }

    /// Render back to the normalized 5-field string this struct would
    /// re-parse into an equal `Schedule` (used by the round-trip
    /// property test — normalized forms only, not the original text).
    pub fn to_normalized_string(&self) -> String {
        format!(
            "{} {} {} {} {}",
            render_field(&self.minute),
            render_field(&self.hour),
            render_field(&self.day_of_month),
            render_field(&self.month),
            render_field(&self.day_of_week),
        )
    }

    fn matches(&self, at: DateTime<Utc>) -> bool {
        self.minute.contains(at.minute())
            && self.hour.contains(at.hour())
            && self.day_of_month.contains(at.day())
            && self.month.contains(at.month())
            && self.day_of_week.contains(weekday_0_6(at))
    }

    /// Advance one minute from `after`, truncate to the minute boundary,
    /// then scan minute-by-minute up to the four-year ceiling for the
    /// first instant matching all five field sets.
    pub fn next(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut candidate = truncate_to_minute(after) + Duration::minutes(1);
        let ceiling = after + Duration::days(365 * MAX_SCAN_YEARS as i64 + 1);

        while candidate <= ceiling {
            if self.matches(candidate) {
                return Some(candidate);
            }
            candidate += Duration::minutes(1);
        }
        None
    }
}

fn render_field(field: &FieldSet) -> String {
    let full_len = (field.max - field.min + 1) as usize;
    if field.values.len() == full_len {
        return "*".to_string();
    }
    field.values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

fn truncate_to_minute(at: DateTime<Utc>) -> DateTime<Utc> {
    at - Duration::seconds(at.second() as i64) - Duration::nanoseconds(at.nanosecond() as i64)
}

/// chrono's `weekday().num_days_from_sunday()` already yields 0=Sunday..6=Saturday.
fn weekday_0_6(at: DateTime<Utc>) -> u32 {
    at.weekday().num_days_from_sunday()
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
