// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::TimeZone;
use proptest::prelude::*;

use super::*;

fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single().expect("valid datetime")
}

#[test]
fn s1_cron_parse_expands_expected_field_sets() {
    let schedule = Schedule::parse("*/15 * * * 1-5").expect("parse");
    assert_eq!(schedule.minute.values, std::collections::BTreeSet::from([0, 15, 30, 45]));
    assert_eq!(schedule.hour.values.len(), 24);
    assert_eq!(schedule.day_of_month.values.len(), 31);
    assert_eq!(schedule.month.values.len(), 12);
    assert_eq!(schedule.day_of_week.values, std::collections::BTreeSet::from([1, 2, 3, 4, 5]));
}

#[test]
fn s1_next_fire_from_monday_midnight() {
    let schedule = Schedule::parse("*/15 * * * 1-5").expect("parse");
    // 2024-01-01 is a Monday.
    let start = dt(2024, 1, 1, 0, 0);
    let next = schedule.next(start).expect("next fire exists");
    assert_eq!(next, dt(2024, 1, 1, 0, 15));
}

#[test]
fn weekday_seven_normalizes_to_sunday() {
    let with_seven = Schedule::parse("0 0 * * 7").expect("parse");
    let with_zero = Schedule::parse("0 0 * * 0").expect("parse");
    assert_eq!(with_seven.day_of_week.values, with_zero.day_of_week.values);
}

#[test]
fn wrong_field_count_is_rejected() {
    let err = Schedule::parse("* * * *").unwrap_err();
    assert!(matches!(err, CronParseError::WrongFieldCount(4)));
}

#[test]
fn next_skips_non_matching_minutes() {
    // Only fires at minute 30 of every hour.
    let schedule = Schedule::parse("30 * * * *").expect("parse");
    let start = dt(2024, 3, 10, 10, 0);
    let next = schedule.next(start).expect("next fire");
    assert_eq!(next, dt(2024, 3, 10, 10, 30));
}

#[test]
fn next_handles_feb_29_leap_day() {
    let schedule = Schedule::parse("0 0 29 2 *").expect("parse");
    let start = dt(2023, 3, 1, 0, 0);
    let next = schedule.next(start).expect("next fire within four year ceiling");
    assert_eq!(next, dt(2024, 2, 29, 0, 0));
}

#[test]
fn next_is_always_strictly_after_input() {
    let schedule = Schedule::parse("* * * * *").expect("parse");
    let now = dt(2024, 6, 15, 12, 30);
    let next = schedule.next(now).expect("next fire");
    assert!(next > now);
}

proptest! {
    #[test]
    fn invariant_next_is_always_after_and_matches_all_fields(
        minute_step in 1u32..30,
        hour in 0u32..24,
        day in 1u32..28,
        month in 1u32..13,
    ) {
        let expr = format!("*/{minute_step} {hour} {day} {month} *");
        let schedule = Schedule::parse(&expr).expect("valid expression");
        let now = dt(2024, 1, 1, 0, 0);
        if let Some(next) = schedule.next(now) {
            prop_assert!(next > now);
            prop_assert!(schedule.matches(next));
        }
    }

    #[test]
    fn invariant_field_round_trips_through_normalized_string(
        values in proptest::collection::btree_set(0u32..60, 1..10)
    ) {
        let text = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        let field = FieldSet::parse(&text, 0, 59, "minute").expect("valid field");
        let rendered = render_field(&field);
        let reparsed = FieldSet::parse(&rendered, 0, 59, "minute").expect("valid rendered field");
        prop_assert_eq!(field.values, reparsed.values);
    }
}
