// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn wildcard_expands_to_full_range() {
    let field = FieldSet::parse("*", 0, 59, "minute").expect("parse");
    assert_eq!(field.values.len(), 60);
    assert!(field.contains(0));
    assert!(field.contains(59));
}

#[test]
fn step_expands_from_min_upward() {
    let field = FieldSet::parse("*/15", 0, 59, "minute").expect("parse");
    assert_eq!(field.values, BTreeSet::from([0, 15, 30, 45]));
}

#[test]
fn range_is_inclusive() {
    let field = FieldSet::parse("1-5", 1, 31, "day").expect("parse");
    assert_eq!(field.values, BTreeSet::from([1, 2, 3, 4, 5]));
}

#[test]
fn comma_list_of_singles() {
    let field = FieldSet::parse("1,3,5", 0, 23, "hour").expect("parse");
    assert_eq!(field.values, BTreeSet::from([1, 3, 5]));
}

#[test]
fn single_value() {
    let field = FieldSet::parse("7", 1, 12, "month").expect("parse");
    assert_eq!(field.values, BTreeSet::from([7]));
}

#[test]
fn out_of_range_value_is_rejected() {
    let err = FieldSet::parse("60", 0, 59, "minute").unwrap_err();
    assert!(matches!(err, FieldParseError::OutOfRange { .. }));
}

#[test]
fn inverted_range_is_rejected() {
    let err = FieldSet::parse("5-1", 0, 59, "minute").unwrap_err();
    assert!(matches!(err, FieldParseError::InvalidRange { .. }));
}

#[test]
fn zero_step_is_rejected() {
    let err = FieldSet::parse("*/0", 0, 59, "minute").unwrap_err();
    assert!(matches!(err, FieldParseError::InvalidStep(..)));
}

#[test]
fn empty_field_is_rejected() {
    let err = FieldSet::parse("", 0, 59, "minute").unwrap_err();
    assert!(matches!(err, FieldParseError::Empty { .. }));
}

#[test]
fn garbage_value_is_malformed() {
    let err = FieldSet::parse("abc", 0, 59, "minute").unwrap_err();
    assert!(matches!(err, FieldParseError::Malformed(..)));
}
