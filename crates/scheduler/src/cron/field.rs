// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single cron field: the set of values it matches, plus the parser
//! for the grammar in the design's §4.3 — `*`, `*/N`, `a-b`, `a,b,c`, or
//! a single value.

use std::collections::BTreeSet;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldParseError {
    #[error("{field}: empty field")]
    Empty { field: &'static str },

    #[error("{field}: value {value} out of range {min}-{max}")]
    OutOfRange { field: &'static str, value: i64, min: u32, max: u32 },

    #[error("{field}: invalid step {0}")]
    InvalidStep(String, &'static str),

    #[error("{field}: invalid range {start}-{end} (start must be <= end)")]
    InvalidRange { field: &'static str, start: i64, end: i64 },

    #[error("{field}: could not parse {0:?}")]
    Malformed(String, &'static str),
}

/// The set of values a single cron field matches, represented as a
/// sorted set over the field's valid range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    pub values: BTreeSet<u32>,
    pub min: u32,
    pub max: u32,
}

impl FieldSet {
    pub fn contains(&self, value: u32) -> bool {
        self.values.contains(&value)
    }

    /// Parse one cron field of text against `[min, max]` inclusive.
    /// `field` names the field for error messages.
    pub fn parse(text: &str, min: u32, max: u32, field: &'static str) -> Result<Self, FieldParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FieldParseError::Empty { field });
        }

        let mut values = BTreeSet::new();
        for part in text.split(',') {
            parse_part(part, min, max, field, &mut values)?;
        }

        Ok(Self { values, min, max })
    }

    pub fn full_range(min: u32, max: u32) -> Self {
        Self { values: (min..=max).collect(), min, max }
    }
}

fn parse_part(
    part: &str,
    min: u32,
    max: u32,
    field: &'static str,
    out: &mut BTreeSet<u32>,
) -> Result<(), FieldParseError> {
    let part = part.trim();

    if part == "*" {
        out.extend(min..=max);
        return Ok(());
    }

    if let Some(step_str) = part.strip_prefix("*/") {
        let step: u32 = step_str
            .parse()
            .map_err(|_| FieldParseError::InvalidStep(part.to_string(), field))?;
        if step == 0 {
            return Err(FieldParseError::InvalidStep(part.to_string(), field));
        }
        let mut v = min;
        while v <= max {
            out.insert(v);
            v += step;
        }
        return Ok(());
    }

    if let Some((start_str, end_str)) = part.split_once('-') {
        let start = parse_value(start_str, min, max, field)?;
        let end = parse_value(end_str, min, max, field)?;
        if start > end {
            return Err(FieldParseError::InvalidRange { field, start: start as i64, end: end as i64 });
        }
        out.extend(start..=end);
        return Ok(());
    }

    let v = parse_value(part, min, max, field)?;
    out.insert(v);
    Ok(())
}

fn parse_value(text: &str, min: u32, max: u32, field: &'static str) -> Result<u32, FieldParseError> {
    let v: i64 = text.trim().parse().map_err(|_| FieldParseError::Malformed(text.to_string(), field))?;
    if v < min as i64 || v > max as i64 {
        return Err(FieldParseError::OutOfRange { field, value: v, min, max });
    }
    Ok(v as u32)
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
