// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The transient `HealthReport` shape: per-component checks rolled up
//! into counters and an overall status.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Ok,
    Warning,
    Error,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    pub name: &'static str,
    pub required: bool,
    pub found: bool,
    pub path: Option<String>,
    pub version: Option<String>,
    pub status: ComponentStatus,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub checks: Vec<ComponentCheck>,
    pub ok_count: usize,
    pub warning_count: usize,
    pub error_count: usize,
    pub missing_count: usize,
    pub overall: OverallStatus,
}

impl HealthReport {
    pub fn from_checks(checks: Vec<ComponentCheck>) -> Self {
        let ok_count = checks.iter().filter(|c| c.status == ComponentStatus::Ok).count();
        let warning_count = checks.iter().filter(|c| c.status == ComponentStatus::Warning).count();
        let error_count = checks.iter().filter(|c| c.status == ComponentStatus::Error).count();
        let missing_count = checks.iter().filter(|c| c.status == ComponentStatus::Missing).count();

        let has_fatal = checks
            .iter()
            .any(|c| c.required && matches!(c.status, ComponentStatus::Missing | ComponentStatus::Error));

        let overall = if has_fatal {
            OverallStatus::Unhealthy
        } else if warning_count > 0 || missing_count > 0 {
            OverallStatus::Degraded
        } else {
            OverallStatus::Healthy
        };

        Self { checks, ok_count, warning_count, error_count, missing_count, overall }
    }

    /// Whether a required component is missing or in error — startup
    /// must abort per the design's health check section.
    pub fn has_fatal_failure(&self) -> bool {
        self.checks
            .iter()
            .any(|c| c.required && matches!(c.status, ComponentStatus::Missing | ComponentStatus::Error))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Debug, Error)]
#[error("required component(s) missing or in error: {missing:?}")]
pub struct HealthCheckFailed {
    pub missing: Vec<&'static str>,
    pub report: HealthReport,
}
