// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The outcome of one reconciliation pass: one entry per step, success
//! or a warning, never an abort.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    DefaultShares,
    SharePermissions,
    SambaConfig,
    PersistedVolumes,
    NetworkBridges,
    LxcAutostart,
}

impl StepName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DefaultShares => "default_shares",
            Self::SharePermissions => "share_permissions",
            Self::SambaConfig => "samba_config",
            Self::PersistedVolumes => "persisted_volumes",
            Self::NetworkBridges => "network_bridges",
            Self::LxcAutostart => "lxc_autostart",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: StepName,
    pub changed: u32,
    pub warning: Option<String>,
}

impl StepOutcome {
    pub fn ok(step: StepName, changed: u32) -> Self {
        Self { step, changed, warning: None }
    }

    pub fn warn(step: StepName, message: impl Into<String>) -> Self {
        Self { step, changed: 0, warning: Some(message.into()) }
    }

    pub fn is_ok(&self) -> bool {
        self.warning.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ReconcileReport {
    pub steps: Vec<StepOutcome>,
}

impl ReconcileReport {
    pub fn push(&mut self, outcome: StepOutcome) {
        self.steps.push(outcome);
    }

    pub fn has_warnings(&self) -> bool {
        self.steps.iter().any(|s| !s.is_ok())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
