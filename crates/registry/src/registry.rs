// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `ServiceRegistry` itself: dependency-ordered start, signal-driven
//! stop with a total shutdown budget.

use std::sync::Arc;
use std::time::Duration;

use swnas_core::OrchestrationError;
use tracing::{info, warn};

use crate::manager::{DepClass, Manager};

/// Total wall-clock budget for shutdown across every running manager.
pub const SHUTDOWN_BUDGET: Duration = Duration::from_secs(30);

struct Entry {
    dep_class: DepClass,
    manager: Arc<dyn Manager>,
}

/// Outcome of starting one manager during registry startup.
#[derive(Debug, Clone)]
pub struct StartupOutcome {
    pub name: &'static str,
    pub dep_class: DepClass,
    pub enabled: bool,
    pub error: Option<String>,
}

/// Outcome of the full shutdown sequence.
#[derive(Debug, Clone, Default)]
pub struct ShutdownReport {
    pub stopped: Vec<&'static str>,
    pub warnings: Vec<String>,
    pub timed_out: bool,
}

/// Builds a [`ServiceRegistry`] by registering managers in dependency
/// order. Managers are started in registration order and stopped in
/// reverse.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<Entry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, dep_class: DepClass, manager: Arc<dyn Manager>) -> Self {
        self.entries.push(Entry { dep_class, manager });
        self
    }

    /// Start every registered manager in dependency order. A failure in
    /// [`DepClass::Foundation`] aborts startup (`Err` is returned
    /// immediately, leaving already-started foundation managers for the
    /// caller to unwind via `stop_all` if desired). A failure anywhere
    /// else is logged and the registry proceeds — the failing manager's
    /// `is_enabled()` is expected to report `false` from then on.
    pub async fn start_all(self) -> Result<(ServiceRegistry, Vec<StartupOutcome>), OrchestrationError> {
        let mut outcomes = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            let result = entry.manager.start().await;
            match result {
                Ok(()) => {
                    info!(manager = entry.manager.name(), "manager started");
                    outcomes.push(StartupOutcome {
                        name: entry.manager.name(),
                        dep_class: entry.dep_class,
                        enabled: entry.manager.is_enabled(),
                        error: None,
                    });
                }
                Err(e) => {
                    if entry.dep_class.is_fatal_class() {
                        return Err(e);
                    }
                    warn!(manager = entry.manager.name(), error = %e, "manager failed to start, continuing disabled");
                    outcomes.push(StartupOutcome {
                        name: entry.manager.name(),
                        dep_class: entry.dep_class,
                        enabled: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        Ok((ServiceRegistry { entries: self.entries }, outcomes))
    }
}

/// The process-wide set of manager singletons, built once in `main` and
/// passed by handle to every consumer. Owns every manager exclusively for
/// the process lifetime.
pub struct ServiceRegistry {
    entries: Vec<Entry>,
}

impl ServiceRegistry {
    pub fn find(&self, name: &str) -> Option<Arc<dyn Manager>> {
        self.entries.iter().find(|e| e.manager.name() == name).map(|e| e.manager.clone())
    }

    pub fn enabled_managers(&self) -> Vec<&'static str> {
        self.entries.iter().filter(|e| e.manager.is_enabled()).map(|e| e.manager.name()).collect()
    }

    /// Stop every manager in reverse start order under [`SHUTDOWN_BUDGET`]
    /// total. Per-manager stop failures are logged and do not block
    /// sibling shutdowns; if the total budget is exceeded the remaining
    /// managers are abandoned (not forcibly killed — they may still be
    /// completing in-flight work) and the report records `timed_out`.
    pub async fn stop_all(&self) -> ShutdownReport {
        self.stop_all_with_budget(SHUTDOWN_BUDGET).await
    }

    pub async fn stop_all_with_budget(&self, budget: Duration) -> ShutdownReport {
        let mut report = ShutdownReport::default();
        let deadline = tokio::time::Instant::now() + budget;

        for entry in self.entries.iter().rev() {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                report.timed_out = true;
                report.warnings.push(format!("{}: abandoned, shutdown budget exhausted", entry.manager.name()));
                continue;
            }

            match tokio::time::timeout(remaining, entry.manager.stop()).await {
                Ok(Ok(())) => {
                    info!(manager = entry.manager.name(), "manager stopped");
                    report.stopped.push(entry.manager.name());
                }
                Ok(Err(e)) => {
                    warn!(manager = entry.manager.name(), error = %e, "manager stop failed");
                    report.warnings.push(format!("{}: {e}", entry.manager.name()));
                }
                Err(_elapsed) => {
                    report.timed_out = true;
                    warn!(manager = entry.manager.name(), "manager stop timed out");
                    report.warnings.push(format!("{}: stop timed out", entry.manager.name()));
                }
            }
        }

        report
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
