// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapts the boot reconciler (a one-shot operation, not a background
//! loop) onto the [`Manager`] trait so it takes its place in the
//! registry's dependency-ordered startup like every other subsystem: it
//! runs its six steps exactly once, during `start`, and never aborts the
//! rest of startup even if every step warns.

use async_trait::async_trait;
use parking_lot::Mutex;
use swnas_core::OrchestrationError;
use swnas_reconciler::{BootReconciler, ReconcileReport, ReconcileSource};
use swnas_registry::Manager;
use tracing::{info, warn};

pub struct ReconcilerManager<S: ReconcileSource> {
    reconciler: BootReconciler<S>,
    last_report: Mutex<Option<ReconcileReport>>,
}

impl<S: ReconcileSource> ReconcilerManager<S> {
    pub fn new(reconciler: BootReconciler<S>) -> Self {
        Self { reconciler, last_report: Mutex::new(None) }
    }

    pub fn last_report(&self) -> Option<ReconcileReport> {
        self.last_report.lock().clone()
    }
}

#[async_trait]
impl<S: ReconcileSource + 'static> Manager for ReconcilerManager<S> {
    fn name(&self) -> &'static str {
        "boot_reconciler"
    }

    async fn start(&self) -> Result<(), OrchestrationError> {
        let report = self.reconciler.run().await;
        if report.has_warnings() {
            warn!(steps = ?report.steps, "boot reconcile finished with warnings");
        } else {
            info!(steps = report.steps.len(), "boot reconcile finished cleanly");
        }
        *self.last_report.lock() = Some(report);
        Ok(())
    }

    async fn stop(&self) -> Result<(), OrchestrationError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}
