// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Manager` trait every registry entry implements, and the
//! dependency classes from the design's init sequence table.

use async_trait::async_trait;
use swnas_core::OrchestrationError;

/// A process-wide component wrapping one subsystem (database, samba,
/// scheduler, alert engine, ...) behind a stable interface. The registry
/// exclusively owns every manager for the process lifetime.
#[async_trait]
pub trait Manager: Send + Sync {
    /// Stable name used in logs and the startup health summary.
    fn name(&self) -> &'static str;

    /// Start background work (loops, connections). Called once, in
    /// dependency order, during registry startup.
    async fn start(&self) -> Result<(), OrchestrationError>;

    /// Stop background work. Called once, in reverse dependency order,
    /// during registry shutdown, under the overall shutdown budget.
    async fn stop(&self) -> Result<(), OrchestrationError>;

    /// Whether this manager is currently serving requests. A manager
    /// whose non-fatal `start` failed (missing optional dependency, bad
    /// config) reports `false` here rather than the registry tracking
    /// availability out-of-band.
    fn is_enabled(&self) -> bool;
}

/// The five dependency classes from the init sequence table, in the
/// fixed order the registry starts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DepClass {
    /// database, logger, core system library. Fatal if missing.
    Foundation,
    /// samba user manager, unix group manager. Non-fatal.
    SharingBackends,
    /// mount persisted volumes, restore bridges. Non-fatal.
    StorageRehydration,
    /// ACL, quota, DRBD, Pacemaker, Keepalived, VM, LXC, VPN, Docker,
    /// Plugins. Non-fatal.
    CapabilityWrappers,
    /// backup, cloud-backup, UPS, AD, AD-DC, audit, failed-login,
    /// updates, alerts, scheduler, 2FA, metrics, alert-rules. Non-fatal.
    PolicyServices,
}

impl DepClass {
    /// Whether a failure in this class aborts startup. Only the
    /// foundation class is fatal; every other manager that fails to
    /// start is logged and left disabled.
    pub fn is_fatal_class(self) -> bool {
        matches!(self, Self::Foundation)
    }

    pub const ORDER: [DepClass; 5] = [
        DepClass::Foundation,
        DepClass::SharingBackends,
        DepClass::StorageRehydration,
        DepClass::CapabilityWrappers,
        DepClass::PolicyServices,
    ];
}
