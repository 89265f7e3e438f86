// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A generic capability-wrapper [`Manager`]: checks once at start whether
//! its backing binary is present via the Shell Executor, and reports
//! itself enabled or disabled accordingly. The individual tool-wrapper
//! surfaces this represents (Samba user management, ACL, quota, DRBD,
//! VM/LXC/Docker/VPN control, ...) are out of scope per the design's
//! non-goals; this is the thin registry-membership shim each of those
//! managers would sit behind, standing in for them so the registry's
//! full dependency-class ordering is exercised end to end.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use swnas_core::OrchestrationError;
use swnas_registry::Manager;
use swnas_shell::Executor;
use tracing::{info, warn};

pub struct ToolManager {
    name: &'static str,
    binary: &'static str,
    executor: Arc<Executor>,
    enabled: AtomicBool,
}

impl ToolManager {
    pub fn new(name: &'static str, binary: &'static str, executor: Arc<Executor>) -> Self {
        Self { name, binary, executor, enabled: AtomicBool::new(false) }
    }
}

#[async_trait]
impl Manager for ToolManager {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn start(&self) -> Result<(), OrchestrationError> {
        let found = self.executor.command_exists(self.binary);
        self.enabled.store(found, Ordering::SeqCst);
        if found {
            info!(manager = self.name, binary = self.binary, "backing tool found, manager enabled");
        } else {
            warn!(manager = self.name, binary = self.binary, "backing tool not found, manager disabled");
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), OrchestrationError> {
        self.enabled.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}
