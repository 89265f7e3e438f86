// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The rows the reconciler walks. Ownership of the full share/volume/
//! bridge/container tables is out of scope here — a [`ReconcileSource`]
//! is the seam the real persistence layer plugs into; it hands back the
//! minimal read-only shape each step needs.

use async_trait::async_trait;
use swnas_core::OrchestrationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSpec {
    pub name: String,
    pub path: String,
    pub owner: String,
    pub group: String,
    pub mode: u32,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeSpec {
    pub device: String,
    pub mount_target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSpec {
    pub name: String,
    pub members: Vec<String>,
    pub ip_cidr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub autostart: bool,
}

/// The persisted-table reads the boot reconciler needs. A real server
/// wires this against its storage layer; tests wire it against a fixed
/// in-memory fixture.
#[async_trait]
pub trait ReconcileSource: Send + Sync {
    async fn shares(&self) -> Result<Vec<ShareSpec>, OrchestrationError>;
    async fn volumes(&self) -> Result<Vec<VolumeSpec>, OrchestrationError>;
    async fn bridges(&self) -> Result<Vec<BridgeSpec>, OrchestrationError>;
    async fn containers(&self) -> Result<Vec<ContainerSpec>, OrchestrationError>;
}
