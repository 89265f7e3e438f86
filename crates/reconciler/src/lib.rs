// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! swnas-reconciler: the boot reconciler (§4.5). Six independently
//! try-catchable steps that push persisted share/volume/bridge/container
//! state onto the live OS, idempotently, without ever deleting OS state
//! the database doesn't know about.

mod reconciler;
mod report;
mod source;

pub use reconciler::BootReconciler;
pub use report::{ReconcileReport, StepName, StepOutcome};
pub use source::{BridgeSpec, ContainerSpec, ReconcileSource, ShareSpec, VolumeSpec};
