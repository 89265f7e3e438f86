// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The Service Registry: one-time instantiation of every manager,
//! dependency-ordered start, signal-driven stop.
//!
//! Per the REDESIGN FLAGS, this is a single typed registry struct built
//! once in `main` and passed by handle to every consumer — there is no
//! module-level mutable global standing in for it. "First-wins" is
//! implemented with `tokio::sync::OnceCell`, the async analogue of
//! `sync.Once`: concurrent callers racing `get_or_init` all await the
//! same in-flight constructor and receive the same `Arc`.

mod manager;
mod once;
mod registry;

pub use manager::{DepClass, Manager};
pub use once::ManagerCell;
pub use registry::{RegistryBuilder, ServiceRegistry, ShutdownReport, StartupOutcome};
