// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup and shutdown orchestration for `stumpfworksd`: open the
//! database, run the health check, start every manager in dependency
//! order (the boot reconciler runs as part of that sequence), block
//! until a shutdown signal, then stop everything inside the registry's
//! shutdown budget.

use std::sync::Arc;

use swnas_alerts::AlertEngine;
use swnas_core::{Config, OrchestrationError, SystemClock};
use swnas_health::run_health_check;
use swnas_reconciler::BootReconciler;
use swnas_registry::{DepClass, RegistryBuilder};
use swnas_scheduler::Scheduler;
use swnas_shell::Executor;
use swnas_storage::{open_pool, DbPool};
use tracing::{error, info, warn};

use crate::database_manager::DatabaseManager;
use crate::reconcile_source::DbReconcileSource;
use crate::reconciler_manager::ReconcilerManager;
use crate::tool_manager::ToolManager;

/// Run the server to completion: starts every subsystem, blocks until
/// SIGINT/SIGTERM, then shuts everything down. Returns `Err` only when a
/// foundation-class manager (the database) fails to start or a required
/// component is missing from the host — both abort startup entirely per
/// the error handling design; every other manager failure is logged and
/// that manager is left disabled.
pub async fn run_server(config: Config) -> Result<(), OrchestrationError> {
    let executor = Arc::new(Executor::new());

    let health = run_health_check(&executor).await.map_err(|failed| {
        error!(missing = ?failed.missing, "required component missing, aborting startup");
        OrchestrationError::NotAvailable(failed.to_string())
    })?;
    info!(components = health.checks.len(), overall = ?health.overall, "health check passed");

    let pool = open_pool(&config.database.dsn).await?;

    let (registry, outcomes) = build_registry(pool, executor).start_all().await?;
    for outcome in &outcomes {
        if !outcome.enabled {
            warn!(
                manager = outcome.name,
                dep_class = ?outcome.dep_class,
                error = ?outcome.error,
                "manager disabled at startup"
            );
        }
    }
    info!(enabled = ?registry.enabled_managers(), "service registry started");

    wait_for_shutdown_signal().await;
    info!("shutdown signal received, stopping managers");

    let report = registry.stop_all().await;
    if report.timed_out {
        warn!(warnings = ?report.warnings, "shutdown budget exceeded, some managers abandoned");
    } else if !report.warnings.is_empty() {
        warn!(warnings = ?report.warnings, "one or more managers reported a problem while stopping");
    }

    Ok(())
}

fn build_registry(pool: DbPool, executor: Arc<Executor>) -> RegistryBuilder {
    let reconcile_source = DbReconcileSource::new(pool.clone());
    let reconciler = BootReconciler::new(executor.clone(), reconcile_source);

    RegistryBuilder::new()
        .register(DepClass::Foundation, Arc::new(DatabaseManager::new(pool.clone())))
        .register(DepClass::SharingBackends, Arc::new(ToolManager::new("samba", "smbd", executor.clone())))
        .register(DepClass::SharingBackends, Arc::new(ToolManager::new("nfs", "exportfs", executor.clone())))
        .register(DepClass::StorageRehydration, Arc::new(ReconcilerManager::new(reconciler)))
        .register(DepClass::CapabilityWrappers, Arc::new(ToolManager::new("docker", "docker", executor.clone())))
        .register(DepClass::CapabilityWrappers, Arc::new(ToolManager::new("lxc", "lxc-ls", executor.clone())))
        .register(DepClass::CapabilityWrappers, Arc::new(ToolManager::new("openvpn", "openvpn", executor.clone())))
        .register(DepClass::PolicyServices, Arc::new(Scheduler::new(pool.clone(), SystemClock, None)))
        .register(DepClass::PolicyServices, Arc::new(AlertEngine::new(pool, SystemClock)))
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!(error = %e, "failed to install SIGTERM handler, only SIGINT will trigger shutdown");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registry_builds_and_starts_every_dep_class() {
        let pool = open_pool("sqlite::memory:").await.expect("open pool");
        let executor = Arc::new(Executor::new());
        let (registry, outcomes) = build_registry(pool, executor).start_all().await.expect("start_all");

        assert!(outcomes.iter().any(|o| o.name == "database" && o.enabled));
        assert!(outcomes.iter().any(|o| o.name == "boot_reconciler"));
        assert!(outcomes.iter().any(|o| o.name == "scheduler" && o.enabled));
        assert!(outcomes.iter().any(|o| o.name == "alerts" && o.enabled));

        let report = registry.stop_all().await;
        assert!(!report.timed_out);
    }
}
