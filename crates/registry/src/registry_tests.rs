// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use swnas_core::OrchestrationError;

use super::*;

struct FakeManager {
    name: &'static str,
    started: AtomicUsize,
    stopped: AtomicUsize,
    enabled: AtomicBool,
    fail_start: bool,
    stop_delay: Duration,
}

impl FakeManager {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            started: AtomicUsize::new(0),
            stopped: AtomicUsize::new(0),
            enabled: AtomicBool::new(true),
            fail_start: false,
            stop_delay: Duration::ZERO,
        }
    }

    fn failing(name: &'static str) -> Self {
        Self { fail_start: true, enabled: AtomicBool::new(false), ..Self::new(name) }
    }

    fn slow_stop(name: &'static str, delay: Duration) -> Self {
        Self { stop_delay: delay, ..Self::new(name) }
    }
}

#[async_trait]
impl Manager for FakeManager {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn start(&self) -> Result<(), OrchestrationError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(OrchestrationError::NotAvailable(self.name.to_string()));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), OrchestrationError> {
        if !self.stop_delay.is_zero() {
            tokio::time::sleep(self.stop_delay).await;
        }
        self.stopped.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn starts_managers_in_registration_order_and_reports_enabled() {
    let foundation = Arc::new(FakeManager::new("database"));
    let scheduler = Arc::new(FakeManager::new("scheduler"));

    let (registry, outcomes) = RegistryBuilder::new()
        .register(DepClass::Foundation, foundation.clone())
        .register(DepClass::PolicyServices, scheduler.clone())
        .start_all()
        .await
        .expect("startup succeeds");

    assert_eq!(foundation.started.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.started.load(Ordering::SeqCst), 1);
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.enabled));
    assert_eq!(registry.enabled_managers(), vec!["database", "scheduler"]);
}

#[tokio::test]
async fn non_fatal_manager_failure_is_logged_and_continues() {
    let samba = Arc::new(FakeManager::failing("samba"));
    let scheduler = Arc::new(FakeManager::new("scheduler"));

    let (registry, outcomes) = RegistryBuilder::new()
        .register(DepClass::SharingBackends, samba.clone())
        .register(DepClass::PolicyServices, scheduler.clone())
        .start_all()
        .await
        .expect("startup still succeeds overall");

    let samba_outcome = outcomes.iter().find(|o| o.name == "samba").expect("samba outcome present");
    assert!(!samba_outcome.enabled);
    assert!(samba_outcome.error.is_some());
    assert!(!registry.enabled_managers().contains(&"samba"));
    assert!(registry.enabled_managers().contains(&"scheduler"));
}

#[tokio::test]
async fn fatal_foundation_failure_aborts_startup() {
    let database = Arc::new(FakeManager::failing("database"));

    let result = RegistryBuilder::new().register(DepClass::Foundation, database).start_all().await;

    assert!(result.is_err());
}

#[tokio::test]
async fn stop_all_runs_in_reverse_order() {
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

    struct OrderTrackingManager {
        name: &'static str,
        order: Arc<parking_lot::Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Manager for OrderTrackingManager {
        fn name(&self) -> &'static str {
            self.name
        }
        async fn start(&self) -> Result<(), OrchestrationError> {
            Ok(())
        }
        async fn stop(&self) -> Result<(), OrchestrationError> {
            self.order.lock().push(self.name);
            Ok(())
        }
        fn is_enabled(&self) -> bool {
            true
        }
    }

    let first = Arc::new(OrderTrackingManager { name: "first", order: order.clone() });
    let second = Arc::new(OrderTrackingManager { name: "second", order: order.clone() });

    let (registry, _) = RegistryBuilder::new()
        .register(DepClass::Foundation, first)
        .register(DepClass::PolicyServices, second)
        .start_all()
        .await
        .expect("startup");

    registry.stop_all().await;

    assert_eq!(*order.lock(), vec!["second", "first"]);
}

#[tokio::test]
async fn shutdown_budget_exhaustion_abandons_remaining_managers() {
    let slow = Arc::new(FakeManager::slow_stop("slow", Duration::from_millis(200)));
    let quick = Arc::new(FakeManager::new("quick"));

    let (registry, _) = RegistryBuilder::new()
        .register(DepClass::Foundation, slow.clone())
        .register(DepClass::PolicyServices, quick.clone())
        .start_all()
        .await
        .expect("startup");

    // quick stops first (reverse order) and consumes the whole tiny budget
    // before slow can even begin.
    let report = registry.stop_all_with_budget(Duration::from_millis(1)).await;

    assert!(report.timed_out || !report.warnings.is_empty());
}

#[tokio::test]
async fn find_returns_registered_manager_by_name() {
    let scheduler = Arc::new(FakeManager::new("scheduler"));
    let (registry, _) = RegistryBuilder::new()
        .register(DepClass::PolicyServices, scheduler)
        .start_all()
        .await
        .expect("startup");

    assert!(registry.find("scheduler").is_some());
    assert!(registry.find("missing").is_none());
}
