// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persistent-task scheduler: owns the definition cache and running
//! set, runs the 30s dispatch loop, and fires executions.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use swnas_core::{Clock, ExecutionId, OrchestrationError, TaskId};
use swnas_registry::Manager;
use swnas_storage::scheduled_task::{self, ScheduledTask, TaskConfig};
use swnas_storage::task_execution::{self, ExecutionStatus, ExecutionTrigger};
use swnas_storage::{DbPool, StorageError};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cron::Schedule;
use crate::task_kind;

/// Dispatch loop wake interval.
pub const TICK_INTERVAL: Duration = Duration::from_secs(30);

fn ms_to_datetime(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_else(|| DateTime::from_timestamp_millis(0).unwrap_or_default())
}

#[derive(Clone)]
struct CachedTask {
    config: TaskConfig,
    timeout_seconds: u64,
    schedule: Schedule,
    /// Earliest instant (epoch ms) at which this task may fire next.
    /// Stateful across ticks: advanced to `schedule.next(now)` only when
    /// the task actually fires, so a fire minute is never re-entered by a
    /// later tick landing in the same minute.
    next_check_ms: i64,
    updated_at_ms: i64,
}

/// A scheduled task whose cron failed to parse is skipped entirely: it
/// stays enabled in the database (operators can see and fix it) but has
/// no cache entry, so it never fires until corrected.
type Cache = HashMap<TaskId, CachedTask>;

/// The due instant a freshly (re)loaded task should start from: the first
/// matching minute at or after a one-minute lookback, so a task that
/// becomes due between two ticks is not missed. `i64::MAX` (never due)
/// when the schedule has no match within the scan ceiling.
fn lookback_next_check(schedule: &Schedule, now_ms: i64) -> i64 {
    let lookback = ms_to_datetime(now_ms) - chrono::Duration::minutes(1);
    schedule.next(lookback).map(|d| d.timestamp_millis()).unwrap_or(i64::MAX)
}

/// Rebuild the cache from the database, carrying the in-memory
/// `next_check_ms` forward for a task that is unchanged since the last
/// refresh (`updated_at_ms` matches). A brand-new or just-edited task
/// falls back to its persisted `next_run_ms`, and only computes a fresh
/// lookback-based check when neither is available.
async fn build_cache(pool: &DbPool, now_ms: i64, previous: &Cache) -> Result<Cache, StorageError> {
    let tasks = scheduled_task::list_enabled(pool).await?;
    let mut cache = Cache::with_capacity(tasks.len());
    for task in tasks {
        match Schedule::parse(&task.cron_expr) {
            Ok(schedule) => {
                let next_check_ms = previous
                    .get(&task.id)
                    .filter(|prev| prev.updated_at_ms == task.updated_at_ms)
                    .map(|prev| prev.next_check_ms)
                    .or(task.next_run_ms)
                    .unwrap_or_else(|| lookback_next_check(&schedule, now_ms));
                cache.insert(
                    task.id,
                    CachedTask {
                        config: task.config,
                        timeout_seconds: task.timeout_seconds,
                        schedule,
                        next_check_ms,
                        updated_at_ms: task.updated_at_ms,
                    },
                );
            }
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "cron parse failed on cached task, skipping until fixed");
            }
        }
    }
    Ok(cache)
}

struct Inner<C: Clock + 'static> {
    pool: DbPool,
    clock: C,
    log_path: Option<PathBuf>,
    cache: Mutex<Cache>,
    running: Mutex<HashSet<TaskId>>,
    cancel: CancellationToken,
    loop_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

/// The scheduler manager. Generic over [`Clock`] so tests can drive time
/// without sleeping; production wires `SystemClock`.
pub struct Scheduler<C: Clock + 'static> {
    inner: Arc<Inner<C>>,
}

impl<C: Clock + 'static> Scheduler<C> {
    pub fn new(pool: DbPool, clock: C, log_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                pool,
                clock,
                log_path,
                cache: Mutex::new(HashMap::new()),
                running: Mutex::new(HashSet::new()),
                cancel: CancellationToken::new(),
                loop_handle: Mutex::new(None),
            }),
        }
    }

    /// Create a new scheduled task. Validates the cron expression before
    /// any write — a bad expression never reaches the database.
    pub async fn create_task(
        &self,
        name: &str,
        enabled: bool,
        cron_expr: &str,
        config: TaskConfig,
        timeout_seconds: u64,
    ) -> Result<TaskId, OrchestrationError> {
        Schedule::parse(cron_expr).map_err(|e| OrchestrationError::ConfigInvalid(e.to_string()))?;

        let id = TaskId::new();
        let now_ms = self.inner.clock.epoch_ms() as i64;
        scheduled_task::insert(&self.inner.pool, &id, name, enabled, cron_expr, &config, timeout_seconds, now_ms)
            .await
            .map_err(storage_err)?;
        self.refresh_cache().await?;
        Ok(id)
    }

    /// Update an existing task. Validates before writing; an enabled
    /// task's next fire resets to "now" per the edit semantics (the
    /// storage layer clears `next_run_ms` on every update).
    pub async fn update_task(
        &self,
        id: &TaskId,
        name: &str,
        enabled: bool,
        cron_expr: &str,
        config: TaskConfig,
        timeout_seconds: u64,
    ) -> Result<(), OrchestrationError> {
        Schedule::parse(cron_expr).map_err(|e| OrchestrationError::ConfigInvalid(e.to_string()))?;

        let now_ms = self.inner.clock.epoch_ms() as i64;
        scheduled_task::update(&self.inner.pool, id, name, enabled, cron_expr, &config, timeout_seconds, now_ms)
            .await
            .map_err(storage_err)?;
        self.refresh_cache().await?;
        Ok(())
    }

    pub async fn delete_task(&self, id: &TaskId) -> Result<(), OrchestrationError> {
        scheduled_task::delete(&self.inner.pool, id).await.map_err(storage_err)?;
        self.inner.cache.lock().remove(id);
        Ok(())
    }

    pub async fn get_task(&self, id: &TaskId) -> Result<Option<ScheduledTask>, OrchestrationError> {
        scheduled_task::get(&self.inner.pool, id).await.map_err(storage_err)
    }

    pub async fn list_tasks(&self) -> Result<Vec<ScheduledTask>, OrchestrationError> {
        scheduled_task::list_all(&self.inner.pool).await.map_err(storage_err)
    }

    /// Reload the definition cache from the database. Called at the
    /// start of every tick, and after every create/update/delete, so
    /// edits propagate within one tick.
    pub async fn refresh_cache(&self) -> Result<(), OrchestrationError> {
        let now_ms = self.inner.clock.epoch_ms() as i64;
        let previous = self.inner.cache.lock().clone();
        let next = build_cache(&self.inner.pool, now_ms, &previous).await.map_err(storage_err)?;
        *self.inner.cache.lock() = next;
        Ok(())
    }

    /// Look up a task's current next-fire instant without mutating any
    /// state, for status reporting.
    pub fn next_run(&self, id: &TaskId, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.inner.cache.lock().get(id).and_then(|c| c.schedule.next(after))
    }

    pub fn is_running(&self, id: &TaskId) -> bool {
        self.inner.running.lock().contains(id)
    }

    /// One dispatch tick: refresh the cache, find due tasks, spawn each
    /// fire as an independent task so one slow task never blocks others.
    async fn tick(inner: &Arc<Inner<C>>) {
        let now_ms = inner.clock.epoch_ms() as i64;
        let previous = inner.cache.lock().clone();
        match build_cache(&inner.pool, now_ms, &previous).await {
            Ok(next) => *inner.cache.lock() = next,
            Err(e) => {
                warn!(error = %e, "scheduler tick failed to refresh definition cache");
                return;
            }
        }

        let due: Vec<TaskId> = {
            let cache = inner.cache.lock();
            let running = inner.running.lock();
            cache
                .iter()
                .filter(|(id, _)| !running.contains(*id))
                .filter(|(_, cached)| now_ms >= cached.next_check_ms)
                .map(|(id, _)| *id)
                .collect()
        };

        for id in due {
            inner.running.lock().insert(id);
            let inner = inner.clone();
            tokio::spawn(async move {
                fire(&inner, id, ExecutionTrigger::Scheduler).await;
            });
        }
    }

    /// Manually trigger a task's execution path immediately, bypassing
    /// schedule checks. Still respects the running-set: a task already
    /// executing is not fired twice.
    pub async fn run_now(&self, id: &TaskId) -> Result<ExecutionId, OrchestrationError> {
        if !self.inner.running.lock().insert(*id) {
            return Err(OrchestrationError::Precondition(format!("task {id} is already running")));
        }

        let task = match scheduled_task::get(&self.inner.pool, id).await.map_err(storage_err) {
            Ok(Some(task)) => task,
            Ok(None) => {
                self.inner.running.lock().remove(id);
                return Err(OrchestrationError::NotFound(format!("scheduled_task {id}")));
            }
            Err(e) => {
                self.inner.running.lock().remove(id);
                return Err(e);
            }
        };

        let exec_id = ExecutionId::new();
        let inner = self.inner.clone();
        let task_id = *id;
        tokio::spawn(async move {
            fire_one(&inner, task_id, exec_id, task.config, task.timeout_seconds, ExecutionTrigger::Manual).await;
        });
        Ok(exec_id)
    }
}

async fn fire<C: Clock + 'static>(inner: &Arc<Inner<C>>, task_id: TaskId, trigger: ExecutionTrigger) {
    let cached = { inner.cache.lock().get(&task_id).map(|c| (c.config.clone(), c.timeout_seconds)) };

    let Some((config, timeout_seconds)) = cached else {
        inner.running.lock().remove(&task_id);
        return;
    };

    let exec_id = ExecutionId::new();
    fire_one(inner, task_id, exec_id, config, timeout_seconds, trigger).await;
}

async fn fire_one<C: Clock + 'static>(
    inner: &Arc<Inner<C>>,
    task_id: TaskId,
    exec_id: ExecutionId,
    config: TaskConfig,
    timeout_seconds: u64,
    trigger: ExecutionTrigger,
) {
    let started_at_ms = inner.clock.epoch_ms() as i64;

    if let Err(e) = task_execution::start(&inner.pool, &exec_id, &task_id, trigger, started_at_ms).await {
        warn!(task_id = %task_id, error = %e, "failed to record execution start, aborting fire");
        inner.running.lock().remove(&task_id);
        return;
    }

    let wall_start = tokio::time::Instant::now();
    let timeout = Duration::from_secs(timeout_seconds.max(1));
    let dispatch_result = tokio::time::timeout(
        timeout,
        task_kind::dispatch(&inner.pool, &config, started_at_ms, inner.log_path.as_deref()),
    )
    .await;

    let (status, output, error_text) = match dispatch_result {
        Err(_elapsed) => (ExecutionStatus::Timeout, None, Some(format!("exceeded {timeout_seconds}s timeout"))),
        Ok(Ok(output)) => (ExecutionStatus::Success, Some(output), None),
        Ok(Err(err)) => (ExecutionStatus::Failed, None, Some(err)),
    };

    let duration_ms = wall_start.elapsed().as_millis() as i64;
    let completed_at_ms = started_at_ms + duration_ms;

    if let Err(e) = task_execution::complete(
        &inner.pool,
        &exec_id,
        status,
        completed_at_ms,
        duration_ms,
        output.as_deref(),
        error_text.as_deref(),
    )
    .await
    {
        warn!(task_id = %task_id, error = %e, "failed to persist execution completion");
    }

    // Advance the in-memory next-check alongside the persisted one so a
    // later tick within the same refresh window (before the database
    // round-trip lands) still sees this occurrence as already handled.
    let next_run_ms = {
        let mut cache = inner.cache.lock();
        let next =
            cache.get(&task_id).and_then(|c| c.schedule.next(ms_to_datetime(completed_at_ms))).map(|d| d.timestamp_millis());
        if let Some(cached) = cache.get_mut(&task_id) {
            cached.next_check_ms = next.unwrap_or(i64::MAX);
        }
        next
    };

    if let Err(e) =
        scheduled_task::record_fire_outcome(&inner.pool, &task_id, status.as_str(), error_text.as_deref(), next_run_ms)
            .await
    {
        warn!(task_id = %task_id, error = %e, "failed to persist task fire outcome");
    }

    inner.running.lock().remove(&task_id);
}

fn storage_err(e: StorageError) -> OrchestrationError {
    e.into()
}

#[async_trait]
impl<C: Clock + 'static> Manager for Scheduler<C> {
    fn name(&self) -> &'static str {
        "scheduler"
    }

    async fn start(&self) -> Result<(), OrchestrationError> {
        self.refresh_cache().await?;

        let inner = self.inner.clone();
        let cancel = self.inner.cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("scheduler dispatch loop stopping");
                        break;
                    }
                    _ = interval.tick() => {
                        Scheduler::tick(&inner).await;
                    }
                }
            }
        });

        *self.inner.loop_handle.lock() = Some(handle);
        Ok(())
    }

    async fn stop(&self) -> Result<(), OrchestrationError> {
        self.inner.cancel.cancel();
        let handle = self.inner.loop_handle.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
