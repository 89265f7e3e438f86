// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use swnas_core::FakeClock;
use swnas_registry::Manager;
use swnas_storage::open_pool;

use super::*;

async fn new_scheduler() -> (Scheduler<FakeClock>, FakeClock) {
    let pool = open_pool("sqlite::memory:").await.expect("open pool");
    let clock = FakeClock::new();
    (Scheduler::new(pool, clock.clone(), None), clock)
}

#[tokio::test]
async fn create_task_rejects_invalid_cron() {
    let (scheduler, _clock) = new_scheduler().await;
    let err = scheduler
        .create_task("bad", true, "not a cron", TaskConfig::Maintenance, 30)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "config_invalid");
}

#[tokio::test]
async fn create_task_populates_cache_and_next_run() {
    let (scheduler, clock) = new_scheduler().await;
    let id = scheduler
        .create_task("nightly", true, "* * * * *", TaskConfig::Maintenance, 30)
        .await
        .expect("create succeeds");

    let now = ms_to_datetime(clock.epoch_ms() as i64);
    assert!(scheduler.next_run(&id, now).is_some());
}

#[tokio::test]
async fn update_task_resets_next_run_and_rejects_bad_cron() {
    let (scheduler, _clock) = new_scheduler().await;
    let id = scheduler
        .create_task("nightly", true, "0 3 * * *", TaskConfig::Maintenance, 30)
        .await
        .expect("create succeeds");

    let err = scheduler
        .update_task(&id, "nightly", true, "garbage", TaskConfig::Maintenance, 30)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "config_invalid");

    scheduler
        .update_task(&id, "nightly", true, "*/5 * * * *", TaskConfig::Maintenance, 30)
        .await
        .expect("update succeeds");

    let task = scheduler.get_task(&id).await.expect("get").expect("task exists");
    assert_eq!(task.cron_expr, "*/5 * * * *");
    assert!(task.next_run_ms.is_none());
}

#[tokio::test]
async fn delete_task_removes_it_from_cache_and_storage() {
    let (scheduler, _clock) = new_scheduler().await;
    let id = scheduler
        .create_task("nightly", true, "* * * * *", TaskConfig::Maintenance, 30)
        .await
        .expect("create succeeds");

    scheduler.delete_task(&id).await.expect("delete succeeds");

    assert!(scheduler.get_task(&id).await.expect("get").is_none());
    let now = ms_to_datetime(0);
    assert!(scheduler.next_run(&id, now).is_none());
}

#[tokio::test]
async fn run_now_executes_immediately_and_records_success() {
    let (scheduler, _clock) = new_scheduler().await;
    let id = scheduler
        .create_task("nightly", true, "0 0 1 1 *", TaskConfig::Maintenance, 30)
        .await
        .expect("create succeeds");

    let exec_id = scheduler.run_now(&id).await.expect("run_now succeeds");

    // the execution is spawned onto a background task; give it a chance
    // to complete before asserting on its terminal state.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let execution = task_execution::get(&scheduler.inner.pool, &exec_id)
        .await
        .expect("fetch execution")
        .expect("execution row exists");
    assert_eq!(execution.status, "success");
    assert!(!scheduler.is_running(&id));
}

#[tokio::test]
async fn run_now_refuses_a_task_already_running() {
    let (scheduler, _clock) = new_scheduler().await;
    let id = scheduler
        .create_task("nightly", true, "0 0 1 1 *", TaskConfig::Maintenance, 30)
        .await
        .expect("create succeeds");

    scheduler.inner.running.lock().insert(id);
    let err = scheduler.run_now(&id).await.unwrap_err();
    assert_eq!(err.kind(), "precondition");
}

#[tokio::test]
async fn tick_fires_due_tasks_and_records_run_count() {
    let (scheduler, clock) = new_scheduler().await;
    let id = scheduler
        .create_task("every-minute", true, "* * * * *", TaskConfig::Maintenance, 30)
        .await
        .expect("create succeeds");

    Scheduler::tick(&scheduler.inner).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let task = scheduler.get_task(&id).await.expect("get").expect("task exists");
    assert_eq!(task.run_count, 1);
    assert_eq!(task.last_status.as_deref(), Some("success"));
    let _ = clock;
}

#[tokio::test]
async fn tick_skips_a_task_already_in_the_running_set() {
    let (scheduler, _clock) = new_scheduler().await;
    let id = scheduler
        .create_task("every-minute", true, "* * * * *", TaskConfig::Maintenance, 30)
        .await
        .expect("create succeeds");

    scheduler.inner.running.lock().insert(id);
    Scheduler::tick(&scheduler.inner).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let task = scheduler.get_task(&id).await.expect("get").expect("task exists");
    assert_eq!(task.run_count, 0);
}

#[tokio::test]
async fn manager_start_and_stop_are_idempotent_and_clean() {
    let (scheduler, _clock) = new_scheduler().await;
    scheduler.start().await.expect("start succeeds");
    assert!(scheduler.is_enabled());
    scheduler.stop().await.expect("stop succeeds");
}
