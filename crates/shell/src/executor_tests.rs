// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use crate::{discover_command, Executor};

#[tokio::test]
async fn execute_true_succeeds() {
    let exec = Executor::new();
    let result = exec.execute("true", &[]).await.unwrap();
    assert!(result.success);
    assert_eq!(result.exit_code, 0);
    assert!(!result.dry_run);
}

#[tokio::test]
async fn execute_false_does_not_raise() {
    let exec = Executor::new();
    let result = exec.execute("false", &[]).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.exit_code, 1);
}

#[tokio::test]
async fn execute_captures_stdout() {
    let exec = Executor::new();
    let result = exec
        .execute("echo", &["hello".to_string()])
        .await
        .unwrap();
    assert_eq!(result.stdout.trim(), "hello");
}

#[tokio::test]
async fn unknown_command_is_not_found() {
    let exec = Executor::new();
    let err = exec
        .execute("definitely-not-a-real-binary-xyz", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, crate::ExecError::CommandNotFound(_)));
}

#[tokio::test]
async fn timeout_is_distinct_from_failure() {
    let exec = Executor::new();
    let err = exec
        .execute_with_timeout(Duration::from_millis(50), "sleep", &["2".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, crate::ExecError::Timeout { .. }));
}

// Invariant 6 from the design's testable properties: with dry_run=true, no
// subprocess is spawned for any number of `execute` calls, and every
// returned result has dry_run=true, success=true.
#[tokio::test]
async fn dry_run_never_spawns_and_always_succeeds() {
    let exec = Executor::new();
    exec.set_dry_run(true);
    assert!(exec.is_dry_run());

    for _ in 0..5 {
        let result = exec
            .execute("definitely-not-a-real-binary-xyz", &["--flag".to_string()])
            .await
            .unwrap();
        assert!(result.dry_run);
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.is_empty());
    }
}

#[tokio::test]
async fn dry_run_toggle_round_trips() {
    let exec = Executor::new();
    assert!(!exec.is_dry_run());
    exec.set_dry_run(true);
    assert!(exec.is_dry_run());
    exec.set_dry_run(false);
    assert!(!exec.is_dry_run());
}

#[test]
fn command_exists_finds_common_binary() {
    assert!(crate::command_exists("sh"));
}

#[test]
fn command_exists_rejects_bogus_name() {
    assert!(!crate::command_exists("definitely-not-a-real-binary-xyz"));
}

#[test]
fn discover_command_returns_absolute_path_unchanged() {
    let resolved = discover_command("/usr/bin/env");
    assert_eq!(resolved, std::path::Path::new("/usr/bin/env"));
}

#[test]
fn discover_command_falls_back_to_name_on_full_miss() {
    let resolved = discover_command("definitely-not-a-real-binary-xyz");
    assert_eq!(
        resolved,
        std::path::Path::new("definitely-not-a-real-binary-xyz")
    );
}
