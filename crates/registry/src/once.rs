// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ManagerCell`: the first-wins, exactly-once construction primitive
//! backing every manager slot.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::OnceCell;

/// Wraps a `tokio::sync::OnceCell<Arc<M>>` so a manager is constructed at
/// most once even when multiple callers race to initialize it
/// concurrently. `OnceCell::get_or_init` guarantees the constructor
/// future runs exactly once; every other concurrent caller awaits that
/// same in-flight future and receives the identical `Arc`.
pub struct ManagerCell<M> {
    cell: OnceCell<Arc<M>>,
}

impl<M> ManagerCell<M> {
    pub fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    /// Returns the existing instance, or runs `ctor` to build one. Only
    /// the first caller's `ctor` future actually executes; concurrent
    /// callers block on it and all receive the same `Arc`.
    pub async fn get_or_init<F, Fut>(&self, ctor: F) -> Arc<M>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Arc<M>>,
    {
        self.cell.get_or_init(ctor).await.clone()
    }

    pub fn get(&self) -> Option<Arc<M>> {
        self.cell.get().cloned()
    }
}

impl<M> Default for ManagerCell<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_init_constructs_exactly_once() {
        let cell: Arc<ManagerCell<AtomicUsize>> = Arc::new(ManagerCell::new());
        let construct_count = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cell = cell.clone();
            let counter = construct_count.clone();
            handles.push(tokio::spawn(async move {
                cell.get_or_init(|| async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    Arc::new(AtomicUsize::new(42))
                })
                .await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for h in handles {
            results.push(h.await.expect("task join"));
        }

        assert_eq!(construct_count.load(Ordering::SeqCst), 1, "constructor must run exactly once");
        for r in &results {
            assert_eq!(r.load(Ordering::SeqCst), 42);
        }
        // every returned Arc points at the same allocation
        let ptr0 = Arc::as_ptr(&results[0]);
        assert!(results.iter().all(|r| Arc::as_ptr(r) == ptr0));
    }
}
