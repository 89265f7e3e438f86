// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Foundation-class [`Manager`] wrapping the database pool.
//!
//! The pool itself is opened and migrated eagerly in [`crate::boot`],
//! before the registry exists, since every other manager needs a handle
//! to it. This wrapper exists so the database's health still shows up in
//! the registry's dependency-ordered startup and shutdown like every
//! other subsystem, and so a lost connection is fatal the way the
//! foundation class demands.

use async_trait::async_trait;
use swnas_core::OrchestrationError;
use swnas_registry::Manager;
use swnas_storage::DbPool;

pub struct DatabaseManager {
    pool: DbPool,
}

impl DatabaseManager {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Manager for DatabaseManager {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn start(&self) -> Result<(), OrchestrationError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| OrchestrationError::PersistentIo(format!("database ping failed: {e}")))?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), OrchestrationError> {
        self.pool.close().await;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        !self.pool.is_closed()
    }
}
