// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use swnas_core::OrchestrationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid task configuration: {0}")]
    InvalidConfig(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for OrchestrationError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Database(err) => Self::TransientIo(err.to_string()),
            StorageError::InvalidConfig(msg) => Self::ConfigInvalid(msg),
            StorageError::NotFound(msg) => Self::NotFound(msg),
        }
    }
}
