// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal handle onto the `app_user` table.
//!
//! Full account management (creation, 2FA enrollment, session handling)
//! is out-of-scope ORM plumbing behind the HTTP layer. This module only
//! exposes what the CLI's `--reset-admin-password` flow needs: find a
//! user by name, check their role, and overwrite their password hash.

use sqlx::FromRow;

use crate::error::StorageError;
use crate::pool::DbPool;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AppUser {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

impl AppUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

pub async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<AppUser>, StorageError> {
    let row: Option<AppUser> = sqlx::query_as(
        "SELECT id, username, password_hash, role FROM app_user WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Overwrite a user's password hash in place. Does not touch `role` or
/// any other column.
pub async fn set_password_hash(
    pool: &DbPool,
    id: &str,
    password_hash: &str,
    now_ms: i64,
) -> Result<(), StorageError> {
    let affected = sqlx::query("UPDATE app_user SET password_hash = ?, updated_at_ms = ? WHERE id = ?")
        .bind(password_hash)
        .bind(now_ms)
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    if affected == 0 {
        return Err(StorageError::NotFound(format!("app_user {id}")));
    }
    Ok(())
}
