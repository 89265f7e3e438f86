// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `--reset-admin-password <username>`: initialize the database, locate
//! the user, verify the admin role, generate a fresh random password,
//! store its hash, and print the plaintext exactly once.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;
use swnas_storage::user::{find_by_username, set_password_hash};
use swnas_storage::DbPool;
use thiserror::Error;

/// Length, in characters, of the generated plaintext password.
const PASSWORD_LEN: usize = 16;

/// URL-safe alphabet the generated password is drawn from (no padding
/// characters, nothing that needs escaping in a URL or a terminal).
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

#[derive(Debug, Error)]
pub enum AdminResetError {
    #[error("user {0:?} not found")]
    UserNotFound(String),
    #[error("user {0:?} is not an admin")]
    NotAdmin(String),
    #[error("database error: {0}")]
    Storage(#[from] swnas_storage::StorageError),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Generate a 16-character URL-safe password from cryptographically
/// random bytes.
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    (0..PASSWORD_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

/// Run the full reset flow against an already-migrated pool. Returns the
/// generated plaintext password on success so the caller can print it
/// exactly once; never logs or returns it via any other channel.
pub async fn reset_admin_password(pool: &DbPool, username: &str, now_ms: i64) -> Result<String, AdminResetError> {
    let user = find_by_username(pool, username)
        .await?
        .ok_or_else(|| AdminResetError::UserNotFound(username.to_string()))?;

    if !user.is_admin() {
        return Err(AdminResetError::NotAdmin(username.to_string()));
    }

    let password = generate_password();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AdminResetError::Hash(e.to_string()))?
        .to_string();

    set_password_hash(pool, &user.id, &hash, now_ms).await?;

    Ok(password)
}
