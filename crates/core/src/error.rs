// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error taxonomy.
//!
//! Every crate in the workspace returns (or converts into) this enum at its
//! public boundary, mirroring the seven error kinds from the orchestration
//! design: config_invalid, not_available, timeout, transient_io,
//! persistent_io, precondition, not_found. Crate-local error enums (e.g.
//! the shell executor's `ExecError`, the scheduler's `CronParseError`)
//! still exist for precise `match`-ing close to the failure site, but they
//! all implement `From<_> for OrchestrationError` so callers at a module
//! boundary can collapse to one type when they don't need the detail.

use std::fmt;

use thiserror::Error;

/// The shared error taxonomy described in the design's error handling section.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// YAML parse, cron parse, or an enum value outside its allowed set.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// An optional external tool or service is missing; the owning manager
    /// should have already flipped itself to disabled.
    #[error("feature disabled: {0}")]
    NotAvailable(String),

    /// An operation exceeded its deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// SMTP/HTTP/network/DB connection failure; safe to retry at the
    /// caller's discretion.
    #[error("transient I/O error: {0}")]
    TransientIo(String),

    /// File permissions, out-of-space, or corrupt on-disk config.
    #[error("persistent I/O error: {0}")]
    PersistentIo(String),

    /// A precondition the caller should have checked was violated (e.g.
    /// resetting a non-admin's password, a duplicate share name).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl OrchestrationError {
    /// Stable machine-readable kind tag, useful for log fields and tests
    /// that assert on error category rather than message text.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigInvalid(_) => "config_invalid",
            Self::NotAvailable(_) => "not_available",
            Self::Timeout(_) => "timeout",
            Self::TransientIo(_) => "transient_io",
            Self::PersistentIo(_) => "persistent_io",
            Self::Precondition(_) => "precondition",
            Self::NotFound(_) => "not_found",
        }
    }
}

impl From<std::io::Error> for OrchestrationError {
    fn from(e: std::io::Error) -> Self {
        use std::io::ErrorKind::*;
        match e.kind() {
            NotFound => Self::NotFound(e.to_string()),
            PermissionDenied | OutOfMemory => Self::PersistentIo(e.to_string()),
            TimedOut => Self::Timeout(std::time::Duration::from_secs(0)),
            _ => Self::TransientIo(e.to_string()),
        }
    }
}

/// A status returned by manager/component initialization, per the
/// non-fatal-by-default rule: managers report availability rather than
/// bubbling a raw error up through startup.
#[derive(Debug, Clone)]
pub enum Availability {
    Available,
    Unavailable(String),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Unavailable(reason) => write!(f, "unavailable: {reason}"),
        }
    }
}
