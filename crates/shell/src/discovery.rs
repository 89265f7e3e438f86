// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command discovery: locate an executable by name via `PATH`, falling
//! back to a fixed ordered list of admin directories.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Fallback directories probed, in order, when a command is not found on
/// `PATH`. Mirrors the layout of a typical Linux system where
/// administrative tools live outside a non-root user's `PATH`.
pub const ADMIN_DIRS: &[&str] = &[
    "/usr/sbin",
    "/sbin",
    "/usr/bin",
    "/bin",
    "/usr/local/sbin",
    "/usr/local/bin",
];

fn has_any_execute_bit(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

fn search_path_env(cmd: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        let candidate = dir.join(cmd);
        (candidate.is_file() && has_any_execute_bit(&candidate)).then_some(candidate)
    })
}

fn search_admin_dirs(cmd: &str) -> Option<PathBuf> {
    ADMIN_DIRS.iter().find_map(|dir| {
        let candidate = Path::new(dir).join(cmd);
        (candidate.is_file() && has_any_execute_bit(&candidate)).then_some(candidate)
    })
}

/// Resolve `cmd` to an absolute path, first via `PATH`, then via
/// [`ADMIN_DIRS`]. If `cmd` is already an absolute or relative path
/// (contains a `/`), it is returned unchanged without any lookup.
///
/// On a full miss, the original name is returned so the subsequent spawn
/// fails with a clear "not found" from the OS rather than a discovery
/// error that hides the attempted name.
pub fn discover_command(cmd: &str) -> PathBuf {
    if cmd.contains('/') {
        return PathBuf::from(cmd);
    }
    search_path_env(cmd)
        .or_else(|| search_admin_dirs(cmd))
        .unwrap_or_else(|| PathBuf::from(cmd))
}

/// True iff discovery locates an executable file for `cmd`.
pub fn command_exists(cmd: &str) -> bool {
    if cmd.contains('/') {
        return Path::new(cmd).is_file() && has_any_execute_bit(Path::new(cmd));
    }
    search_path_env(cmd).is_some() || search_admin_dirs(cmd).is_some()
}
