// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! YAML application configuration.
//!
//! Loaded once at startup from the path named by `STUMPFWORKS_CONFIG`
//! (default `./config.yaml`). A missing file is not an error: every
//! section has a `Default` impl, so the whole `Config` falls back to sane
//! defaults. A malformed file *is* an error (`config_invalid`) — startup
//! is fatal in that case per the error handling design.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::OrchestrationError;

/// Environment variable naming the config file path.
pub const CONFIG_ENV_VAR: &str = "STUMPFWORKS_CONFIG";

/// Default config file path when `STUMPFWORKS_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub app: AppConfig,
    pub dependencies: DependenciesConfig,
}

impl Config {
    /// Resolve the config path from `STUMPFWORKS_CONFIG`, falling back to
    /// [`DEFAULT_CONFIG_PATH`].
    pub fn path_from_env() -> PathBuf {
        std::env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration for the given path. A missing file yields
    /// `Config::default()`; a file that fails to parse is `config_invalid`.
    pub fn load(path: &Path) -> Result<Self, OrchestrationError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_yaml::from_str(&contents)
                .map_err(|e| OrchestrationError::ConfigInvalid(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(OrchestrationError::PersistentIo(format!("{}: {e}", path.display()))),
        }
    }

    /// Load configuration from the path named by `STUMPFWORKS_CONFIG`.
    pub fn load_from_env() -> Result<Self, OrchestrationError> {
        Self::load(&Self::path_from_env())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8443,
            read_timeout_secs: 30,
            write_timeout_secs: 30,
            idle_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub driver: String,
    pub dsn: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: "sqlite".to_string(),
            dsn: "/var/lib/stumpfworks-nas/stumpfworks.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "text".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub environment: String,
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { environment: "production".to_string(), version: env!("CARGO_PKG_VERSION").to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstallMode {
    #[default]
    Check,
    Auto,
    Interactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DependenciesConfig {
    pub check_on_startup: bool,
    pub install_mode: InstallMode,
}

impl Default for DependenciesConfig {
    fn default() -> Self {
        Self { check_on_startup: true, install_mode: InstallMode::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nonexistent.yaml");
        let config = Config::load(&path).expect("missing file is not an error");
        assert_eq!(config.server.port, 8443);
        assert_eq!(config.database.driver, "sqlite");
    }

    #[test]
    fn malformed_file_is_config_invalid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server: [this is not a mapping").expect("write");
        let err = Config::load(&path).expect_err("malformed yaml should fail");
        assert_eq!(err.kind(), "config_invalid");
    }

    #[test]
    fn partial_file_fills_defaults_for_missing_sections() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server:\n  port: 9000\n").expect("write");
        let config = Config::load(&path).expect("valid partial config");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }
}
