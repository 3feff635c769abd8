//! Configuration module for vault-sync.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides (applied by the caller)
//!
//! # Environment Variables
//!
//! `OBSIDIAN_VAULTS` sets `sync.root` directly. Every other setting can be
//! overridden with the `VAULT_SYNC_` prefix, using double underscores to
//! separate nested levels:
//! - `VAULT_SYNC_SYNC__MARKER_DIR=.vault` sets `sync.marker_dir`
//! - `VAULT_SYNC_SYNC__ON_ERROR=skip` sets `sync.on_error`
//! - `VAULT_SYNC_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::index::SelectionRules;
use crate::sync::FailurePolicy;

/// Environment variable holding the root directory to scan.
pub const ROOT_ENV_VAR: &str = "OBSIDIAN_VAULTS";

/// Prefix for all other environment overrides.
pub const ENV_PREFIX: &str = "VAULT_SYNC_";

/// Errors raised while resolving configuration. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No root directory configured; set OBSIDIAN_VAULTS or pass --root")]
    MissingRoot,

    #[error("Invalid root directory {path}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Synchronization settings
    #[serde(default)]
    pub sync: SyncConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SyncConfig {
    /// Root directory scanned for marker directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Name of the directory whose direct children are synchronized
    #[serde(default = "default_marker_dir")]
    pub marker_dir: String,

    /// File names inside marker directories that are never synchronized
    #[serde(default = "default_excluded_files")]
    pub excluded_files: Vec<String>,

    /// What a propagation cycle does when a read or write fails
    #[serde(default)]
    pub on_error: FailurePolicy,

    /// Delay before pausing peers, lets a truncate-then-write finish
    #[serde(default)]
    pub settle_ms: u64,
}

/// Logging levels, global and per module.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for every target (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module overrides, e.g. `vault_sync::sync = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_marker_dir() -> String {
    ".obsidian".to_string()
}
fn default_excluded_files() -> Vec<String> {
    vec!["workspace.json".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            sync: SyncConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            root: None,
            marker_dir: default_marker_dir(),
            excluded_files: default_excluded_files(),
            on_error: FailurePolicy::default(),
            settle_ms: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources.
    ///
    /// Uses `config_path` when given, otherwise the per-user settings file if
    /// one exists. A missing file simply contributes nothing.
    pub fn load(config_path: Option<&Path>) -> Result<Self, Box<figment::Error>> {
        match config_path {
            Some(path) => Self::load_from(path),
            None => match Self::default_config_path() {
                Some(path) => Self::load_from(path),
                None => Self::figment_without_file().extract().map_err(Box::new),
            },
        }
    }

    /// Load configuration from a specific file, then layer the environment on top.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Self::prefixed_env());
        Self::with_root_env(figment).extract().map_err(Box::new)
    }

    fn figment_without_file() -> Figment {
        let figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Self::prefixed_env());
        Self::with_root_env(figment)
    }

    /// `VAULT_SYNC_` variables; double underscore becomes a nesting dot,
    /// single underscores stay inside field names.
    fn prefixed_env() -> Env {
        Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().replace("__", ".").into())
    }

    /// Layer the bare `OBSIDIAN_VAULTS` variable onto `sync.root`.
    ///
    /// The value is always a path string; a root named `2024` or `true` is
    /// not parsed as a number or boolean. An empty value is ignored.
    fn with_root_env(figment: Figment) -> Figment {
        match std::env::var_os(ROOT_ENV_VAR).filter(|value| !value.is_empty()) {
            Some(root) => figment.merge(Serialized::default("sync.root", PathBuf::from(root))),
            None => figment,
        }
    }

    /// Per-user settings file: `<config dir>/vault-sync/settings.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vault-sync").join("settings.toml"))
    }

    /// Resolve and validate the root directory.
    ///
    /// The returned path is canonical, so every indexed path derived from it
    /// is absolute and matches the paths notify reports.
    pub fn vault_root(&self) -> Result<PathBuf, ConfigError> {
        let root = match &self.sync.root {
            Some(root) if !root.as_os_str().is_empty() => root,
            _ => return Err(ConfigError::MissingRoot),
        };

        let canonical = root.canonicalize().map_err(|e| ConfigError::InvalidRoot {
            path: root.clone(),
            reason: e.to_string(),
        })?;

        if !canonical.is_dir() {
            return Err(ConfigError::InvalidRoot {
                path: root.clone(),
                reason: "not a directory".to_string(),
            });
        }

        Ok(canonical)
    }

    /// Selection rules for the indexer.
    pub fn selection_rules(&self) -> SelectionRules {
        SelectionRules::new(
            self.sync.marker_dir.clone(),
            self.sync.excluded_files.iter().cloned(),
        )
    }
}
