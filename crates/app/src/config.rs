//! Runtime configuration, read from environment variables.
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `POCKETLEDGER_STORAGE` | `file`, `memory` | `file` |
//! | `POCKETLEDGER_DATA_DIR` | directory | `{data_dir}/pocketledger` |
//! | `POCKETLEDGER_DEFAULT_THEME` | `light`, `dark` | `light` |
//! | `RUST_LOG` | tracing filter | `info` |

use std::path::PathBuf;

use thiserror::Error;

use crate::theme::Theme;

pub const STORAGE_ENV: &str = "POCKETLEDGER_STORAGE";
pub const DATA_DIR_ENV: &str = "POCKETLEDGER_DATA_DIR";
pub const DEFAULT_THEME_ENV: &str = "POCKETLEDGER_DEFAULT_THEME";
pub const LOG_FILTER_ENV: &str = "RUST_LOG";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },

    #[error("failed to resolve a data directory; set POCKETLEDGER_DATA_DIR")]
    NoDataDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// JSON file in the data directory.
    #[default]
    File,
    /// Process memory only; nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub data_dir: PathBuf,
    pub default_theme: Theme,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup(STORAGE_ENV).as_deref() {
            None | Some("file") => StorageBackend::File,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: STORAGE_ENV,
                    value: other.to_string(),
                });
            }
        };

        let data_dir = match lookup(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let default_theme = match lookup(DEFAULT_THEME_ENV) {
            None => Theme::default(),
            Some(value) => Theme::parse(&value).ok_or(ConfigError::InvalidValue {
                var: DEFAULT_THEME_ENV,
                value,
            })?,
        };

        let log_filter = lookup(LOG_FILTER_ENV).unwrap_or_else(|| {
            pocketledger_observability::tracing::DEFAULT_FILTER.to_string()
        });

        Ok(Self {
            storage,
            data_dir,
            default_theme,
            log_filter,
        })
    }

    /// Install the process-wide subscriber with this config's filter.
    pub fn init_logging(&self) {
        pocketledger_observability::init_with_filter(&self.log_filter);
    }
}

/// `{app_data_dir}/pocketledger`, falling back to `~/.local/share/pocketledger`.
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or(ConfigError::NoDataDir)?;

    dir.push("pocketledger");
    Ok(dir)
}
