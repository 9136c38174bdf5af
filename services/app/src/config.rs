//! services/app/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which `KeyValueStore` adapter backs the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKind {
    File,
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub log_level: Level,
    pub storage: StorageKind,
    pub data_dir: PathBuf,
    pub toast_duration: Duration,
    pub session_key: String,
    pub tickets_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            storage: StorageKind::File,
            data_dir: PathBuf::from("./.ticketflow"),
            toast_duration: Duration::from_millis(3000),
            session_key: "ticketapp_session".to_string(),
            tickets_key: "tickets".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = match lookup("RUST_LOG") {
            Some(raw) => raw.parse::<Level>().map_err(|_| {
                ConfigError::InvalidValue(
                    "RUST_LOG".to_string(),
                    format!("'{}' is not a valid log level", raw),
                )
            })?,
            None => defaults.log_level,
        };

        let storage = match lookup("STORAGE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("file") => StorageKind::File,
            Some("memory") => StorageKind::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "STORAGE".to_string(),
                    format!("'{}' is not one of: file, memory", other),
                ))
            }
        };

        let data_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let toast_duration = match lookup("TOAST_DURATION_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ConfigError::InvalidValue("TOAST_DURATION_MS".to_string(), e.to_string()))?,
            None => defaults.toast_duration,
        };

        let session_key = non_empty(&lookup, "SESSION_KEY")?.unwrap_or(defaults.session_key);
        let tickets_key = non_empty(&lookup, "TICKETS_KEY")?.unwrap_or(defaults.tickets_key);

        Ok(Self {
            log_level,
            storage,
            data_dir,
            toast_duration,
            session_key,
            tickets_key,
        })
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidValue(
            name.to_string(),
            "must not be empty".to_string(),
        )),
        other => Ok(other),
    }
}
