//! Runtime configuration resolved from the environment.
//!
//! # Variables
//! - `BREWERY_DB_PATH`: catalog database file, default `<tmp>/brewery.sqlite3`.
//! - `BREWERY_LOG_LEVEL`: `trace|debug|info|warn|error`, default per build mode.
//! - `BREWERY_LOG_DIR`: absolute directory for rolling logs; unset disables
//!   file logging.

use crate::logging::{default_log_level, init_logging, normalize_level, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "BREWERY_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "BREWERY_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "BREWERY_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "brewery.sqlite3";

/// Rejected configuration value.
#[derive(Debug)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
    Logging(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(level) => {
                write!(f, "{LOG_LEVEL_ENV} has unsupported value `{level}`")
            }
            Self::RelativeLogDir(dir) => {
                write!(f, "{LOG_DIR_ENV} must be absolute, got `{}`", dir.display())
            }
            Self::Logging(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreweryConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl Default for BreweryConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl BreweryConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level =
                normalize_level(&level).map_err(|_| ConfigError::InvalidLogLevel(level))?;
        }
        if let Some(dir) = read(LOG_DIR_ENV) {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir));
            }
            config.log_dir = Some(dir);
        }
        Ok(config)
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns whether logging is active after the call.
    pub fn init_logging(&self) -> Result<bool, ConfigError> {
        match self.log_dir.as_deref() {
            Some(dir) => {
                init_logging(self.log_level, dir)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
