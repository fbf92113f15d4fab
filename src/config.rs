/// Service configuration loader - parses surfsup.toml
///
/// Every section and key is optional; anything missing falls back to the
/// defaults below. Command-line flags are applied on top in `main`.
///
/// ```toml
/// [server]
/// bind = "0.0.0.0"
/// port = 5000
/// workers = 4
///
/// [database]
/// schema = "public"
///
/// [query]
/// window_days = 365
/// anchor = { fixed = "2017-08-23" }   # or anchor = "latest"
/// ```

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::anchor::{AnchorStrategy, TrailingWindow, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "surfsup.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {0}")]
    Read(PathBuf, #[source] io::Error),

    #[error("Failed to parse {0}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Invalid schema name '{0}': only ASCII letters, digits and '_' are allowed")]
    InvalidSchema(String),

    #[error("Worker count must be at least 1")]
    NoWorkers,

    #[error("Window length must be at least 1 day")]
    EmptyWindow,

    #[error("Window length of {days} days exceeds the maximum of {max}")]
    WindowTooLong { days: u32, max: u32 },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub query: QueryConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Requests handled concurrently.
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
            workers: 4,
        }
    }
}

/// Where the dataset lives. The connection string itself comes from
/// `DATABASE_URL`, not from this file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Schema holding the `measurement` and `station` tables.
    pub schema: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { schema: "public".to_string() }
    }
}

/// Trailing-window settings for the precipitation and tobs routes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub window_days: u32,
    pub anchor: AnchorStrategy,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            anchor: AnchorStrategy::default(),
        }
    }
}

impl QueryConfig {
    pub fn window(&self) -> TrailingWindow {
        TrailingWindow {
            anchor: self.anchor,
            days: self.window_days,
        }
    }
}

impl ServiceConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: ServiceConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(origin.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`.
    ///
    /// With `explicit == false` a missing file is not an error and yields
    /// the defaults; a file named on the command line must exist.
    pub fn load(path: &Path, explicit: bool) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents, path),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !explicit => Ok(Self::default()),
            Err(e) => Err(ConfigError::Read(path.to_path_buf(), e)),
        }
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_plain_identifier(&self.database.schema) {
            return Err(ConfigError::InvalidSchema(self.database.schema.clone()));
        }
        if self.server.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.query.window_days == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if self.query.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::WindowTooLong {
                days: self.query.window_days,
                max: MAX_WINDOW_DAYS,
            });
        }
        Ok(())
    }
}

/// The schema name is interpolated into SQL, so it is restricted to
/// `[A-Za-z0-9_]+`.
pub fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
