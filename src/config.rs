use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE: &str = "employee_tracker.json";
pub const DATABASE_ENV: &str = "EMPLOYEE_TRACKER_DB";
pub const DEFAULT_DATABASE: &str = "employee_tracker.db";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: PathBuf::from(DEFAULT_DATABASE),
        }
    }
}

impl Config {
    /// Load configuration from the JSON file at `path`, or `employee_tracker.json` in the
    /// working directory when `path` is `None`.  A missing file falls back to defaults.  The
    /// `EMPLOYEE_TRACKER_DB` environment variable overrides the database path either way.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(CONFIG_FILE));
        Ok(Self::from_file(path)?.apply_override(env::var_os(DATABASE_ENV)))
    }

    /// Replace the database path with an `EMPLOYEE_TRACKER_DB` value.  Unset or empty keeps
    /// the current path.
    pub fn apply_override(mut self, value: Option<OsString>) -> Self {
        if let Some(database) = value {
            if !database.is_empty() {
                self.database = PathBuf::from(database);
            }
        }
        self
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
