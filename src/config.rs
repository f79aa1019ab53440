//! Application configuration.
//!
//! Settings live in `<config_dir>/interval-timer/config.json`. Every field is
//! optional in the file; anything missing takes its default, and a missing
//! file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timer::{DEFAULT_ALERT_TIME, DEFAULT_TICK_INTERVAL};

/// Directory name used under the platform config and data directories.
pub const APP_DIR_NAME: &str = "interval-timer";

const CONFIG_FILE_NAME: &str = "config.json";

/// Allowed tick interval range in milliseconds.
pub const TICK_INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 50..=1000;

/// Allowed default alert time range in seconds.
pub const ALERT_TIME_RANGE: std::ops::RangeInclusive<u32> = 1..=60;

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL.as_millis() as u64
}

fn default_alert_time() -> u32 {
    DEFAULT_ALERT_TIME
}

fn default_bell() -> bool {
    true
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// No data directory was configured and the platform has none.
    #[error("could not determine a data directory; pass --data-dir")]
    NoDataDirectory,
}

/// Interval timer configuration.
///
/// # Example
///
/// ```
/// use interval_timer::config::AppConfig;
///
/// let config = AppConfig::default();
/// assert_eq!(config.tick_interval_ms, 250);
/// assert_eq!(config.default_alert_time, 3);
/// assert!(config.bell);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Where plans are stored. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Period between timer ticks in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Alert time applied to plans created from the command line.
    #[serde(default = "default_alert_time")]
    pub default_alert_time: u32,

    /// Whether to ring the terminal bell on cues.
    #[serde(default = "default_bell")]
    pub bell: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            tick_interval_ms: default_tick_interval_ms(),
            default_alert_time: default_alert_time(),
            bell: default_bell(),
        }
    }
}

impl AppConfig {
    /// Platform location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads the config from `path`, or from [`Self::default_path`].
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is not valid
    /// JSON, or holds out-of-range values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        Self::load_from(&path)
    }

    /// Loads the config file at `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Checks every field, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();
        if !TICK_INTERVAL_RANGE.contains(&self.tick_interval_ms) {
            problems.push(format!(
                "tick_interval_ms must be between {} and {}",
                TICK_INTERVAL_RANGE.start(),
                TICK_INTERVAL_RANGE.end()
            ));
        }
        if !ALERT_TIME_RANGE.contains(&self.default_alert_time) {
            problems.push(format!(
                "default_alert_time must be between {} and {}",
                ALERT_TIME_RANGE.start(),
                ALERT_TIME_RANGE.end()
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// Resolves where plans are stored.
    ///
    /// `override_dir` (the `--data-dir` flag) wins over the config file,
    /// which wins over the platform data directory.
    pub fn resolve_data_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(ConfigError::NoDataDirectory)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
