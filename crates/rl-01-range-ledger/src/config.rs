//! Ledger configuration from environment variables or a TOML file.

use crate::domain::DEFAULT_MAX_TAG_LEN;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Longest accepted tag, in bytes
    pub max_tag_len: usize,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Where `LedgerService::persist` writes snapshots, if anywhere
    pub snapshot_path: Option<PathBuf>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_tag_len: DEFAULT_MAX_TAG_LEN,
            log_level: "info".to_string(),
            json_logs: false,
            snapshot_path: None,
        }
    }
}

/// Errors that can occur during config loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    ledger: LedgerSection,
    #[serde(default)]
    logging: LoggingSection,
    #[serde(default)]
    snapshot: SnapshotSection,
}

#[derive(Debug, Default, Deserialize)]
struct LedgerSection {
    max_tag_len: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct SnapshotSection {
    path: Option<PathBuf>,
}

impl LedgerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RL_MAX_TAG_LEN`: Maximum tag length in bytes (default: 32)
    /// - `RL_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `RL_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `RL_SNAPSHOT_PATH`: Snapshot file (default: none)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_tag_len: var("RL_MAX_TAG_LEN")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tag_len),

            log_level: var("RL_LOG_LEVEL")
                .or_else(|| var("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: var("RL_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.json_logs),

            snapshot_path: var("RL_SNAPSHOT_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [ledger]
    /// max_tag_len = 32
    ///
    /// [logging]
    /// level = "debug"
    /// json = false
    ///
    /// [snapshot]
    /// path = "/var/lib/range-ledger/ledger.snap"
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let defaults = Self::default();

        let config = Self {
            max_tag_len: file.ledger.max_tag_len.unwrap_or(defaults.max_tag_len),
            log_level: file.logging.level.unwrap_or(defaults.log_level),
            json_logs: file.logging.json.unwrap_or(defaults.json_logs),
            snapshot_path: file.snapshot.path,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("empty log level".to_string()));
        }
        Ok(())
    }
}
