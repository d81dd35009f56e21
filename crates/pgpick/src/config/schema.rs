//! Configuration schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where connection profiles come from
    pub source: SourceConfig,
    /// Database client launched for the chosen connection
    pub client: ClientConfig,
    /// Log file settings
    pub log: LogConfig,
}

/// Credentials file settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Credentials file path (default: ~/.pgpass)
    pub path: Option<PathBuf>,
}

/// Client command settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Program to run, split with shell quoting rules
    pub command: String,
    /// Extra arguments placed before the connection flags
    pub args: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            command: "psql".to_string(),
            args: Vec::new(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum level: off, error, warn, info, debug or trace
    pub level: String,
    /// Directory for the log files (default: the system temp dir)
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
