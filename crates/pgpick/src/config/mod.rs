//! Configuration module for pgpick.
//!
//! Handles loading configuration from:
//! - Default values
//! - Config file (~/.config/pgpick/config.toml)

mod schema;

pub use schema::{ClientConfig, Config, LogConfig, SourceConfig};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::pgpass::default_pgpass_path;

/// Returns the config directory path (~/.config/pgpick on Linux).
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pgpick"))
}

/// Returns the default config file path (~/.config/pgpick/config.toml)
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Load configuration from the default path or return defaults
pub fn load_config() -> Result<Config> {
    if let Some(path) = config_path() {
        if path.exists() {
            return load_config_from(&path);
        }
    }
    Ok(Config::default())
}

/// Load configuration from a specific path
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

impl Config {
    /// The credentials file to read: the configured path, else ~/.pgpass.
    pub fn pgpass_path(&self) -> Option<PathBuf> {
        self.source.path.clone().or_else(default_pgpass_path)
    }

    /// Directory the log files go to.
    pub fn log_dir(&self) -> PathBuf {
        self.log
            .directory
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
