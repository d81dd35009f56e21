//! File logging.
//!
//! The picker owns the terminal, so log lines go to a daily-rotated file
//! instead of stdout/stderr.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;

use crate::config::LogConfig;

/// Log files are named `pgpick.<date>.log`.
pub const LOG_FILE_PREFIX: &str = "pgpick";

/// Rotated files kept on disk.
const MAX_LOG_FILES: usize = 3;

/// Parse a level name from the config file.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| anyhow!("Unknown log level: {}", level))
}

/// Install the global subscriber writing into `dir`.
///
/// The returned guard flushes pending lines when dropped; keep it alive for
/// as long as logging is wanted.
pub fn init_logging(cfg: &LogConfig, dir: &Path) -> Result<WorkerGuard> {
    let level = parse_level(&cfg.level)?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .with_context(|| format!("Failed to open log file in {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(guard)
}
