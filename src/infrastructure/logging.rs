//! Structured file logging
//!
//! Logs go to a daily-rotated file under `$XDG_STATE_HOME/voice-memo`
//! (or `~/.local/state/voice-memo`) so they never mix with the
//! interactive terminal output. `RUST_LOG` overrides the default `info`
//! level.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use tracing_appender::rolling;
use tracing_subscriber::prelude::*;

const LOG_FILE_NAME: &str = "voice-memo.log";

/// Number of rotated log files kept on startup
const MAX_LOG_FILES: usize = 7;

/// Keeps the non-blocking writer alive for the program lifetime
static APPENDER_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Logging setup errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Logging already initialized")]
    AlreadyInitialized,
}

/// Install the global file logger.
///
/// Returns the directory the log files are written to.
pub fn init_logging() -> Result<PathBuf, LoggingError> {
    let log_dir = log_dir()?;

    if let Err(e) = cleanup_old_logs(&log_dir) {
        eprintln!("Warning: Failed to clean up old logs: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    APPENDER_GUARD
        .set(guard)
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::debug!(dir = %log_dir.display(), "Logging initialized");
    Ok(log_dir)
}

/// Resolve and create the log directory
fn log_dir() -> Result<PathBuf, LoggingError> {
    let log_dir = match std::env::var_os("XDG_STATE_HOME") {
        Some(state) if !state.is_empty() => PathBuf::from(state).join("voice-memo"),
        _ => dirs::home_dir()
            .ok_or(LoggingError::NoHomeDir)?
            .join(".local/state/voice-memo"),
    };

    fs::create_dir_all(&log_dir).map_err(|source| LoggingError::CreateDir {
        path: log_dir.display().to_string(),
        source,
    })?;

    Ok(log_dir)
}

/// Remove rotated log files beyond the newest `MAX_LOG_FILES`
fn cleanup_old_logs(log_dir: &Path) -> std::io::Result<usize> {
    let prefix = format!("{}.", LOG_FILE_NAME);

    let mut log_files: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let file_name = path.file_name()?.to_string_lossy().to_string();

            // Rotated files are named voice-memo.log.YYYY-MM-DD
            let date = file_name.strip_prefix(&prefix)?;
            if date.matches('-').count() != 2 {
                return None;
            }
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((path, modified))
        })
        .collect();

    // Newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in log_files.iter().skip(MAX_LOG_FILES) {
        match fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!("Warning: Failed to delete old log file {}: {}", path.display(), e),
        }
    }

    Ok(removed)
}
