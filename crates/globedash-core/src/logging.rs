//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over the configured level. The TUI owns the terminal, so it
//! logs to `<home>/logs/globedash.log`; CLI subcommands log to stderr.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

/// Log file name inside the logs directory.
pub const LOG_FILE: &str = "globedash.log";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

/// Keeps the background writer alive; logs are flushed when dropped.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs the global tracing subscriber.
///
/// Calling this twice is harmless: the second install is ignored.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init(target: LogTarget<'_>, default_level: &str) -> Result<LogGuard> {
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter(default_level))
                .with_writer(io::stderr)
                .with_target(false)
                .try_init();
            Ok(LogGuard { _worker: None })
        }
        LogTarget::File(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = rolling::never(dir, LOG_FILE);
            let (writer, worker) = tracing_appender::non_blocking(appender);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter(default_level))
                .with_writer(writer)
                .with_ansi(false)
                .try_init();
            Ok(LogGuard {
                _worker: Some(worker),
            })
        }
    }
}
