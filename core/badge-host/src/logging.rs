//! Logging setup.
//!
//! Stdout is the message channel, so logs go to a daily rolling file under
//! `~/.status-badge/logs/` (or stderr when no home directory exists, which the
//! browser forwards to its own log).

use std::env;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEBUG_ENV: &str = "STATUS_BADGE_DEBUG_LOG";
const LOG_FILE_PREFIX: &str = "host.log";

/// Installs the global subscriber. Keep the returned guard alive for the whole
/// run or buffered lines are lost on exit.
pub fn init() -> Option<WorkerGuard> {
    let filter = env_filter();

    match log_dir() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    }
}

fn env_filter() -> EnvFilter {
    let debug_enabled = env::var(DEBUG_ENV)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn log_dir() -> Option<PathBuf> {
    let dir = dirs::home_dir()?.join(".status-badge").join("logs");
    fs_err::create_dir_all(&dir).ok()?;
    Some(dir)
}
