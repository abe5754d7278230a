//! Logging init: file under XDG state dir, or graceful fallback to stderr.
//!
//! Filter directives come from `TUBEFETCH_LOG`, then `RUST_LOG`, then
//! [`DEFAULT_FILTER`].

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Env var with filter directives, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "TUBEFETCH_LOG";

/// Library events at debug, the binary at info, dependencies at warn.
/// Per-chunk and callback events are trace and stay off.
pub const DEFAULT_FILTER: &str = "warn,tubefetch=info,tubefetch_core=debug";

fn filter_directives(from_env: impl Fn(&str) -> Option<String>) -> String {
    [LOG_ENV, "RUST_LOG"]
        .into_iter()
        .filter_map(|var| from_env(var))
        .find(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

fn env_filter() -> EnvFilter {
    let directives = filter_directives(|var| std::env::var(var).ok());
    EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("tubefetch: ignoring invalid log filter {directives:?}: {e}");
        EnvFilter::new(DEFAULT_FILTER)
    })
}

/// `$XDG_STATE_HOME/tubefetch/tubefetch.log`, creating the directory.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tubefetch")?;
    xdg_dirs
        .place_state_file("tubefetch.log")
        .context("failed to create log directory")
}

/// Initialize structured logging to the state-dir log file.
/// On failure (e.g. log dir unwritable), returns Err so the caller can fall back to stderr.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing::info!("tubefetch logging initialized at {}", path.display());
    Ok(path)
}

/// Initialize logging to stderr only (no file). Use when init_logging() fails so the CLI doesn't crash.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
