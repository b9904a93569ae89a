//! Logging setup: stderr plus a per-session log file.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_DIR_ENV: &str = "PIXI_LOG_DIR";

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG` (default `info`). Keep the returned guard
/// alive for the life of the process or buffered file output is lost.
pub fn setup_logging(session_id: Option<String>) -> Result<WorkerGuard> {
    let session_id = session_id.unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{timestamp}")
    });

    let session_log_dir = log_dir().join(&session_id);
    std::fs::create_dir_all(&session_log_dir).with_context(|| {
        format!(
            "failed to create log directory {}",
            session_log_dir.display()
        )
    })?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "pixi.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/pixi.log", session_log_dir.display());

    Ok(guard)
}

/// Platform cache directory for logs, overridable with `PIXI_LOG_DIR`.
///
/// - macOS: `~/Library/Caches/pixi/logs`
/// - Linux: `~/.cache/pixi/logs` (or `$XDG_CACHE_HOME/pixi/logs`)
/// - Windows: `%LOCALAPPDATA%\pixi\cache\logs`
pub fn log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV) {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("", "", "pixi")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("pixi"))
        .join("logs")
}
