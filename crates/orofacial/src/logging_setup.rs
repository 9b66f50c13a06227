//! Subscriber setup for the replay binary
//!
//! Detection records own stdout, so log lines only ever go to stderr and,
//! when a log directory is given, to one file per session.

use anyhow::{Context, Result};
use orofacial_core::logging::LogConfig;
use std::io::{self, IsTerminal};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Flushes the session log file when dropped
pub struct LogGuard {
    _file_worker: WorkerGuard,
}

/// Open `<log_dir>/<file_name>.log` behind a background writer
fn session_log_writer(config: &LogConfig) -> Result<Option<(NonBlocking, WorkerGuard)>> {
    if !config.file_output {
        return Ok(None);
    }
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(config.file_name.as_str())
        .filename_suffix("log")
        .build(&config.log_dir)
        .with_context(|| format!("Failed to open log file {:?}", config.current_log_path()))?;
    Ok(Some(tracing_appender::non_blocking(appender)))
}

/// Install the global subscriber.
///
/// One filter covers both outputs: the configured level, unless `RUST_LOG`
/// is set.
pub fn init(config: &LogConfig) -> Result<Option<LogGuard>> {
    config
        .ensure_log_directory()
        .context("Failed to create log directory")?;
    let cleanup = config.cleanup_old_logs();

    let filter = EnvFilter::builder()
        .with_default_directive(config.parse_level().into())
        .from_env_lossy();

    let stderr_layer = config.console_output.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_target(false)
    });

    let (file_layer, guard) = match session_log_writer(config)? {
        Some((writer, worker)) => (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(LogGuard {
                _file_worker: worker,
            }),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    match cleanup {
        Ok(0) => {}
        Ok(removed) => tracing::debug!("Removed {} old log file(s)", removed),
        Err(e) => tracing::warn!("Could not clean up old log files: {}", e),
    }
    if config.file_output {
        tracing::info!("Session log: {:?}", config.current_log_path());
    }

    Ok(guard)
}
