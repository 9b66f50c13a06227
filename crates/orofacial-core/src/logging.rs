//! Logging configuration
//!
//! Describes where log output goes. Installing the subscriber is left to the
//! binary; this module only owns the settings and the log directory.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level: trace, debug, info, warn or error
    pub level: String,
    /// Write to stderr
    pub console_output: bool,
    /// Write to a file under `log_dir`
    pub file_output: bool,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Log files kept after cleanup, including the current one
    pub max_log_files: usize,
    /// File name (without extension) for this session's log
    pub file_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_dir: PathBuf::from("logs"),
            max_log_files: 10,
            file_name: "orofacial".to_string(),
        }
    }
}

impl LogConfig {
    /// Parse `level`, falling back to INFO
    pub fn parse_level(&self) -> Level {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" | "warning" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Path of the log file for this session
    pub fn current_log_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.file_name))
    }

    /// Create `log_dir` if file output is enabled
    pub fn ensure_log_directory(&self) -> Result<()> {
        if self.file_output {
            fs::create_dir_all(&self.log_dir)?;
        }
        Ok(())
    }

    /// Delete the oldest `.log` files so that a new one fits within `max_log_files`
    ///
    /// Returns the number of files removed.
    pub fn cleanup_old_logs(&self) -> Result<usize> {
        if !self.file_output || !self.log_dir.is_dir() {
            return Ok(0);
        }

        let mut logs: Vec<(std::time::SystemTime, PathBuf)> = fs::read_dir(&self.log_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_log_file(path))
            .filter_map(|path| {
                let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
                Some((modified, path))
            })
            .collect();

        let keep = self.max_log_files.saturating_sub(1);
        if logs.len() <= keep {
            return Ok(0);
        }

        logs.sort();
        let excess = logs.len() - keep;
        let mut removed = 0;
        for (_, path) in logs.into_iter().take(excess) {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("Failed to remove old log {:?}: {}", path, e),
            }
        }
        Ok(removed)
    }
}

fn is_log_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "log")
}
