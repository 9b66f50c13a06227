//! Error types for file I/O.
//!
//! Covers reading and writing thresholds files and recorded sessions in any
//! of the supported formats.

use orofacial_core::CoreError;

/// Result type alias for file I/O operations.
pub type Result<T> = std::result::Result<T, IoError>;

/// Error type for file I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse or write failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// RON parse failure
    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    /// RON write failure
    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    /// TOML parse failure
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML write failure
    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// File was written by an incompatible version
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build reads
        expected: String,
        /// Version found in the file
        found: String,
    },

    /// File extension does not map to a known format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// File exceeds the size limit for its kind
    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge {
        /// Actual size in bytes
        size: u64,
        /// Limit in bytes
        limit: u64,
    },

    /// Recording parsed but its content is inconsistent
    #[error("Invalid recording: {0}")]
    InvalidRecording(String),

    /// Thresholds parsed but failed validation
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(#[from] CoreError),
}

impl IoError {
    /// Creates an invalid recording error with a custom message.
    pub fn invalid_recording(msg: impl Into<String>) -> Self {
        Self::InvalidRecording(msg.into())
    }

    /// Creates an unsupported format error for an extension.
    pub fn unsupported_format(extension: &str) -> Self {
        Self::UnsupportedFormat(extension.to_string())
    }
}
