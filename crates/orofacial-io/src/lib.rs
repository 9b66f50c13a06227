//! Orofacial IO - Files
//!
//! Loading and saving the files the exercise engine works with:
//! - Thresholds files (JSON, RON or TOML)
//! - Recorded sessions for offline replay

#![warn(missing_docs)]

pub mod error;
pub mod format;
pub mod recording;
pub mod thresholds;

pub use error::{IoError, Result};
pub use format::FileFormat;
pub use recording::{
    load_recording, save_recording, RecordedFrame, RecordedSession, RecordingMetadata,
    RECORDING_FILE_VERSION,
};
pub use thresholds::{load_thresholds, save_thresholds};
