//! Recorded sessions
//!
//! A recording captures what the camera and microphone delivered during a
//! session so it can be replayed through the engine offline: one entry per
//! video frame with its timestamp, the face mesh (if a face was found) and
//! the raw audio samples that arrived since the previous frame.

use crate::error::{IoError, Result};
use crate::format::{load_file, save_file};
use chrono::{DateTime, Utc};
use orofacial_core::landmarks::FACE_MESH_POINTS;
use orofacial_core::Landmark;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// The current version of the recording file format.
pub const RECORDING_FILE_VERSION: &str = "1.0.0";

/// Maximum allowed recording file size (512 MB).
pub const MAX_RECORDING_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Default microphone sample rate
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Metadata about a recording.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordingMetadata {
    /// When the session was captured.
    pub recorded_at: DateTime<Utc>,
    /// Audio sample rate in Hz.
    pub sample_rate: u32,
    /// Free-form note, e.g. which exercise was practiced.
    #[serde(default)]
    pub description: Option<String>,
}

/// One captured video frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordedFrame {
    /// Capture time in seconds
    pub timestamp: f64,
    /// Face mesh as `[x, y, z]` triples, absent when no face was found
    #[serde(default)]
    pub landmarks: Option<Vec<[f32; 3]>>,
    /// Audio samples captured since the previous frame
    #[serde(default)]
    pub audio: Option<Vec<f32>>,
}

impl RecordedFrame {
    /// Landmarks converted for the engine
    pub fn landmarks(&self) -> Option<Vec<Landmark>> {
        self.landmarks
            .as_ref()
            .map(|points| points.iter().copied().map(Landmark::from).collect())
    }
}

/// A complete recorded session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordedSession {
    /// The version of the recording file format.
    pub version: String,
    /// Metadata about the recording.
    pub metadata: RecordingMetadata,
    /// Frames in capture order.
    #[serde(default)]
    pub frames: Vec<RecordedFrame>,
}

impl RecordedSession {
    /// Creates an empty recording stamped with the current time.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            version: RECORDING_FILE_VERSION.to_string(),
            metadata: RecordingMetadata {
                recorded_at: Utc::now(),
                sample_rate,
                description: None,
            },
            frames: Vec::new(),
        }
    }

    /// Append a frame.
    pub fn push_frame(&mut self, frame: RecordedFrame) {
        self.frames.push(frame);
    }

    /// Seconds between the first and last frame
    pub fn duration(&self) -> f64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        }
    }

    /// Frames that carry a face mesh
    pub fn frames_with_face(&self) -> usize {
        self.frames.iter().filter(|f| f.landmarks.is_some()).count()
    }

    /// Check that the content can be replayed.
    ///
    /// Timestamps must be finite and non-decreasing and the sample rate
    /// positive. A short face mesh is accepted (the engine treats the frame
    /// as having no face) but logged.
    pub fn validate(&self) -> Result<()> {
        if self.metadata.sample_rate == 0 {
            return Err(IoError::invalid_recording("sample rate is zero"));
        }

        let mut previous = f64::NEG_INFINITY;
        for (index, frame) in self.frames.iter().enumerate() {
            if !frame.timestamp.is_finite() {
                return Err(IoError::invalid_recording(format!(
                    "frame {} has a non-finite timestamp",
                    index
                )));
            }
            if frame.timestamp < previous {
                return Err(IoError::invalid_recording(format!(
                    "frame {} goes back in time ({} < {})",
                    index, frame.timestamp, previous
                )));
            }
            previous = frame.timestamp;

            if let Some(points) = &frame.landmarks {
                if points.len() < FACE_MESH_POINTS {
                    warn!(
                        "Frame {} has {} landmarks, expected {}",
                        index,
                        points.len(),
                        FACE_MESH_POINTS
                    );
                }
            }
        }
        Ok(())
    }

    /// Loads a recording, format chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_limit(path, MAX_RECORDING_FILE_SIZE)
    }

    fn load_with_limit(path: &Path, limit: u64) -> Result<Self> {
        load_file(path, limit)
    }

    /// Saves the recording, format chosen by extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        save_file(self, path)
    }
}

/// Load a recording, checking its version and content.
pub fn load_recording(path: &Path) -> Result<RecordedSession> {
    let session = RecordedSession::load(path)?;

    if session.version != RECORDING_FILE_VERSION {
        return Err(IoError::VersionMismatch {
            expected: RECORDING_FILE_VERSION.to_string(),
            found: session.version,
        });
    }

    session.validate()?;
    debug!(
        "Loaded recording {:?}: {} frames ({} with face), {:.1}s",
        path,
        session.frames.len(),
        session.frames_with_face(),
        session.duration()
    );
    Ok(session)
}

/// Save a recording after checking its content.
pub fn save_recording(session: &RecordedSession, path: &Path) -> Result<()> {
    session.validate()?;
    session.save(path)
}
