//! Audio feature extraction
//!
//! Summarizes a microphone waveform into one [`AudioFeatures`] record per
//! video frame: loudness, the strength of sudden onsets (pops, kiss sounds)
//! and the modulation rate of the loudness envelope (lip trills).

pub mod extractor;

pub use extractor::{AudioExtractorConfig, AudioFeatureExtractor};

use serde::{Deserialize, Serialize};

/// Acoustic features for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    /// RMS loudness in dBFS
    pub loudness_db: f32,
    /// Fast envelope rise over the slow baseline, in dB relative to the baseline
    pub transient_db: f32,
    /// Envelope modulation frequency in Hz, once enough periodic peaks were seen
    pub envelope_hz: Option<f32>,
}

impl AudioFeatures {
    /// True if the onset strength is above `threshold_db`
    pub fn has_transient_above(&self, threshold_db: f32) -> bool {
        self.transient_db > threshold_db
    }
}
