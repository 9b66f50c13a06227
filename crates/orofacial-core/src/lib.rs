//! Orofacial Core - Exercise Classification
//!
//! This crate turns face landmarks and microphone audio into per-frame
//! classifications of seven orofacial exercises:
//! - Geometric mouth features from a face mesh
//! - Temporal filters (EMA, derivative, frame rate)
//! - Audio loudness, onset and envelope-rate features
//! - Per-exercise detectors and the engine that drives them
//! - Thresholds and logging configuration

#![warn(missing_docs)]

use thiserror::Error;

pub mod audio;
pub mod config;
pub mod engine;
pub mod exercises;
pub mod filters;
pub mod geometry;
pub mod landmarks;
pub mod logging;
pub mod snapshot;

// --- Re-exports grouped by category ---

// Inputs
pub use audio::{AudioExtractorConfig, AudioFeatureExtractor, AudioFeatures};
pub use geometry::{extract_features, GeometricFeatures};
pub use landmarks::{get_landmark, Landmark};

// Signal processing
pub use filters::{Derivative, Ema, FrameRateMeter};

// Classification
pub use config::ExerciseThresholds;
pub use engine::ExerciseEngine;
pub use snapshot::{
    BitePhase, DetectionRecord, Exercise, ExerciseSnapshot, LateralSide, PuckerSmilePhase,
};

// Logging
pub use logging::LogConfig;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// A threshold has a value the detectors cannot use
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// A lower bound is above its upper bound
    #[error("Invalid range for {name}: {min} > {max}")]
    InvalidRange {
        /// Which pair of thresholds
        name: &'static str,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },

    /// Filesystem failure in the logging setup
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
