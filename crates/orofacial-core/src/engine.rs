//! Exercise classification engine
//!
//! Consumes one frame at a time (face landmarks and audio features, either
//! possibly missing) and produces an [`ExerciseSnapshot`] for all seven
//! exercises. Geometric signals are smoothed once here and shared by every
//! detector in [`crate::exercises`].

use crate::audio::AudioFeatures;
use crate::config::ExerciseThresholds;
use crate::exercises::{
    classify_lateral, detect_lip_trill, AlternatingBite, FrameSignals, NoisyKiss,
    PuckerThenSmile, SuctionSeal, SustainedPucker,
};
use crate::filters::{Derivative, Ema};
use crate::geometry::{extract_features, GeometricFeatures};
use crate::landmarks::Landmark;
use crate::snapshot::ExerciseSnapshot;
use tracing::{debug, trace};

/// Smoothing factor for ratio, protrusion and lateral offset
pub const FEATURE_EMA_ALPHA: f32 = 0.4;
/// Smoothing factor for the nose-chin distance
pub const JAW_EMA_ALPHA: f32 = 0.2;

/// Stateful classifier for the seven orofacial exercises
///
/// Frames must arrive with non-decreasing timestamps. A frame without a
/// usable face leaves every timer, filter and phase untouched and returns
/// the previous snapshot.
#[derive(Debug, Clone)]
pub struct ExerciseEngine {
    thresholds: ExerciseThresholds,

    ratio_filter: Ema,
    protrusion_filter: Ema,
    lateral_filter: Ema,
    jaw_filter: Ema,
    mouth_height_rate: Derivative,
    jaw_baseline: Option<f32>,

    pucker_then_smile: PuckerThenSmile,
    sustained_pucker: SustainedPucker,
    alternating_bite: AlternatingBite,
    noisy_kiss: NoisyKiss,
    suction_seal: SuctionSeal,

    snapshot: ExerciseSnapshot,
    frames_processed: u64,
    frames_skipped: u64,
}

impl Default for ExerciseEngine {
    fn default() -> Self {
        Self::new(ExerciseThresholds::default())
    }
}

impl ExerciseEngine {
    /// Create an engine with the given thresholds
    pub fn new(thresholds: ExerciseThresholds) -> Self {
        debug!("Creating exercise engine with {:?}", thresholds);
        Self {
            thresholds,
            ratio_filter: Ema::new(FEATURE_EMA_ALPHA),
            protrusion_filter: Ema::new(FEATURE_EMA_ALPHA),
            lateral_filter: Ema::new(FEATURE_EMA_ALPHA),
            jaw_filter: Ema::new(JAW_EMA_ALPHA),
            mouth_height_rate: Derivative::new(),
            jaw_baseline: None,
            pucker_then_smile: PuckerThenSmile::default(),
            sustained_pucker: SustainedPucker::default(),
            alternating_bite: AlternatingBite::default(),
            noisy_kiss: NoisyKiss::default(),
            suction_seal: SuctionSeal::default(),
            snapshot: ExerciseSnapshot::default(),
            frames_processed: 0,
            frames_skipped: 0,
        }
    }

    /// Process one frame.
    ///
    /// `landmarks` is the full face mesh for this frame, or `None` when no
    /// face was found. `timestamp` is in seconds.
    pub fn update(
        &mut self,
        landmarks: Option<&[Landmark]>,
        audio: Option<&AudioFeatures>,
        timestamp: f64,
    ) -> ExerciseSnapshot {
        let features = landmarks.and_then(extract_features);
        self.update_with_features(features, audio, timestamp)
    }

    /// Process one frame from already extracted geometric features
    pub fn update_with_features(
        &mut self,
        features: Option<GeometricFeatures>,
        audio: Option<&AudioFeatures>,
        timestamp: f64,
    ) -> ExerciseSnapshot {
        let Some(raw) = features else {
            self.frames_skipped += 1;
            trace!("No usable face at {:.3}s, keeping previous state", timestamp);
            return self.snapshot;
        };

        let signals = self.compute_signals(raw, timestamp);
        let thresholds = &self.thresholds;

        let snapshot = ExerciseSnapshot {
            lateral_pucker: classify_lateral(&signals, thresholds),
            pucker_then_smile: self.pucker_then_smile.update(&signals, thresholds),
            sustained_pucker: self.sustained_pucker.update(&signals, thresholds),
            alternating_bite: self.alternating_bite.update(&signals),
            noisy_kiss: self.noisy_kiss.update(&signals, audio, thresholds),
            suction_seal: self.suction_seal.update(&signals, audio, thresholds),
            lip_trill: detect_lip_trill(audio, thresholds),
        };

        if snapshot.lateral_pucker != self.snapshot.lateral_pucker {
            debug!(
                "Lateral pucker: {} -> {} at {:.3}s",
                self.snapshot.lateral_pucker, snapshot.lateral_pucker, timestamp
            );
        }
        if snapshot.lip_trill && !self.snapshot.lip_trill {
            debug!(
                "Lip trill started at {:.3}s ({:?} Hz)",
                timestamp,
                audio.and_then(|a| a.envelope_hz)
            );
        }

        self.frames_processed += 1;
        self.snapshot = snapshot;
        snapshot
    }

    fn compute_signals(&mut self, raw: GeometricFeatures, timestamp: f64) -> FrameSignals {
        let ratio_vh = self.ratio_filter.update(raw.ratio_vh);
        let protrusion = self.protrusion_filter.update(raw.protrusion);
        let lateral = self.lateral_filter.update(raw.lateral);
        let nose_chin = self.jaw_filter.update(raw.nose_chin);
        let mouth_height_rate = self.mouth_height_rate.update(raw.mouth_height, timestamp);

        let baseline = *self.jaw_baseline.get_or_insert_with(|| {
            debug!("Jaw baseline latched at {:.4}", nose_chin);
            nose_chin
        });
        let jaw_stable = (nose_chin - baseline).abs() <= self.thresholds.jaw_stable_frac * baseline;

        FrameSignals::new(
            timestamp,
            raw,
            ratio_vh,
            protrusion,
            lateral,
            mouth_height_rate,
            jaw_stable,
            &self.thresholds,
        )
    }

    /// Most recent snapshot
    pub fn snapshot(&self) -> ExerciseSnapshot {
        self.snapshot
    }

    /// Thresholds in use
    pub fn thresholds(&self) -> &ExerciseThresholds {
        &self.thresholds
    }

    /// Nose-chin distance captured on the first usable frame
    pub fn jaw_baseline(&self) -> Option<f32> {
        self.jaw_baseline
    }

    /// Frames that carried a usable face
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Frames skipped for lack of a usable face
    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}
