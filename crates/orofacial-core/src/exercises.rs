//! Per-exercise detectors
//!
//! Each detector owns only its own timers and phase and reads the shared
//! [`FrameSignals`] computed once per frame by the engine. Detectors never
//! look at each other, so a person can be scored on several exercises from
//! one continuous session.

use crate::audio::AudioFeatures;
use crate::config::ExerciseThresholds;
use crate::geometry::GeometricFeatures;
use crate::snapshot::{BitePhase, LateralSide, PuckerSmilePhase};
use tracing::{debug, info};

/// Time a smile must be held before the pucker-then-smile sequence completes.
pub const SMILE_DWELL_SECS: f64 = 0.4;
/// Minimum spacing between accepted lip bites.
pub const BITE_DEBOUNCE_SECS: f64 = 0.25;
/// Largest `|lip_order|` at which the lips count as pressed together.
pub const BITE_CONTACT_MAX: f32 = 0.1;
/// How long after a pucker a transient still counts as a kiss.
pub const KISS_WINDOW_SECS: f64 = 0.6;
/// Minimum closed time before a release can count as a suction seal.
pub const SEAL_MIN_CLOSED_SECS: f64 = 0.25;
/// Minimum loudness for a lip trill.
pub const TRILL_MIN_LOUDNESS_DB: f32 = -45.0;
/// A smile must be narrower than this fraction of the closed-mouth ratio.
pub const SMILE_CLOSED_FACTOR: f32 = 0.8;
/// Minimum mouth width for a smile.
pub const SMILE_MIN_MOUTH_WIDTH: f32 = 0.4;

/// Everything the detectors need to know about one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSignals {
    /// Frame time in seconds
    pub timestamp: f64,
    /// Unsmoothed geometric features
    pub raw: GeometricFeatures,
    /// Smoothed height/width ratio
    pub ratio_vh: f32,
    /// Smoothed protrusion
    pub protrusion: f32,
    /// Smoothed lateral offset
    pub lateral: f32,
    /// Rate of change of the raw mouth height, per second
    pub mouth_height_rate: f32,
    /// Nose-chin distance within tolerance of its first value
    pub jaw_stable: bool,
    /// Lips protruded and narrow
    pub is_pucker: bool,
    /// Corners raised on a closed, wide mouth
    pub is_smile: bool,
    /// Lips closed
    pub is_closed: bool,
    /// Mouth moderately open
    pub is_open: bool,
}

impl FrameSignals {
    /// Derive the base signals from smoothed values and thresholds
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamp: f64,
        raw: GeometricFeatures,
        ratio_vh: f32,
        protrusion: f32,
        lateral: f32,
        mouth_height_rate: f32,
        jaw_stable: bool,
        thresholds: &ExerciseThresholds,
    ) -> Self {
        let is_pucker = protrusion > thresholds.pucker_protrusion_min
            && ratio_vh < thresholds.pucker_narrow_max;
        let is_smile = ratio_vh < thresholds.mouth_closed * SMILE_CLOSED_FACTOR
            && raw.corners_up > thresholds.smile_corners_up_min
            && raw.mouth_width > SMILE_MIN_MOUTH_WIDTH;
        let is_closed = ratio_vh < thresholds.mouth_closed;
        let is_open = ratio_vh > thresholds.mouth_open;

        Self {
            timestamp,
            raw,
            ratio_vh,
            protrusion,
            lateral,
            mouth_height_rate,
            jaw_stable,
            is_pucker,
            is_smile,
            is_closed,
            is_open,
        }
    }
}

/// Sideways pucker: stateless, decided fresh every frame
pub fn classify_lateral(signals: &FrameSignals, thresholds: &ExerciseThresholds) -> LateralSide {
    if !(signals.is_pucker && signals.jaw_stable) {
        return LateralSide::None;
    }
    if signals.lateral > thresholds.lateral_shift {
        LateralSide::Right
    } else if signals.lateral < -thresholds.lateral_shift {
        LateralSide::Left
    } else {
        LateralSide::None
    }
}

/// Lip trill: needs an envelope estimate inside the band and enough loudness
pub fn detect_lip_trill(audio: Option<&AudioFeatures>, thresholds: &ExerciseThresholds) -> bool {
    let Some(audio) = audio else {
        return false;
    };
    match audio.envelope_hz {
        Some(hz) => {
            (thresholds.trill_min_hz..=thresholds.trill_max_hz).contains(&hz)
                && audio.loudness_db > TRILL_MIN_LOUDNESS_DB
        }
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum SequenceState {
    #[default]
    Idle,
    Pucker {
        since: f64,
    },
    Smile {
        since: f64,
    },
}

/// Pucker, then smile, then a short dwell
#[derive(Debug, Clone, Default)]
pub struct PuckerThenSmile {
    state: SequenceState,
}

impl PuckerThenSmile {
    /// Advance by one frame and return the phase to report
    pub fn update(
        &mut self,
        signals: &FrameSignals,
        thresholds: &ExerciseThresholds,
    ) -> PuckerSmilePhase {
        let now = signals.timestamp;
        match self.state {
            SequenceState::Idle => {
                if signals.is_pucker {
                    debug!("Pucker-then-smile: pucker at {:.3}s", now);
                    self.state = SequenceState::Pucker { since: now };
                    return PuckerSmilePhase::Pucker;
                }
                PuckerSmilePhase::Idle
            }
            SequenceState::Pucker { since } => {
                let smiling = signals.is_smile
                    || (signals.raw.corners_up > thresholds.smile_corners_up_min
                        && signals.is_open);
                if smiling {
                    debug!(
                        "Pucker-then-smile: smile at {:.3}s ({:.2}s after pucker)",
                        now,
                        now - since
                    );
                    self.state = SequenceState::Smile { since: now };
                    return PuckerSmilePhase::Smile;
                }
                PuckerSmilePhase::Pucker
            }
            SequenceState::Smile { since } => {
                if now - since > SMILE_DWELL_SECS {
                    info!("Pucker-then-smile completed at {:.3}s", now);
                    self.state = SequenceState::Idle;
                    return PuckerSmilePhase::Done;
                }
                PuckerSmilePhase::Smile
            }
        }
    }
}

/// Hold a pucker for the configured time
#[derive(Debug, Clone, Default)]
pub struct SustainedPucker {
    hold_start: Option<f64>,
}

impl SustainedPucker {
    /// Advance by one frame and return the progress fraction
    pub fn update(&mut self, signals: &FrameSignals, thresholds: &ExerciseThresholds) -> f32 {
        if !signals.is_pucker {
            self.hold_start = None;
            return 0.0;
        }
        let start = *self.hold_start.get_or_insert(signals.timestamp);
        let held = (signals.timestamp - start) as f32;
        (held / thresholds.hold_seconds.max(f32::EPSILON)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BiteKind {
    Upper,
    Lower,
}

impl From<BiteKind> for BitePhase {
    fn from(kind: BiteKind) -> Self {
        match kind {
            BiteKind::Upper => BitePhase::Upper,
            BiteKind::Lower => BitePhase::Lower,
        }
    }
}

/// Upper and lower lip bites in alternation
///
/// Once an alternation has been seen the detector reports
/// [`BitePhase::Alternating`] for the rest of its life.
#[derive(Debug, Clone, Default)]
pub struct AlternatingBite {
    last_sign: i8,
    last_accepted: Option<(BiteKind, f64)>,
    alternations: u32,
}

impl AlternatingBite {
    /// Advance by one frame and return the bite state
    pub fn update(&mut self, signals: &FrameSignals) -> BitePhase {
        let lip_order = signals.raw.lip_order;
        let sign = sign_of(lip_order);

        let candidate = if signals.is_closed && lip_order.abs() < BITE_CONTACT_MAX {
            if self.last_sign >= 0 && sign < 0 {
                Some(BiteKind::Upper)
            } else if self.last_sign <= 0 && sign > 0 {
                Some(BiteKind::Lower)
            } else {
                None
            }
        } else {
            None
        };
        self.last_sign = sign;

        if let Some(kind) = candidate {
            self.accept(kind, signals.timestamp);
        }

        if self.alternations >= 1 {
            BitePhase::Alternating
        } else {
            self.last_accepted
                .map_or(BitePhase::Idle, |(kind, _)| kind.into())
        }
    }

    fn accept(&mut self, kind: BiteKind, now: f64) {
        if let Some((_, at)) = self.last_accepted {
            if now - at < BITE_DEBOUNCE_SECS {
                return;
            }
        }
        if let Some((previous, _)) = self.last_accepted {
            if previous != kind {
                self.alternations += 1;
                if self.alternations == 1 {
                    info!("Alternating lip bites reached at {:.3}s", now);
                }
            }
        }
        debug!("Lip bite accepted: {:?} at {:.3}s", kind, now);
        self.last_accepted = Some((kind, now));
    }
}

fn sign_of(x: f32) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Kiss sound shortly after a pucker
#[derive(Debug, Clone, Default)]
pub struct NoisyKiss {
    last_pucker_at: Option<f64>,
}

impl NoisyKiss {
    /// Advance by one frame; true only on frames carrying the kiss sound
    pub fn update(
        &mut self,
        signals: &FrameSignals,
        audio: Option<&AudioFeatures>,
        thresholds: &ExerciseThresholds,
    ) -> bool {
        let now = signals.timestamp;
        if signals.is_pucker {
            self.last_pucker_at = Some(now);
        }

        let recent_pucker = self
            .last_pucker_at
            .is_some_and(|at| now - at < KISS_WINDOW_SECS);
        let pop = audio.is_some_and(|a| a.has_transient_above(thresholds.transient_db));

        let kiss = recent_pucker && pop;
        if kiss {
            info!("Noisy kiss at {:.3}s", now);
        }
        kiss
    }
}

/// Closed lips released suddenly with a pop
#[derive(Debug, Clone, Default)]
pub struct SuctionSeal {
    closed_since: Option<f64>,
}

impl SuctionSeal {
    /// Advance by one frame; true only on the frame the seal is released
    pub fn update(
        &mut self,
        signals: &FrameSignals,
        audio: Option<&AudioFeatures>,
        thresholds: &ExerciseThresholds,
    ) -> bool {
        let now = signals.timestamp;
        if signals.is_closed {
            self.closed_since.get_or_insert(now);
            return false;
        }

        let Some(since) = self.closed_since.take() else {
            return false;
        };

        let held_closed = now - since > SEAL_MIN_CLOSED_SECS;
        let sudden_open = signals.mouth_height_rate > thresholds.rapid_open_rate;
        let pop = audio.is_some_and(|a| a.has_transient_above(thresholds.transient_db));

        let released = held_closed && sudden_open && pop;
        if released {
            info!("Suction seal released at {:.3}s", now);
        } else {
            debug!(
                "Lips opened at {:.3}s without seal (held={}, sudden={}, pop={})",
                now, held_closed, sudden_open, pop
            );
        }
        released
    }
}
