//! Per-frame classification results

use crate::audio::AudioFeatures;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a sideways pucker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LateralSide {
    /// Centered, or not puckering
    #[default]
    None,
    /// Mouth pushed to the left
    Left,
    /// Mouth pushed to the right
    Right,
}

/// Reported phase of the pucker-then-smile sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuckerSmilePhase {
    /// Waiting for a pucker
    #[default]
    Idle,
    /// Pucker seen, waiting for a smile
    Pucker,
    /// Smiling, dwell running
    Smile,
    /// Sequence completed on this frame
    Done,
}

/// Reported state of the alternating lip bite exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitePhase {
    /// No bite accepted yet
    #[default]
    Idle,
    /// Last accepted bite was on the upper lip
    Upper,
    /// Last accepted bite was on the lower lip
    Lower,
    /// Upper and lower bites have alternated
    Alternating,
}

/// One named exercise, used to list what a snapshot reports as completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    /// Pucker pushed to one side
    LateralPucker,
    /// Pucker followed by a smile
    PuckerThenSmile,
    /// Pucker held for the configured time
    SustainedPucker,
    /// Upper and lower lip bites in alternation
    AlternatingBite,
    /// Pucker with an audible kiss
    NoisyKiss,
    /// Closed lips released with a pop
    SuctionSeal,
    /// Vibrating lips
    LipTrill,
}

impl LateralSide {
    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl PuckerSmilePhase {
    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pucker => "pucker",
            Self::Smile => "smile",
            Self::Done => "done",
        }
    }
}

impl BitePhase {
    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Alternating => "alternating",
        }
    }
}

impl Exercise {
    /// All exercises in display order
    pub const ALL: [Exercise; 7] = [
        Self::LateralPucker,
        Self::PuckerThenSmile,
        Self::SustainedPucker,
        Self::AlternatingBite,
        Self::NoisyKiss,
        Self::SuctionSeal,
        Self::LipTrill,
    ];

    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LateralPucker => "lateral_pucker",
            Self::PuckerThenSmile => "pucker_then_smile",
            Self::SustainedPucker => "sustained_pucker",
            Self::AlternatingBite => "alternating_bite",
            Self::NoisyKiss => "noisy_kiss",
            Self::SuctionSeal => "suction_seal",
            Self::LipTrill => "lip_trill",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(LateralSide, PuckerSmilePhase, BitePhase, Exercise);

/// Classification result across all seven exercises for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExerciseSnapshot {
    /// Sideways pucker direction
    pub lateral_pucker: LateralSide,
    /// Pucker-then-smile phase
    pub pucker_then_smile: PuckerSmilePhase,
    /// Sustained pucker progress in `[0, 1]`
    pub sustained_pucker: f32,
    /// Alternating lip bite state
    pub alternating_bite: BitePhase,
    /// Kiss sound right after a pucker, this frame only
    pub noisy_kiss: bool,
    /// Suction seal released with a pop, this frame only
    pub suction_seal: bool,
    /// Lip trill heard this frame
    pub lip_trill: bool,
}

impl ExerciseSnapshot {
    /// Exercises this snapshot shows as accomplished
    pub fn completed(&self) -> Vec<Exercise> {
        let mut done = Vec::new();
        if self.lateral_pucker != LateralSide::None {
            done.push(Exercise::LateralPucker);
        }
        if self.pucker_then_smile == PuckerSmilePhase::Done {
            done.push(Exercise::PuckerThenSmile);
        }
        if self.sustained_pucker >= 1.0 {
            done.push(Exercise::SustainedPucker);
        }
        if self.alternating_bite == BitePhase::Alternating {
            done.push(Exercise::AlternatingBite);
        }
        if self.noisy_kiss {
            done.push(Exercise::NoisyKiss);
        }
        if self.suction_seal {
            done.push(Exercise::SuctionSeal);
        }
        if self.lip_trill {
            done.push(Exercise::LipTrill);
        }
        done
    }
}

/// One frame of a detection log: elapsed time, result and the audio evidence used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Milliseconds since the start of the session
    pub t_ms: u64,
    /// Classification result
    pub state: ExerciseSnapshot,
    /// Audio features fed to the engine, if any
    pub audio: Option<AudioFeatures>,
}

impl DetectionRecord {
    /// Build a record for a frame at `timestamp`, relative to `session_start` (seconds)
    pub fn new(
        session_start: f64,
        timestamp: f64,
        state: ExerciseSnapshot,
        audio: Option<AudioFeatures>,
    ) -> Self {
        let elapsed = (timestamp - session_start).max(0.0);
        Self {
            t_ms: (elapsed * 1000.0).round() as u64,
            state,
            audio,
        }
    }
}
