//! Classification thresholds
//!
//! A flat set of named numeric thresholds. Every field has an empirical
//! default; when loaded from a mapping, missing keys keep their default and
//! unknown keys are ignored. Field names are snake_case; camelCase option
//! names (`puckerProtrusion`, `popTransientDb`, ...) are accepted as aliases.

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Thresholds driving the exercise detectors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseThresholds {
    /// Minimum lip protrusion for a pucker
    #[serde(alias = "puckerProtrusion")]
    pub pucker_protrusion_min: f32,
    /// Maximum height/width ratio for a pucker (narrow mouth)
    #[serde(alias = "puckerNarrow")]
    pub pucker_narrow_max: f32,
    /// Minimum corner elevation for a smile
    #[serde(alias = "smileCornersUp")]
    pub smile_corners_up_min: f32,
    /// Height/width ratio below which the lips count as closed
    #[serde(alias = "mouthClosed")]
    pub mouth_closed: f32,
    /// Height/width ratio above which the mouth counts as open
    #[serde(alias = "mouthOpen")]
    pub mouth_open: f32,
    /// Lateral offset, in mouth widths, that counts as a sideways pucker
    #[serde(alias = "lateralShift")]
    pub lateral_shift: f32,
    /// Tolerated nose-chin drift as a fraction of the first observed distance
    #[serde(alias = "jawStableFrac")]
    pub jaw_stable_frac: f32,
    /// Onset strength in dB that counts as an acoustic event
    #[serde(alias = "popTransientDb")]
    pub transient_db: f32,
    /// Lower bound of the lip trill modulation band, Hz
    #[serde(alias = "trillMinHz")]
    pub trill_min_hz: f32,
    /// Upper bound of the lip trill modulation band, Hz
    #[serde(alias = "trillMaxHz")]
    pub trill_max_hz: f32,
    /// Seconds a pucker must be held for full progress
    #[serde(alias = "holdSeconds")]
    pub hold_seconds: f32,
    /// Mouth-height rate of change (per second) that counts as a sudden opening
    #[serde(alias = "rapidOpenRate")]
    pub rapid_open_rate: f32,
}

impl Default for ExerciseThresholds {
    fn default() -> Self {
        Self {
            pucker_protrusion_min: 0.008,
            pucker_narrow_max: 0.075,
            smile_corners_up_min: 0.12,
            mouth_closed: 0.035,
            mouth_open: 0.06,
            lateral_shift: 0.08,
            jaw_stable_frac: 0.04,
            transient_db: 9.0,
            trill_min_hz: 12.0,
            trill_max_hz: 35.0,
            hold_seconds: 3.0,
            rapid_open_rate: 0.6,
        }
    }
}

impl ExerciseThresholds {
    /// Build thresholds from a flat `(name, value)` mapping.
    ///
    /// Both snake_case and camelCase names are recognized; anything else is
    /// skipped and absent names keep their defaults.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut thresholds = Self::default();
        for (name, value) in pairs {
            if !thresholds.set(name, value as f32) {
                debug!("Ignoring unknown threshold '{}'", name);
            }
        }
        thresholds
    }

    /// Set one threshold by name. Returns `false` if the name is unknown.
    pub fn set(&mut self, name: &str, value: f32) -> bool {
        let slot = match name {
            "pucker_protrusion_min" | "puckerProtrusion" => &mut self.pucker_protrusion_min,
            "pucker_narrow_max" | "puckerNarrow" => &mut self.pucker_narrow_max,
            "smile_corners_up_min" | "smileCornersUp" => &mut self.smile_corners_up_min,
            "mouth_closed" | "mouthClosed" => &mut self.mouth_closed,
            "mouth_open" | "mouthOpen" => &mut self.mouth_open,
            "lateral_shift" | "lateralShift" => &mut self.lateral_shift,
            "jaw_stable_frac" | "jawStableFrac" => &mut self.jaw_stable_frac,
            "transient_db" | "popTransientDb" => &mut self.transient_db,
            "trill_min_hz" | "trillMinHz" => &mut self.trill_min_hz,
            "trill_max_hz" | "trillMaxHz" => &mut self.trill_max_hz,
            "hold_seconds" | "holdSeconds" => &mut self.hold_seconds,
            "rapid_open_rate" | "rapidOpenRate" => &mut self.rapid_open_rate,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// All thresholds with their snake_case names
    pub fn entries(&self) -> [(&'static str, f32); 12] {
        [
            ("pucker_protrusion_min", self.pucker_protrusion_min),
            ("pucker_narrow_max", self.pucker_narrow_max),
            ("smile_corners_up_min", self.smile_corners_up_min),
            ("mouth_closed", self.mouth_closed),
            ("mouth_open", self.mouth_open),
            ("lateral_shift", self.lateral_shift),
            ("jaw_stable_frac", self.jaw_stable_frac),
            ("transient_db", self.transient_db),
            ("trill_min_hz", self.trill_min_hz),
            ("trill_max_hz", self.trill_max_hz),
            ("hold_seconds", self.hold_seconds),
            ("rapid_open_rate", self.rapid_open_rate),
        ]
    }

    /// Reject values the detectors cannot work with
    pub fn validate(&self) -> Result<()> {
        if let Some((name, value)) = self.entries().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(CoreError::InvalidThreshold(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
        if self.hold_seconds <= 0.0 {
            return Err(CoreError::InvalidThreshold(format!(
                "hold_seconds must be positive, got {}",
                self.hold_seconds
            )));
        }
        if self.trill_min_hz > self.trill_max_hz {
            return Err(CoreError::InvalidRange {
                name: "trill band",
                min: self.trill_min_hz,
                max: self.trill_max_hz,
            });
        }
        if self.mouth_closed >= self.mouth_open {
            return Err(CoreError::InvalidRange {
                name: "mouth closed/open",
                min: self.mouth_closed,
                max: self.mouth_open,
            });
        }
        if self.jaw_stable_frac < 0.0 || self.lateral_shift < 0.0 {
            return Err(CoreError::InvalidThreshold(
                "jaw_stable_frac and lateral_shift must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
