//! Geometric mouth and jaw features
//!
//! Turns one frame of landmarks into scale-free mouth measurements. The
//! extraction is a pure function of the six required points; it keeps no
//! state between frames.
//!
//! Width and the nose-chin distance are planar (x, y) distances while the
//! mouth height is the plain vertical difference between the inner lips.
//! Every ratio threshold in [`crate::config::ExerciseThresholds`] is tuned
//! against these exact measurements.

use crate::landmarks::{
    get_landmark, Landmark, CHIN, LEFT_MOUTH_CORNER, LOWER_INNER_LIP, NOSE_SEPTUM,
    RIGHT_MOUTH_CORNER, UPPER_INNER_LIP,
};
use serde::{Deserialize, Serialize};

/// Additive guard against zero-length segments.
pub const GEOMETRY_EPSILON: f32 = 1e-6;

/// Per-frame mouth and jaw measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometricFeatures {
    /// Corner-to-corner distance (never zero)
    pub mouth_width: f32,
    /// Vertical gap between the inner lips
    pub mouth_height: f32,
    /// `mouth_height / mouth_width`
    pub ratio_vh: f32,
    /// Mouth center relative to the nose, in mouth widths (positive = right)
    pub lateral: f32,
    /// Nose depth minus mean lip depth (larger = lips pushed forward)
    pub protrusion: f32,
    /// Nose height minus mean corner height, in mouth widths (larger = corners raised)
    pub corners_up: f32,
    /// Planar nose-to-chin distance
    pub nose_chin: f32,
    /// Signed inner-lip ordering, close to ±1 unless the lips touch
    pub lip_order: f32,
}

/// The six points the features are computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouthPoints {
    /// Upper inner lip
    pub upper_lip: Landmark,
    /// Lower inner lip
    pub lower_lip: Landmark,
    /// Left mouth corner
    pub left_corner: Landmark,
    /// Right mouth corner
    pub right_corner: Landmark,
    /// Nose septum
    pub nose: Landmark,
    /// Chin
    pub chin: Landmark,
}

impl MouthPoints {
    /// Pick the required points out of a full landmark set.
    ///
    /// Returns `None` if any of them is missing or non-finite.
    pub fn from_landmarks(landmarks: &[Landmark]) -> Option<Self> {
        Some(Self {
            upper_lip: get_landmark(landmarks, UPPER_INNER_LIP)?,
            lower_lip: get_landmark(landmarks, LOWER_INNER_LIP)?,
            left_corner: get_landmark(landmarks, LEFT_MOUTH_CORNER)?,
            right_corner: get_landmark(landmarks, RIGHT_MOUTH_CORNER)?,
            nose: get_landmark(landmarks, NOSE_SEPTUM)?,
            chin: get_landmark(landmarks, CHIN)?,
        })
    }

    /// Compute the features for these points
    pub fn features(&self) -> GeometricFeatures {
        let Self {
            upper_lip,
            lower_lip,
            left_corner,
            right_corner,
            nose,
            chin,
        } = self;

        let mouth_width = left_corner.distance_xy(right_corner) + GEOMETRY_EPSILON;
        let mouth_height = (upper_lip.y - lower_lip.y).abs();
        let ratio_vh = mouth_height / mouth_width;

        let mouth_center_x = (left_corner.x + right_corner.x) / 2.0;
        let lateral = (mouth_center_x - nose.x) / mouth_width;

        let lips_z = (upper_lip.z + lower_lip.z + left_corner.z + right_corner.z) / 4.0;
        let protrusion = nose.z - lips_z;

        let corners_y = (left_corner.y + right_corner.y) / 2.0;
        let corners_up = (nose.y - corners_y) / mouth_width;

        let nose_chin = nose.distance_xy(chin);

        let lip_order = (upper_lip.y - lower_lip.y) / (mouth_height + GEOMETRY_EPSILON);

        GeometricFeatures {
            mouth_width,
            mouth_height,
            ratio_vh,
            lateral,
            protrusion,
            corners_up,
            nose_chin,
            lip_order,
        }
    }
}

/// Extract mouth features from a landmark set, or `None` if the frame is unusable
pub fn extract_features(landmarks: &[Landmark]) -> Option<GeometricFeatures> {
    MouthPoints::from_landmarks(landmarks).map(|points| points.features())
}
