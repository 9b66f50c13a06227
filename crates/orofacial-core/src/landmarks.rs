//! Face mesh landmarks
//!
//! Points come from an external face tracker using the 468-point face mesh
//! numbering. Coordinates are normalized to the image (`x`, `y` roughly in
//! `[0, 1]`, `y` growing downwards) and `z` is a relative depth with no fixed
//! scale, so only differences between points are meaningful.

use serde::{Deserialize, Serialize};

/// Number of points produced by the face mesh tracker.
pub const FACE_MESH_POINTS: usize = 468;

/// Upper inner lip, middle.
pub const UPPER_INNER_LIP: usize = 13;
/// Lower inner lip, middle.
pub const LOWER_INNER_LIP: usize = 14;
/// Left mouth corner.
pub const LEFT_MOUTH_CORNER: usize = 61;
/// Right mouth corner.
pub const RIGHT_MOUTH_CORNER: usize = 291;
/// Nose septum, used as the head reference.
pub const NOSE_SEPTUM: usize = 1;
/// Chin.
pub const CHIN: usize = 152;

/// The six indices the classifier reads.
pub const REQUIRED_LANDMARKS: [usize; 6] = [
    UPPER_INNER_LIP,
    LOWER_INNER_LIP,
    LEFT_MOUTH_CORNER,
    RIGHT_MOUTH_CORNER,
    NOSE_SEPTUM,
    CHIN,
];

/// A single 3D landmark point (normalized coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0-1 normalized
    pub x: f32,
    /// Vertical position, 0-1 normalized (down is positive)
    pub y: f32,
    /// Relative depth (smaller is closer to the camera)
    pub z: f32,
}

impl Landmark {
    /// Create a landmark from its coordinates
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Planar (x, y) distance to another landmark
    pub fn distance_xy(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// True when every coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; 3]> for Landmark {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Look up a landmark, treating out-of-range indices and non-finite points as missing.
pub fn get_landmark(landmarks: &[Landmark], index: usize) -> Option<Landmark> {
    landmarks.get(index).copied().filter(Landmark::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 5.0);
        let b = Landmark::new(3.0, 4.0, -5.0);
        assert!((a.distance_xy(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_get_landmark_out_of_range() {
        let points = vec![Landmark::default(); 10];
        assert!(get_landmark(&points, 9).is_some());
        assert!(get_landmark(&points, CHIN).is_none());
    }

    #[test]
    fn test_get_landmark_rejects_nan() {
        let mut points = vec![Landmark::default(); FACE_MESH_POINTS];
        points[NOSE_SEPTUM] = Landmark::new(f32::NAN, 0.5, 0.0);
        assert!(get_landmark(&points, NOSE_SEPTUM).is_none());
        assert!(get_landmark(&points, CHIN).is_some());
    }

    #[test]
    fn test_required_indices_fit_face_mesh() {
        assert!(REQUIRED_LANDMARKS.iter().all(|&i| i < FACE_MESH_POINTS));
    }
}
