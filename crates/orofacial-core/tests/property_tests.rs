use orofacial_core::landmarks::FACE_MESH_POINTS;
use orofacial_core::{
    extract_features, AudioFeatureExtractor, Derivative, Ema, ExerciseEngine, Landmark,
};
use proptest::prelude::*;

fn landmark_strategy() -> impl Strategy<Value = Landmark> {
    (0.0f32..1.0, 0.0f32..1.0, -0.1f32..0.1).prop_map(|(x, y, z)| Landmark::new(x, y, z))
}

proptest! {
    #[test]
    fn ema_stays_within_input_range(
        alpha in 0.01f32..1.0,
        inputs in prop::collection::vec(-100.0f32..100.0, 1..64),
    ) {
        let mut ema = Ema::new(alpha);
        let lo = inputs.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = inputs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        for x in inputs {
            let y = ema.update(x);
            prop_assert!(y >= lo - 1e-3 && y <= hi + 1e-3);
        }
    }

    #[test]
    fn derivative_starts_at_zero_and_stays_finite(
        values in prop::collection::vec(-1.0f32..1.0, 1..32),
        start in 0.0f64..1000.0,
    ) {
        let mut derivative = Derivative::new();
        for (i, v) in values.iter().enumerate() {
            // Repeated timestamps exercise the dt floor
            let t = start + (i / 2) as f64 * 0.033;
            let d = derivative.update(*v, t);
            if i == 0 {
                prop_assert_eq!(d, 0.0);
            }
            prop_assert!(d.is_finite());
        }
    }

    #[test]
    fn features_are_finite_for_finite_landmarks(
        points in prop::collection::vec(landmark_strategy(), FACE_MESH_POINTS),
    ) {
        let features = extract_features(&points).expect("all points present");
        prop_assert!(features.mouth_width > 0.0);
        prop_assert!(features.mouth_height >= 0.0);
        prop_assert!(features.ratio_vh >= 0.0 && features.ratio_vh.is_finite());
        prop_assert!(features.lip_order.abs() <= 1.0);
        prop_assert!(features.nose_chin >= 0.0);
    }

    #[test]
    fn engine_progress_is_bounded(
        frames in prop::collection::vec(
            (
                prop::option::of(prop::collection::vec(landmark_strategy(), FACE_MESH_POINTS)),
                0.0f64..0.1,
            ),
            1..40,
        ),
    ) {
        let mut engine = ExerciseEngine::default();
        let mut t = 0.0;
        for (landmarks, dt) in frames {
            t += dt;
            let snapshot = engine.update(landmarks.as_deref(), None, t);
            prop_assert!((0.0..=1.0).contains(&snapshot.sustained_pucker));
            prop_assert!(!snapshot.lip_trill);
            prop_assert!(!snapshot.noisy_kiss);
            prop_assert!(!snapshot.suction_seal);
        }
    }

    #[test]
    fn audio_features_are_finite(
        window in prop::collection::vec(
            prop_oneof![
                8 => -1.0f32..1.0,
                1 => Just(f32::NAN),
                1 => Just(f32::INFINITY),
            ],
            1..512,
        ),
    ) {
        let mut extractor = AudioFeatureExtractor::default();
        let features = extractor.process_window(&window, 0.0);
        prop_assert!(features.loudness_db.is_finite());
        prop_assert!(features.transient_db.is_finite());
    }
}
