use orofacial_core::landmarks::FACE_MESH_POINTS;
use orofacial_core::{extract_features, ExerciseThresholds};
use orofacial_io::{
    load_recording, load_thresholds, save_recording, save_thresholds, IoError, RecordedFrame,
    RecordedSession,
};
use std::fs;
use tempfile::TempDir;

fn sample_session() -> RecordedSession {
    let mut session = RecordedSession::new(16_000);
    session.metadata.description = Some("sustained pucker".to_string());

    let mut face = vec![[0.5f32, 0.5, 0.0]; FACE_MESH_POINTS];
    face[61] = [0.375, 0.5, -0.0078125];
    face[291] = [0.625, 0.5, -0.0078125];

    for i in 0..4 {
        session.push_frame(RecordedFrame {
            timestamp: i as f64 * 0.03125,
            landmarks: if i == 2 { None } else { Some(face.clone()) },
            audio: Some(vec![0.25, -0.25, 0.5, -0.5]),
        });
    }
    session
}

#[test]
fn test_recording_survives_every_format() {
    let temp = TempDir::new().unwrap();
    let session = sample_session();

    for extension in ["json", "ron", "toml"] {
        let path = temp.path().join(format!("session.{extension}"));
        save_recording(&session, &path).unwrap();
        let loaded = load_recording(&path).unwrap();
        assert_eq!(loaded, session, "extension {extension}");
    }
}

#[test]
fn test_recorded_landmarks_feed_the_engine() {
    let session = sample_session();
    let with_face = session.frames[0].landmarks().unwrap();
    let features = extract_features(&with_face).unwrap();
    assert!((features.mouth_width - 0.25).abs() < 1e-5);

    assert!(session.frames[2].landmarks().is_none());
    assert_eq!(session.frames_with_face(), 3);
}

#[test]
fn test_hand_written_json_recording() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("minimal.json");
    fs::write(
        &path,
        r#"{
            "version": "1.0.0",
            "metadata": { "recorded_at": "2024-05-01T10:00:00Z", "sample_rate": 48000 },
            "frames": [
                { "timestamp": 0.0 },
                { "timestamp": 0.033, "audio": [0.1, 0.2] }
            ]
        }"#,
    )
    .unwrap();

    let session = load_recording(&path).unwrap();
    assert_eq!(session.frames.len(), 2);
    assert!(session.frames[0].landmarks.is_none());
    assert_eq!(session.frames[1].audio.as_deref(), Some(&[0.1f32, 0.2][..]));
    assert!(session.metadata.description.is_none());
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("session.csv");
    let result = save_recording(&sample_session(), &path);
    assert!(matches!(result, Err(IoError::UnsupportedFormat(_))));
}

#[test]
fn test_thresholds_round_trip_in_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("thresholds.json");
    let thresholds = ExerciseThresholds::from_pairs([
        ("puckerProtrusion", 0.006),
        ("puckerNarrow", 0.08),
        ("lateralShift", 0.07),
    ]);

    save_thresholds(&thresholds, &path).unwrap();
    assert_eq!(load_thresholds(&path).unwrap(), thresholds);
}

#[test]
fn test_bundled_thresholds_file() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/thresholds.toml");
    let thresholds = load_thresholds(&path).unwrap();
    assert_eq!(thresholds.pucker_protrusion_min, 0.006);
    assert_eq!(thresholds.pucker_narrow_max, 0.08);
    assert_eq!(thresholds.lateral_shift, 0.07);
    assert_eq!(thresholds.hold_seconds, 3.0);
}
