use orofacial_core::landmarks::{
    CHIN, FACE_MESH_POINTS, LEFT_MOUTH_CORNER, LOWER_INNER_LIP, NOSE_SEPTUM, RIGHT_MOUTH_CORNER,
    UPPER_INNER_LIP,
};
use orofacial_core::{AudioExtractorConfig, AudioFeatureExtractor, ExerciseEngine, Landmark};

const SAMPLE_RATE: usize = 48_000;

fn create_tone(count: usize, amplitude: f32, start: usize) -> Vec<f32> {
    // 220 Hz carrier
    (start..start + count)
        .map(|i| {
            let phase = i as f32 * 2.0 * std::f32::consts::PI * 220.0 / SAMPLE_RATE as f32;
            phase.sin() * amplitude
        })
        .collect()
}

fn relaxed_face() -> Vec<Landmark> {
    let mut points = vec![Landmark::default(); FACE_MESH_POINTS];
    points[NOSE_SEPTUM] = Landmark::new(0.5, 0.4, 0.0);
    points[CHIN] = Landmark::new(0.5, 0.7, 0.0);
    points[LEFT_MOUTH_CORNER] = Landmark::new(0.4, 0.55, 0.0);
    points[RIGHT_MOUTH_CORNER] = Landmark::new(0.6, 0.55, 0.0);
    points[UPPER_INNER_LIP] = Landmark::new(0.5, 0.545, 0.0);
    points[LOWER_INNER_LIP] = Landmark::new(0.5, 0.55, 0.0);
    points
}

/// Drive extractor and engine at `fps` with a tone switched on and off every `half_period` frames
fn run_modulated(fps: usize, half_period: usize, seconds: usize) -> (Vec<Option<f32>>, Vec<bool>) {
    let mut extractor = AudioFeatureExtractor::new(AudioExtractorConfig {
        window_size: SAMPLE_RATE / fps,
        ..Default::default()
    });
    let mut engine = ExerciseEngine::default();
    let face = relaxed_face();
    let hop = SAMPLE_RATE / fps;

    let mut envelopes = Vec::new();
    let mut trills = Vec::new();
    for frame in 0..fps * seconds {
        let t = frame as f64 / fps as f64;
        let amplitude = if (frame / half_period) % 2 == 0 { 0.8 } else { 0.08 };
        extractor.push_samples(&create_tone(hop, amplitude, frame * hop));
        let audio = extractor.analyze(t);
        let snapshot = engine.update(Some(&face), Some(&audio), t);
        envelopes.push(audio.envelope_hz);
        trills.push(snapshot.lip_trill);
    }
    (envelopes, trills)
}

#[test]
fn test_trill_band_modulation_detected() {
    // 120 analyses per second, 3 loud + 3 quiet = 20 Hz
    let (envelopes, trills) = run_modulated(120, 3, 3);

    let estimates: Vec<f32> = envelopes.iter().flatten().copied().collect();
    assert!(estimates.len() > 10, "only {} estimates", estimates.len());
    let last = *estimates.last().unwrap();
    assert!((last - 20.0).abs() < 1.0, "estimated {} Hz", last);

    assert!(trills.iter().filter(|&&t| t).count() > 10);
    // Trill is only reported on frames that carry an estimate
    for (hz, trill) in envelopes.iter().zip(&trills) {
        if *trill {
            assert!(hz.is_some());
        }
    }
}

#[test]
fn test_slow_modulation_is_not_a_trill() {
    // 120 analyses per second, 12 loud + 12 quiet = 5 Hz
    let (envelopes, trills) = run_modulated(120, 12, 3);

    let last = envelopes.iter().flatten().last().copied().expect("no estimate");
    assert!((last - 5.0).abs() < 0.5, "estimated {} Hz", last);
    assert!(trills.iter().all(|&t| !t));
}

#[test]
fn test_steady_tone_has_no_envelope_rate() {
    let mut extractor = AudioFeatureExtractor::default();
    let hop = SAMPLE_RATE / 30;
    for frame in 0..90 {
        extractor.push_samples(&create_tone(hop, 0.5, frame * hop));
        let features = extractor.analyze(frame as f64 / 30.0);
        assert!(features.envelope_hz.is_none());
        assert!(features.transient_db < 9.0);
    }
    let loudness = extractor.latest().unwrap().loudness_db;
    // RMS of a 0.5 sine is about -9 dB
    assert!((loudness + 9.0).abs() < 0.5, "loudness {}", loudness);
}

#[test]
fn test_pop_after_quiet_is_transient() {
    let mut extractor = AudioFeatureExtractor::default();
    let hop = SAMPLE_RATE / 30;
    for frame in 0..60 {
        let quiet = create_tone(2048, 0.01, frame * hop);
        let f = extractor.process_window(&quiet, frame as f64 / 30.0);
        assert!(f.transient_db < 9.0);
    }
    let pop = extractor.process_window(&create_tone(2048, 0.6, 0), 2.0);
    assert!(pop.transient_db > 9.0, "transient {}", pop.transient_db);
}
