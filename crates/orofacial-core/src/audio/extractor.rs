//! Envelope-based audio feature extractor
//!
//! Tracks the RMS loudness of the latest analysis window with a fast and a
//! slow exponential filter. Their difference measures onsets; low→high
//! crossings of the fast envelope, with hysteresis around the slow baseline,
//! mark envelope peaks whose spacing gives the modulation frequency.

use super::AudioFeatures;
use crate::filters::Ema;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Additive guard inside logarithms.
pub const AUDIO_EPSILON: f32 = 1e-8;

/// Configuration for [`AudioFeatureExtractor`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioExtractorConfig {
    /// Analysis window length in samples
    pub window_size: usize,
    /// Smoothing coefficient of the fast envelope
    pub fast_alpha: f32,
    /// Smoothing coefficient of the slow baseline
    pub slow_alpha: f32,
    /// Envelope counts as high above `high_ratio * baseline`
    pub high_ratio: f32,
    /// Envelope counts as low below `low_ratio * baseline`
    pub low_ratio: f32,
    /// Peaks older than this many seconds are forgotten
    pub peak_window_secs: f64,
}

impl Default for AudioExtractorConfig {
    fn default() -> Self {
        Self {
            window_size: 2048,
            fast_alpha: 0.4,
            slow_alpha: 0.05,
            high_ratio: 1.15,
            low_ratio: 1.02,
            peak_window_secs: 2.0,
        }
    }
}

/// Stateful per-frame audio feature extractor
///
/// One instance per audio source, driven continuously. Gaps longer than the
/// peak window let old peaks age out, which restarts periodicity detection.
#[derive(Debug, Clone)]
pub struct AudioFeatureExtractor {
    config: AudioExtractorConfig,

    /// Latest samples, written as a ring
    input_buffer: Vec<f32>,
    buffer_write_pos: usize,

    fast: Ema,
    slow: Ema,

    /// Hysteresis state of the fast envelope
    envelope_high: bool,
    /// Timestamps of low→high envelope crossings
    peak_timestamps: VecDeque<f64>,

    latest: Option<AudioFeatures>,
    frames_analyzed: u64,
}

impl Default for AudioFeatureExtractor {
    fn default() -> Self {
        Self::new(AudioExtractorConfig::default())
    }
}

impl AudioFeatureExtractor {
    /// Create an extractor with the given configuration
    pub fn new(config: AudioExtractorConfig) -> Self {
        let window_size = config.window_size.max(1);

        debug!(
            "AudioFeatureExtractor created: window={}, fast_alpha={}, slow_alpha={}",
            window_size, config.fast_alpha, config.slow_alpha
        );

        Self {
            fast: Ema::new(config.fast_alpha),
            slow: Ema::new(config.slow_alpha),
            input_buffer: vec![0.0; window_size],
            buffer_write_pos: 0,
            envelope_high: false,
            peak_timestamps: VecDeque::with_capacity(64),
            latest: None,
            frames_analyzed: 0,
            config,
        }
    }

    /// Append raw samples to the analysis window, overwriting the oldest ones.
    ///
    /// Non-finite samples are stored as silence.
    pub fn push_samples(&mut self, samples: &[f32]) {
        let len = self.input_buffer.len();
        for &sample in samples {
            self.input_buffer[self.buffer_write_pos] = if sample.is_finite() {
                sample
            } else {
                0.0
            };
            self.buffer_write_pos = (self.buffer_write_pos + 1) % len;
        }
    }

    /// Analyze the current window (filled by [`Self::push_samples`]) for the frame at `timestamp`
    pub fn analyze(&mut self, timestamp: f64) -> AudioFeatures {
        let rms = Self::calculate_rms(&self.input_buffer);
        self.update(rms, timestamp)
    }

    /// Analyze an explicit waveform buffer for the frame at `timestamp`, bypassing the ring
    pub fn process_window(&mut self, samples: &[f32], timestamp: f64) -> AudioFeatures {
        let rms = Self::calculate_rms(samples);
        self.update(rms, timestamp)
    }

    /// Most recent features, `None` before the first analysis
    pub fn latest(&self) -> Option<AudioFeatures> {
        self.latest
    }

    /// Number of frames analyzed so far
    pub fn frames_analyzed(&self) -> u64 {
        self.frames_analyzed
    }

    /// Configuration in use
    pub fn config(&self) -> &AudioExtractorConfig {
        &self.config
    }

    /// RMS of a buffer, with non-finite samples counted as silence
    fn calculate_rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum: f32 = samples
            .iter()
            .map(|&s| if s.is_finite() { s * s } else { 0.0 })
            .sum();
        (sum / samples.len() as f32).sqrt()
    }

    fn update(&mut self, rms: f32, timestamp: f64) -> AudioFeatures {
        self.frames_analyzed += 1;

        let loudness_db = to_db(rms);

        let fast = self.fast.update(rms);
        let slow = self.slow.update(rms);

        let transient = (fast - slow).max(0.0);
        let transient_db = to_db(transient) - to_db(slow);

        let envelope_hz = self.track_envelope_peaks(fast, slow, timestamp);

        if self.frames_analyzed % 300 == 0 {
            trace!(
                "Audio frame #{}: loudness={:.1}dB transient={:.1}dB peaks={}",
                self.frames_analyzed,
                loudness_db,
                transient_db,
                self.peak_timestamps.len()
            );
        }

        let features = AudioFeatures {
            loudness_db,
            transient_db,
            envelope_hz,
        };
        self.latest = Some(features);
        features
    }

    /// Update the hysteresis state; on a low→high crossing record a peak and estimate the rate
    fn track_envelope_peaks(&mut self, fast: f32, slow: f32, timestamp: f64) -> Option<f32> {
        let was_high = self.envelope_high;
        let is_high = if fast > slow * self.config.high_ratio {
            true
        } else if fast < slow * self.config.low_ratio {
            false
        } else {
            was_high
        };
        self.envelope_high = is_high;

        while let Some(&oldest) = self.peak_timestamps.front() {
            if timestamp - oldest > self.config.peak_window_secs {
                self.peak_timestamps.pop_front();
            } else {
                break;
            }
        }

        if was_high || !is_high {
            return None;
        }

        self.peak_timestamps.push_back(timestamp);
        self.estimate_envelope_hz()
    }

    /// Modulation rate from the mean spacing of the remembered peaks
    fn estimate_envelope_hz(&self) -> Option<f32> {
        if self.peak_timestamps.len() < 2 {
            return None;
        }

        let intervals: Vec<f64> = self
            .peak_timestamps
            .iter()
            .zip(self.peak_timestamps.iter().skip(1))
            .map(|(a, b)| b - a)
            .collect();

        let avg_period = intervals.iter().sum::<f64>() / intervals.len() as f64;
        Some((1.0 / avg_period.max(1e-6)) as f32)
    }
}

fn to_db(amplitude: f32) -> f32 {
    20.0 * (amplitude + AUDIO_EPSILON).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_calculation() {
        // Sine wave at 0.5 amplitude should give RMS of ~0.35
        let samples: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.1).sin() * 0.5).collect();
        let rms = AudioFeatureExtractor::calculate_rms(&samples);
        assert!(rms > 0.3 && rms < 0.4, "RMS was {}", rms);
    }

    #[test]
    fn test_silence_loudness() {
        let mut extractor = AudioFeatureExtractor::default();
        let features = extractor.process_window(&[0.0; 2048], 0.0);
        assert!((features.loudness_db + 160.0).abs() < 0.01);
        assert_eq!(features.envelope_hz, None);
    }

    #[test]
    fn test_full_scale_loudness() {
        let mut extractor = AudioFeatureExtractor::default();
        let features = extractor.process_window(&[1.0; 2048], 0.0);
        assert!(features.loudness_db.abs() < 0.01);
        // Both envelopes cold-start on the same value
        assert!(features.transient_db < -100.0);
    }

    #[test]
    fn test_ring_buffer_keeps_latest_window() {
        let mut extractor = AudioFeatureExtractor::new(AudioExtractorConfig {
            window_size: 1024,
            ..Default::default()
        });

        extractor.push_samples(&vec![0.0; 1024]);
        extractor.push_samples(&vec![0.5; 1024]);
        let loud = extractor.analyze(0.0);
        assert!((loud.loudness_db - to_db(0.5)).abs() < 0.01);

        // Half the window replaced with silence
        extractor.push_samples(&vec![0.0; 512]);
        let half = extractor.analyze(0.033);
        let expected = to_db((0.25f32 * 0.5).sqrt());
        assert!((half.loudness_db - expected).abs() < 0.01);
    }

    #[test]
    fn test_bad_samples_count_as_silence() {
        let mut extractor = AudioFeatureExtractor::new(AudioExtractorConfig {
            window_size: 4,
            ..Default::default()
        });
        extractor.push_samples(&[f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 0.0]);
        let features = extractor.analyze(0.0);
        assert!(features.loudness_db.is_finite());
        assert!(features.transient_db.is_finite());
        assert!((features.loudness_db + 160.0).abs() < 0.01);
    }

    #[test]
    fn test_transient_after_silence() {
        let mut extractor = AudioFeatureExtractor::default();
        let silence = vec![0.0f32; 2048];
        for i in 0..30 {
            let f = extractor.process_window(&silence, i as f64 / 30.0);
            assert!(f.transient_db < 9.0);
        }

        let pop = vec![0.5f32; 2048];
        let features = extractor.process_window(&pop, 1.0);
        // fast = 0.4 * rms, slow = 0.05 * rms: the rise is seven times the baseline
        assert!(
            features.transient_db > 9.0,
            "transient was {}",
            features.transient_db
        );
        assert!((features.transient_db - 16.9).abs() < 0.2);
    }

    fn modulated_frame(frame: usize, half_period: usize) -> Vec<f32> {
        let level = if (frame / half_period) % 2 == 0 { 1.0 } else { 0.1 };
        vec![level; 256]
    }

    #[test]
    fn test_envelope_frequency_estimate() {
        let mut extractor = AudioFeatureExtractor::default();
        let mut last_estimate = None;

        // 60 analyses per second, 3 loud + 3 quiet frames = 10 Hz modulation
        for frame in 0..240 {
            let t = frame as f64 / 60.0;
            let features = extractor.process_window(&modulated_frame(frame, 3), t);
            if let Some(hz) = features.envelope_hz {
                last_estimate = Some(hz);
            }
        }

        let hz = last_estimate.expect("no envelope estimate");
        assert!((hz - 10.0).abs() < 0.5, "estimated {} Hz", hz);
    }

    #[test]
    fn test_single_peak_has_no_estimate() {
        let mut extractor = AudioFeatureExtractor::default();
        extractor.process_window(&[0.01; 256], 0.0);
        let features = extractor.process_window(&[1.0; 256], 0.016);
        assert_eq!(features.envelope_hz, None);
        assert_eq!(extractor.peak_timestamps.len(), 1);
    }

    #[test]
    fn test_peaks_age_out_after_gap() {
        let mut extractor = AudioFeatureExtractor::default();
        let mut frame = 0;

        for _ in 0..60 {
            extractor.process_window(&modulated_frame(frame, 3), frame as f64 / 60.0);
            frame += 1;
        }
        assert!(extractor.peak_timestamps.len() >= 2);

        for _ in 0..180 {
            extractor.process_window(&[0.0; 256], frame as f64 / 60.0);
            frame += 1;
        }

        // First loud frame after three seconds of silence
        let resumed = extractor.process_window(&[1.0; 256], frame as f64 / 60.0);
        assert_eq!(resumed.envelope_hz, None);
        assert_eq!(extractor.peak_timestamps.len(), 1);
    }

    #[test]
    fn test_latest_and_counter() {
        let mut extractor = AudioFeatureExtractor::default();
        assert!(extractor.latest().is_none());
        let f = extractor.process_window(&[0.2; 64], 0.0);
        assert_eq!(extractor.latest(), Some(f));
        assert_eq!(extractor.frames_analyzed(), 1);
    }
}
