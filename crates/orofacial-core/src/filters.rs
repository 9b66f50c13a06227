//! Temporal filters shared by the feature extractors and the engine
//!
//! One instance tracks one quantity. State lives inside the instance and is
//! never shared; a fresh filter is obtained by constructing a new one.

use serde::{Deserialize, Serialize};

/// Lower bound for time steps, in seconds.
pub const MIN_DT: f64 = 1e-6;

/// Exponential moving average with a cold start
///
/// The first sample becomes the value directly; later samples are blended
/// as `alpha * x + (1 - alpha) * value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ema {
    alpha: f32,
    value: Option<f32>,
}

impl Ema {
    /// Create a filter with a fixed smoothing coefficient (higher = faster)
    pub const fn new(alpha: f32) -> Self {
        Self { alpha, value: None }
    }

    /// Feed a sample and return the smoothed value
    pub fn update(&mut self, x: f32) -> f32 {
        let next = match self.value {
            None => x,
            Some(v) => self.alpha * x + (1.0 - self.alpha) * v,
        };
        self.value = Some(next);
        next
    }

    /// Current smoothed value, `None` before the first sample
    pub fn value(&self) -> Option<f32> {
        self.value
    }

    /// Smoothing coefficient
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// Finite-difference derivative over wall-clock time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Derivative {
    prev: Option<(f32, f64)>,
}

impl Derivative {
    /// Create a derivative with no history
    pub const fn new() -> Self {
        Self { prev: None }
    }

    /// Feed a sample taken at `timestamp` seconds and return the rate of change per second.
    ///
    /// Returns 0 for the very first sample.
    pub fn update(&mut self, x: f32, timestamp: f64) -> f32 {
        let rate = match self.prev {
            None => 0.0,
            Some((prev_x, prev_t)) => {
                let dt = (timestamp - prev_t).max(MIN_DT);
                ((x - prev_x) as f64 / dt) as f32
            }
        };
        self.prev = Some((x, timestamp));
        rate
    }
}

/// Smoothed frame rate estimate from successive frame timestamps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRateMeter {
    last_timestamp: Option<f64>,
    fps: Option<f64>,
    alpha: f64,
}

impl Default for FrameRateMeter {
    fn default() -> Self {
        Self::new(0.2)
    }
}

impl FrameRateMeter {
    /// Create a meter with the given smoothing coefficient
    pub const fn new(alpha: f64) -> Self {
        Self {
            last_timestamp: None,
            fps: None,
            alpha,
        }
    }

    /// Register a frame and return the smoothed rate, if at least two frames were seen
    pub fn tick(&mut self, timestamp: f64) -> Option<f64> {
        if let Some(last) = self.last_timestamp {
            let instant = 1.0 / (timestamp - last).max(MIN_DT);
            self.fps = Some(match self.fps {
                None => instant,
                Some(fps) => self.alpha * instant + (1.0 - self.alpha) * fps,
            });
        }
        self.last_timestamp = Some(timestamp);
        self.fps
    }

    /// Latest smoothed rate
    pub fn fps(&self) -> Option<f64> {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_cold_start() {
        let mut ema = Ema::new(0.1);
        assert_eq!(ema.value(), None);
        assert_eq!(ema.update(100.0), 100.0);
        let v = ema.update(200.0);
        assert!((v - 110.0).abs() < 1e-4);
        assert_eq!(ema.value(), Some(v));
    }

    #[test]
    fn test_ema_converges() {
        let mut ema = Ema::new(0.4);
        ema.update(0.0);
        for _ in 0..100 {
            ema.update(1.0);
        }
        assert!((ema.value().unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_derivative_first_sample_is_zero() {
        let mut d = Derivative::new();
        assert_eq!(d.update(5.0, 1.0), 0.0);
        let rate = d.update(6.0, 1.5);
        assert!((rate - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_derivative_duplicate_timestamp_is_finite() {
        let mut d = Derivative::new();
        d.update(0.0, 2.0);
        let rate = d.update(1e-6, 2.0);
        assert!(rate.is_finite());
        assert!((rate - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_frame_rate_meter() {
        let mut meter = FrameRateMeter::default();
        assert_eq!(meter.tick(0.0), None);
        for i in 1..=60 {
            meter.tick(i as f64 / 30.0);
        }
        let fps = meter.fps().unwrap();
        assert!((fps - 30.0).abs() < 0.01, "fps = {}", fps);
    }
}
