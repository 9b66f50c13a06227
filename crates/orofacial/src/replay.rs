//! Offline replay of recorded sessions
//!
//! Feeds every recorded frame through the audio extractor and the exercise
//! engine in capture order, the same way a live capture loop would, and
//! writes one JSON detection record per frame.

use anyhow::{Context, Result};
use orofacial_core::{
    AudioExtractorConfig, AudioFeatureExtractor, DetectionRecord, Exercise, ExerciseEngine,
    ExerciseThresholds, FrameRateMeter,
};
use orofacial_io::RecordedSession;
use std::collections::HashMap;
use std::io::Write;
use tracing::{debug, info, warn};

/// What happened during a replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    /// Frames replayed
    pub frames: usize,
    /// Frames without a usable face
    pub frames_without_face: usize,
    /// Smoothed frame rate at the end of the session
    pub fps: Option<f64>,
    /// Times each exercise went from not completed to completed
    pub completions: HashMap<Exercise, usize>,
}

impl ReplaySummary {
    /// Completion count for one exercise
    pub fn completions_of(&self, exercise: Exercise) -> usize {
        self.completions.get(&exercise).copied().unwrap_or(0)
    }
}

/// Replays a recording through a fresh extractor and engine
pub struct Replayer {
    extractor: AudioFeatureExtractor,
    engine: ExerciseEngine,
    frame_rate: FrameRateMeter,
    emit_records: bool,
}

impl Replayer {
    /// Create a replayer with the given thresholds
    pub fn new(thresholds: ExerciseThresholds) -> Self {
        Self {
            extractor: AudioFeatureExtractor::new(AudioExtractorConfig::default()),
            engine: ExerciseEngine::new(thresholds),
            frame_rate: FrameRateMeter::default(),
            emit_records: true,
        }
    }

    /// Only collect the summary, write no records
    pub fn summary_only(mut self) -> Self {
        self.emit_records = false;
        self
    }

    /// Replay every frame, writing JSON lines to `out`
    pub fn run<W: Write>(
        &mut self,
        session: &RecordedSession,
        out: &mut W,
    ) -> Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();
        let Some(session_start) = session.frames.first().map(|f| f.timestamp) else {
            warn!("Recording has no frames");
            return Ok(summary);
        };

        let skipped_before = self.engine.frames_skipped();
        let mut previously_completed: Vec<Exercise> = Vec::new();

        for (index, frame) in session.frames.iter().enumerate() {
            let timestamp = frame.timestamp;

            let audio = frame.audio.as_deref().map(|samples| {
                self.extractor.push_samples(samples);
                self.extractor.analyze(timestamp)
            });

            let landmarks = frame.landmarks();
            let snapshot = self
                .engine
                .update(landmarks.as_deref(), audio.as_ref(), timestamp);

            let completed = snapshot.completed();
            for exercise in &completed {
                if !previously_completed.contains(exercise) {
                    *summary.completions.entry(*exercise).or_insert(0) += 1;
                    debug!("Frame {}: {} completed", index, exercise);
                }
            }
            previously_completed = completed;

            self.frame_rate.tick(timestamp);
            summary.frames += 1;

            if self.emit_records {
                let record = DetectionRecord::new(session_start, timestamp, snapshot, audio);
                serde_json::to_writer(&mut *out, &record)
                    .with_context(|| format!("Failed to write record for frame {}", index))?;
                writeln!(out)?;
            }
        }

        summary.frames_without_face = (self.engine.frames_skipped() - skipped_before) as usize;
        summary.fps = self.frame_rate.fps();
        out.flush()?;

        info!(
            "Replayed {} frames ({} without a usable face), {:.1} fps",
            summary.frames,
            summary.frames_without_face,
            summary.fps.unwrap_or(0.0)
        );
        Ok(summary)
    }
}
