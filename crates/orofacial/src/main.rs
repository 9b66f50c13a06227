//! Orofacial - recorded session replay
//!
//! Runs a recorded session through the exercise engine and prints one JSON
//! detection record per frame on stdout. Logs go to stderr and, optionally,
//! to a file.

#![warn(missing_docs)]

mod cli;
mod logging_setup;
mod replay;

use anyhow::{Context, Result};
use clap::Parser;
use cli::ReplayArgs;
use orofacial_core::{Exercise, ExerciseThresholds, LogConfig};
use orofacial_io::{load_recording, load_thresholds};
use replay::Replayer;
use std::io::{self, BufWriter};
use tracing::info;

fn log_config(args: &ReplayArgs) -> LogConfig {
    let mut config = LogConfig {
        level: args.log_level.clone(),
        ..LogConfig::default()
    };
    if let Some(dir) = &args.log_dir {
        config.file_output = true;
        config.log_dir = dir.clone();
        config.file_name = format!(
            "orofacial_{}",
            chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
        );
    }
    config
}

fn run(args: ReplayArgs) -> Result<()> {
    let thresholds = match &args.thresholds {
        Some(path) => load_thresholds(path)
            .with_context(|| format!("Failed to load thresholds from {:?}", path))?,
        None => ExerciseThresholds::default(),
    };

    let session = load_recording(&args.recording)
        .with_context(|| format!("Failed to load recording {:?}", args.recording))?;
    info!(
        "Replaying {:?}: {} frames, {:.1}s, recorded {}",
        args.recording,
        session.frames.len(),
        session.duration(),
        session.metadata.recorded_at
    );

    let mut replayer = Replayer::new(thresholds);
    if args.summary_only {
        replayer = replayer.summary_only();
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = replayer.run(&session, &mut out)?;

    for exercise in Exercise::ALL {
        info!(
            "{:<18} completed {} time(s)",
            exercise.as_str(),
            summary.completions_of(exercise)
        );
    }
    Ok(())
}

/// The main entry point for the application.
fn main() -> Result<()> {
    let args = ReplayArgs::parse();

    let _log_guard = logging_setup::init(&log_config(&args))?;
    info!("=== Orofacial replay started ===");

    run(args)
}
