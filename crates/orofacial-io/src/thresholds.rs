//! Thresholds files
//!
//! A thresholds file is a flat mapping of threshold names to numbers. Missing
//! names keep their defaults, unknown names are ignored, and the result is
//! validated before it is handed to the engine.

use crate::error::Result;
use crate::format::{load_file, save_file};
use orofacial_core::ExerciseThresholds;
use std::path::Path;
use tracing::info;

/// Maximum allowed thresholds file size (1 MB).
pub const MAX_THRESHOLDS_FILE_SIZE: u64 = 1024 * 1024;

/// Load and validate thresholds from a `.json`, `.ron` or `.toml` file.
pub fn load_thresholds(path: &Path) -> Result<ExerciseThresholds> {
    let thresholds: ExerciseThresholds = load_file(path, MAX_THRESHOLDS_FILE_SIZE)?;
    thresholds.validate()?;
    info!("Loaded thresholds from {:?}", path);
    Ok(thresholds)
}

/// Validate and write thresholds; the format follows the extension.
pub fn save_thresholds(thresholds: &ExerciseThresholds, path: &Path) -> Result<()> {
    thresholds.validate()?;
    save_file(thresholds, path)
}
