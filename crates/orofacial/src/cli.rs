//! Command line arguments

use clap::Parser;
use std::path::PathBuf;

/// Replay a recorded session through the orofacial exercise engine
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "orofacial", version, about)]
pub struct ReplayArgs {
    /// Recording file (.json, .ron or .toml)
    pub recording: PathBuf,

    /// Thresholds file (.json, .ron or .toml)
    #[arg(short, long, value_name = "FILE")]
    pub thresholds: Option<PathBuf>,

    /// trace, debug, info, warn or error
    #[arg(short, long, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    /// Also write logs to a file in DIR
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Do not print per-frame detection records
    #[arg(long)]
    pub summary_only: bool,
}
