//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

use crate::domain::model::MAX_FPS;

/// Highest thread count accepted on the command line
pub const MAX_THREADS: usize = 64;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input video file path, or `-` to read the clip from stdin
    #[arg(short, long)]
    pub input: String,

    /// Start time (seconds, MM:SS.ms or HH:MM:SS.ms)
    #[arg(short, long)]
    pub start: String,

    /// End time (seconds, MM:SS.ms or HH:MM:SS.ms)
    #[arg(short, long)]
    pub end: String,

    /// Pixels removed from the top edge
    #[arg(long, default_value_t = 0)]
    pub top: u32,

    /// Pixels removed from the bottom edge
    #[arg(long, default_value_t = 0)]
    pub bottom: u32,

    /// Uniform scale factor in (0, 1]
    #[arg(long, conflicts_with = "width")]
    pub scale: Option<f64>,

    /// Output width in pixels; height follows the aspect ratio
    #[arg(long)]
    pub width: Option<u32>,

    /// Playback speed factor (2 plays twice as fast)
    #[arg(long)]
    pub speed: Option<f64>,

    /// GIF frame rate
    #[arg(long, value_parser = parse_fps)]
    pub fps: Option<u32>,

    /// Output file path (default: converted.gif)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace the output file if it exists
    #[arg(long)]
    pub overwrite: bool,

    /// Print a JSON report instead of a summary line
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

pub fn parse_fps(s: &str) -> Result<u32, String> {
    number_range(s, 1, MAX_FPS)
}

pub fn parse_threads(s: &str) -> Result<usize, String> {
    number_range(s, 1, MAX_THREADS)
}
