//! CLI module for GifClip
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

pub use args::{ConvertArgs, ProbeArgs};

/// GifClip video to GIF converter
///
/// Trims, crops, scales and re-times a short video clip, then encodes it
/// as an endlessly looping animated GIF with an external ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "gifclip")]
#[command(about = "GifClip - Turn a video clip into a looping GIF")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (TOML or YAML); defaults to ./gifclip.toml if present
    #[arg(long, global = true, env = "GIFCLIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "GIFCLIP_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true, env = "GIFCLIP_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Path to the ffmpeg binary
    #[arg(long, global = true, env = "GIFCLIP_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe binary
    #[arg(long, global = true, env = "GIFCLIP_FFPROBE")]
    pub ffprobe: Option<PathBuf>,

    /// Encoder threads
    #[arg(long, global = true, env = "GIFCLIP_THREADS", value_parser = args::parse_threads)]
    pub threads: Option<usize>,

    /// Directory for per-request workspaces
    #[arg(long, global = true, env = "GIFCLIP_TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a clip into a looping GIF
    Convert(args::ConvertArgs),
    /// Show duration, frame size and container of a clip
    Probe(args::ProbeArgs),
}
