//! GifClip video to GIF converter
//!
//! Turns a short video clip into an endlessly looping animated GIF. The
//! clip is trimmed, cropped, scaled and re-timed in that order, and the
//! encoding itself is delegated to an external ffmpeg.
//!
//! The crate follows a ports-and-adapters layout: `domain` holds the pure
//! types and rules, `ports` the contracts, `adapters` the ffmpeg, ffprobe
//! and filesystem implementations, and `app` the interactors wiring them.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{ConvertInteractor, ProbeInteractor};
pub use domain::errors::DomainError;
pub use domain::model::{OutputArtifact, ScalePolicy, SourceMedia, TimeSpec, TransformRequest};
pub use error::{AppError, AppResult};
pub use ports::SourceInput;
