//! Utility modules for GifClip

pub mod logging;
