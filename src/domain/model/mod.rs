// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::errors::DomainError;

/// MIME type of every produced artifact
pub const GIF_MIME_TYPE: &str = "image/gif";

/// File name used when the caller does not choose one
pub const DEFAULT_OUTPUT_FILE: &str = "converted.gif";

/// Highest GIF frame rate accepted
pub const MAX_FPS: u32 = 50;

/// Container formats accepted as input
pub const SUPPORTED_CONTAINERS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm"];

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;

/// Format a byte count as Bytes, KB or MB using 1024-based thresholds
pub fn format_size(bytes: u64) -> String {
    let value = bytes as f64;
    if value < KIB {
        format!("{} Bytes", bytes)
    } else if value < MIB {
        format!("{:.2} KB", value / KIB)
    } else {
        format!("{:.2} MB", value / MIB)
    }
}

/// Check whether a file extension names an accepted container
pub fn is_supported_container(extension: &str) -> bool {
    let lowered = extension.to_ascii_lowercase();
    SUPPORTED_CONTAINERS.contains(&lowered.as_str())
}

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse time string in various formats
    ///
    /// Accepts plain seconds (`12.5`), `MM:SS.ms` and `HH:MM:SS.ms`.
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() {
                return Err(DomainError::validation("Time must be a finite number"));
            }
            if seconds < 0.0 {
                return Err(DomainError::validation("Time cannot be negative"));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        match parts.as_slice() {
            [minutes, seconds] => {
                let minutes = parse_component(minutes, "minutes")?;
                let seconds = parse_seconds(seconds)?;
                Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds))
            }
            [hours, minutes, seconds] => {
                let hours = parse_component(hours, "hours")?;
                let minutes = parse_component(minutes, "minutes")?;
                if minutes >= 60 {
                    return Err(DomainError::validation("Minutes must be less than 60"));
                }
                let seconds = parse_seconds(seconds)?;
                Ok(Self::from_seconds(
                    hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
                ))
            }
            _ => Err(DomainError::validation(format!(
                "Invalid time format '{}'. Supported formats: seconds (e.g., 12.5), MM:SS.ms (e.g., 2:30.5), HH:MM:SS.ms (e.g., 1:02:30.5)",
                trimmed
            ))),
        }
    }

    /// Format as HH:MM:SS.ms
    pub fn format_hms(&self) -> String {
        let total_millis = (self.seconds.max(0.0) * 1000.0).round() as u64;
        let hours = total_millis / 3_600_000;
        let minutes = (total_millis % 3_600_000) / 60_000;
        let seconds = (total_millis % 60_000) / 1000;
        let milliseconds = total_millis % 1000;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

fn parse_component(part: &str, name: &str) -> Result<u32, DomainError> {
    part.trim()
        .parse::<u32>()
        .map_err(|_| DomainError::validation(format!("Invalid {} format", name)))
}

fn parse_seconds(part: &str) -> Result<f64, DomainError> {
    let seconds = part
        .trim()
        .parse::<f64>()
        .map_err(|_| DomainError::validation("Invalid seconds format"))?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(DomainError::validation("Seconds must be less than 60"));
    }
    Ok(seconds)
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A probed source clip
///
/// `path` points at the staged copy inside the request workspace, so the
/// handle lives exactly as long as that workspace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceMedia {
    pub path: PathBuf,
    pub container: String,
    pub duration: TimeSpec,
    pub dimensions: Dimensions,
}

impl SourceMedia {
    /// Create new source media with validation
    pub fn new(
        path: impl Into<PathBuf>,
        container: impl Into<String>,
        duration: TimeSpec,
        dimensions: Dimensions,
    ) -> Result<Self, DomainError> {
        if !duration.seconds.is_finite() || duration.seconds < 0.0 {
            return Err(DomainError::validation(
                "Source duration must be a non-negative number of seconds",
            ));
        }
        if dimensions.width == 0 || dimensions.height == 0 {
            return Err(DomainError::validation("Video dimensions cannot be zero"));
        }

        Ok(Self {
            path: path.into(),
            container: container.into(),
            duration,
            dimensions,
        })
    }
}

/// Rows removed from the top and bottom of every frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CropMargins {
    pub top: u32,
    pub bottom: u32,
}

impl CropMargins {
    pub fn new(top: u32, bottom: u32) -> Self {
        Self { top, bottom }
    }

    /// Height left after cropping, or None when nothing would remain
    pub fn remaining_height(&self, height: u32) -> Option<u32> {
        let removed = self.top as u64 + self.bottom as u64;
        if removed >= height as u64 {
            None
        } else {
            Some(height - self.top - self.bottom)
        }
    }
}

/// How the cropped frame is resized
///
/// One policy drives both axes: either a uniform factor or an absolute
/// width with the height following proportionally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ScalePolicy {
    Factor(f64),
    Width(u32),
}

impl Default for ScalePolicy {
    fn default() -> Self {
        ScalePolicy::Factor(1.0)
    }
}

impl ScalePolicy {
    /// Apply the policy to a frame size; each axis is rounded and kept at least 1px
    pub fn apply(&self, frame: Dimensions) -> Dimensions {
        match *self {
            ScalePolicy::Factor(factor) => Dimensions::new(
                scale_axis(frame.width as f64 * factor),
                scale_axis(frame.height as f64 * factor),
            ),
            ScalePolicy::Width(width) => {
                let ratio = width as f64 / frame.width as f64;
                Dimensions::new(width.max(1), scale_axis(frame.height as f64 * ratio))
            }
        }
    }
}

fn scale_axis(value: f64) -> u32 {
    (value.round() as u32).max(1)
}

impl fmt::Display for ScalePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalePolicy::Factor(factor) => write!(f, "x{}", factor),
            ScalePolicy::Width(width) => write!(f, "{}px wide", width),
        }
    }
}

/// User-chosen conversion parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformRequest {
    pub start: TimeSpec,
    pub end: TimeSpec,
    pub crop: CropMargins,
    pub scale: ScalePolicy,
    pub speed: f64,
    pub fps: u32,
}

impl TransformRequest {
    /// Default frame rate of the produced GIF
    pub const DEFAULT_FPS: u32 = 10;

    /// Create a request for a time range with neutral crop, scale and speed
    pub fn new(start: TimeSpec, end: TimeSpec) -> Self {
        Self {
            start,
            end,
            crop: CropMargins::default(),
            scale: ScalePolicy::default(),
            speed: 1.0,
            fps: Self::DEFAULT_FPS,
        }
    }

    pub fn with_crop(mut self, top: u32, bottom: u32) -> Self {
        self.crop = CropMargins::new(top, bottom);
        self
    }

    pub fn with_scale(mut self, scale: ScalePolicy) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Length of the trimmed range before the speed factor
    pub fn clip_length(&self) -> f64 {
        self.end.seconds - self.start.seconds
    }
}

/// Pixel rectangle kept from every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Fully resolved request handed to the transcoding engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformPlan {
    pub source: PathBuf,
    pub source_dimensions: Dimensions,
    pub start: TimeSpec,
    pub end: TimeSpec,
    pub crop: CropRect,
    pub output: Dimensions,
    pub speed: f64,
    pub fps: u32,
    pub loop_forever: bool,
}

impl TransformPlan {
    /// Length of the trimmed clip in source time
    pub fn clip_length(&self) -> f64 {
        self.end.seconds - self.start.seconds
    }

    /// Playback length of the produced animation
    pub fn target_duration(&self) -> f64 {
        self.clip_length() / self.speed
    }

    /// True when the crop keeps the whole frame
    pub fn keeps_full_frame(&self) -> bool {
        self.crop.y == 0
            && self.crop.width == self.source_dimensions.width
            && self.crop.height == self.source_dimensions.height
    }

    /// True when no resize is needed after cropping
    pub fn keeps_cropped_size(&self) -> bool {
        self.output.width == self.crop.width && self.output.height == self.crop.height
    }
}

/// The produced animated image, held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct OutputArtifact {
    pub bytes: Vec<u8>,
    pub dimensions: Dimensions,
    pub target_duration: f64,
    pub fps: u32,
}

impl OutputArtifact {
    pub fn new(bytes: Vec<u8>, plan: &TransformPlan) -> Self {
        Self {
            bytes,
            dimensions: plan.output,
            target_duration: plan.target_duration(),
            fps: plan.fps,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Human-readable size
    pub fn size_string(&self) -> String {
        format_size(self.size())
    }

    pub fn mime_type(&self) -> &'static str {
        GIF_MIME_TYPE
    }
}
