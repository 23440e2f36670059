//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` as a child process and reads its JSON report.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    binary: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    tags: Option<ProbeTags>,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProbeTags {
    rotate: Option<String>,
}

impl ProbeStream {
    /// Display rotation in degrees, normalized to 0..360
    ///
    /// The display matrix wins over the legacy `rotate` tag.
    fn rotation(&self) -> i64 {
        let degrees = self
            .side_data_list
            .iter()
            .find_map(|side_data| side_data.rotation)
            .or_else(|| {
                self.tags
                    .as_ref()
                    .and_then(|tags| tags.rotate.as_deref())
                    .and_then(|rotate| rotate.trim().parse::<f64>().ok())
            })
            .unwrap_or(0.0);
        (degrees.round() as i64).rem_euclid(360)
    }
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Turn an ffprobe JSON report into source media
    pub fn parse_report(file_path: &Path, json: &[u8]) -> Result<SourceMedia, DomainError> {
        let report: ProbeReport = serde_json::from_slice(json).map_err(|e| {
            DomainError::transcode(format!("failed to parse ffprobe output: {}", e))
        })?;

        let video = report
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "'{}' contains no video stream",
                    file_path.display()
                ))
            })?;

        // ffmpeg auto-rotates before filtering, so report the displayed frame
        let quarter_turn = matches!(video.rotation(), 90 | 270);
        let (width, height) = match (video.width, video.height) {
            (Some(w), Some(h)) if quarter_turn => (h, w),
            (Some(w), Some(h)) => (w, h),
            _ => {
                return Err(DomainError::validation(
                    "could not read the video frame size",
                ))
            }
        };

        // Stream duration first, container duration as fallback
        let duration = video
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok())
            .or_else(|| {
                report
                    .format
                    .as_ref()
                    .and_then(|f| f.duration.as_deref())
                    .and_then(|d| d.parse::<f64>().ok())
            })
            .ok_or_else(|| DomainError::validation("could not determine media duration"))?;

        let container = report
            .format
            .as_ref()
            .and_then(|f| f.format_name.as_deref())
            .and_then(|name| name.split(',').next())
            .unwrap_or("unknown")
            .to_string();

        SourceMedia::new(
            file_path,
            container,
            TimeSpec::from_seconds(duration),
            Dimensions::new(width, height),
        )
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_media(&self, file_path: &Path) -> Result<SourceMedia, DomainError> {
        debug!("Probing {}", file_path.display());

        let output = Command::new(&self.binary)
            .args(["-v", "error", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(file_path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DomainError::transcode(format!(
                    "failed to run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::validation(format!(
                "unreadable or unsupported source file: {}",
                stderr.trim()
            )));
        }

        Self::parse_report(file_path, &output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {"index": 0, "codec_type": "audio", "duration": "12.000000"},
            {"index": 1, "codec_type": "video", "codec_name": "h264",
             "width": 1280, "height": 720, "duration": "10.010000"}
        ],
        "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "12.000000"}
    }"#;

    #[test]
    fn test_parse_report_reads_video_stream() {
        let media = FFprobeAdapter::parse_report(Path::new("in.mp4"), SAMPLE.as_bytes()).unwrap();

        assert_eq!(media.dimensions, Dimensions::new(1280, 720));
        assert_eq!(media.duration.seconds, 10.01);
        assert_eq!(media.container, "mov");
        assert_eq!(media.path, PathBuf::from("in.mp4"));
    }

    #[test]
    fn test_parse_report_falls_back_to_format_duration() {
        let json = r#"{
            "streams": [{"codec_type": "video", "width": 320, "height": 240}],
            "format": {"format_name": "matroska,webm", "duration": "4.5"}
        }"#;
        let media = FFprobeAdapter::parse_report(Path::new("in.webm"), json.as_bytes()).unwrap();

        assert_eq!(media.duration.seconds, 4.5);
        assert_eq!(media.container, "matroska");
    }

    #[test]
    fn test_parse_report_without_video_is_validation_error() {
        let json = r#"{"streams": [{"codec_type": "audio"}], "format": {"duration": "3.0"}}"#;
        let err = FFprobeAdapter::parse_report(Path::new("song.mp4"), json.as_bytes()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_parse_report_garbage_is_transcode_error() {
        let err = FFprobeAdapter::parse_report(Path::new("x.mp4"), b"not json").unwrap_err();
        assert!(err.is_transcode());
    }

    #[test]
    fn test_parse_report_swaps_size_for_display_matrix_rotation() {
        let json = r#"{
            "streams": [{"codec_type": "video", "width": 1920, "height": 1080,
                         "duration": "8.0",
                         "side_data_list": [{"side_data_type": "Display Matrix", "rotation": -90}]}],
            "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2"}
        }"#;
        let media = FFprobeAdapter::parse_report(Path::new("phone.mp4"), json.as_bytes()).unwrap();
        assert_eq!(media.dimensions, Dimensions::new(1080, 1920));

        // A crop that fits the displayed portrait frame is planned against it
        let request = TransformRequest::new(TimeSpec::from_seconds(0.0), TimeSpec::from_seconds(2.0))
            .with_crop(600, 600);
        let plan = crate::domain::rules::TransformPlanner::plan(&media, &request).unwrap();
        assert_eq!(plan.crop, CropRect { width: 1080, height: 720, x: 0, y: 600 });
    }

    #[test]
    fn test_parse_report_honours_legacy_rotate_tag() {
        let json = r#"{
            "streams": [{"codec_type": "video", "width": 1280, "height": 720,
                         "duration": "3.0", "tags": {"rotate": "270"}}],
            "format": {"format_name": "mov"}
        }"#;
        let media = FFprobeAdapter::parse_report(Path::new("old.mov"), json.as_bytes()).unwrap();
        assert_eq!(media.dimensions, Dimensions::new(720, 1280));
    }

    #[test]
    fn test_parse_report_keeps_size_for_half_turn() {
        let json = r#"{
            "streams": [{"codec_type": "video", "width": 640, "height": 480,
                         "duration": "3.0", "side_data_list": [{"rotation": 180}]}],
            "format": {"format_name": "mov"}
        }"#;
        let media = FFprobeAdapter::parse_report(Path::new("flip.mov"), json.as_bytes()).unwrap();
        assert_eq!(media.dimensions, Dimensions::new(640, 480));
    }
}
