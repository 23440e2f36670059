use std::path::{Path, PathBuf};
use std::sync::Arc;

use gifclip::adapters::mock::*;
use gifclip::adapters::{FFmpegAdapter, FFprobeAdapter, TempWorkspaceAdapter};
use gifclip::app::{ConvertInteractor, ProbeInteractor};
use gifclip::domain::model::*;
use gifclip::ports::*;
use gifclip::DomainError;
use tempfile::TempDir;

/// Test utilities for conversion runs
mod test_utils {
    use super::*;

    /// Conversion wired to in-process engine and probe
    pub struct Harness {
        pub probe: Arc<MockProbeAdapter>,
        pub engine: Arc<MockTranscodeAdapter>,
        pub progress: Arc<RecordingProgress>,
        pub interactor: ConvertInteractor,
        pub temp_root: TempDir,
        pub input_dir: TempDir,
    }

    impl Harness {
        pub fn new(duration: f64, width: u32, height: u32, engine: MockTranscodeAdapter) -> Self {
            let temp_root = TempDir::new().unwrap();
            let input_dir = TempDir::new().unwrap();
            let probe = Arc::new(MockProbeAdapter::new(duration, width, height));
            let engine = Arc::new(engine);
            let progress = Arc::new(RecordingProgress::new());
            let interactor = ConvertInteractor::new(
                probe.clone(),
                engine.clone(),
                Arc::new(TempWorkspaceAdapter::in_dir(temp_root.path())),
                progress.clone(),
            );

            Self {
                probe,
                engine,
                progress,
                interactor,
                temp_root,
                input_dir,
            }
        }

        /// Write a placeholder clip and return it as a file input
        pub fn input_file(&self, name: &str) -> SourceInput {
            let path = self.input_dir.path().join(name);
            std::fs::write(&path, b"not really a video").unwrap();
            SourceInput::File(path)
        }

        /// True when no workspace is left behind
        pub fn workspaces_removed(&self) -> bool {
            dir_is_empty(self.temp_root.path())
        }
    }

    pub fn dir_is_empty(path: &Path) -> bool {
        std::fs::read_dir(path).unwrap().next().is_none()
    }

    pub fn request(start: f64, end: f64) -> TransformRequest {
        TransformRequest::new(TimeSpec::from_seconds(start), TimeSpec::from_seconds(end))
    }

    /// Whether real ffmpeg and ffprobe binaries are on PATH
    pub fn ffmpeg_available() -> bool {
        ["ffmpeg", "ffprobe"].iter().all(|binary| {
            std::process::Command::new(binary)
                .arg("-version")
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        })
    }

    /// Create a test video file using FFmpeg
    pub fn create_test_video(output_path: &Path, seconds: u32, size: &str) -> PathBuf {
        let status = std::process::Command::new("ffmpeg")
            .args(["-hide_banner", "-v", "error", "-y", "-f", "lavfi", "-i"])
            .arg(format!("testsrc=duration={}:size={}:rate=25", seconds, size))
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .arg(output_path)
            .status()
            .unwrap();
        assert!(status.success());
        output_path.to_path_buf()
    }
}

use test_utils::*;

#[tokio::test]
async fn test_basic_trim_keeps_resolution_and_frame_rate() {
    let harness = Harness::new(10.0, 640, 360, MockTranscodeAdapter::new(4096));
    let input = harness.input_file("clip.mp4");

    let artifact = harness
        .interactor
        .execute(&input, &request(2.0, 7.0))
        .await
        .unwrap();

    let plans = harness.engine.plans();
    assert_eq!(plans.len(), 1);
    let plan = &plans[0];
    assert_eq!(plan.clip_length(), 5.0);
    assert_eq!(plan.output, Dimensions::new(640, 360));
    assert_eq!(plan.fps, 10);
    assert!(plan.loop_forever);

    assert!((artifact.target_duration - 5.0).abs() < 1e-9);
    assert_eq!(artifact.size(), 4096);
    assert_eq!(artifact.size_string(), "4.00 KB");
    assert_eq!(artifact.mime_type(), "image/gif");
    assert!(artifact.bytes.starts_with(b"GIF89a"));
    assert!(harness.workspaces_removed());
}

#[tokio::test]
async fn test_crop_removing_whole_frame_never_reaches_engine() {
    let harness = Harness::new(10.0, 640, 480, MockTranscodeAdapter::new(1024));
    let input = harness.input_file("clip.mp4");

    let err = harness
        .interactor
        .execute(&input, &request(0.0, 2.0).with_crop(300, 300))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains("nothing would remain"));
    assert_eq!(harness.engine.calls(), 0);
    assert!(harness.workspaces_removed());
}

#[tokio::test]
async fn test_inverted_range_fails_before_any_file_access() {
    let harness = Harness::new(10.0, 640, 480, MockTranscodeAdapter::new(1024));
    let input = harness.input_file("clip.mp4");

    let err = harness
        .interactor
        .execute(&input, &request(5.0, 3.0))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains("start must precede end"));
    assert_eq!(harness.probe.calls(), 0);
    assert_eq!(harness.engine.calls(), 0);
    assert!(harness.workspaces_removed());
    assert_eq!(
        harness.progress.phases(),
        vec![ProgressPhase::Validating, ProgressPhase::Failed]
    );
}

#[tokio::test]
async fn test_artifact_size_is_reported_in_kilobytes() {
    let harness = Harness::new(10.0, 320, 240, MockTranscodeAdapter::new(2500));
    let input = harness.input_file("clip.mp4");

    let artifact = harness
        .interactor
        .execute(&input, &request(0.0, 1.0))
        .await
        .unwrap();

    assert_eq!(artifact.size_string(), "2.44 KB");
}

#[tokio::test]
async fn test_scale_and_speed_reach_engine() {
    let harness = Harness::new(10.0, 200, 100, MockTranscodeAdapter::new(1024));
    let input = harness.input_file("clip.mp4");

    let artifact = harness
        .interactor
        .execute(
            &input,
            &request(3.0, 7.0)
                .with_scale(ScalePolicy::Factor(0.5))
                .with_speed(2.0),
        )
        .await
        .unwrap();

    let plan = &harness.engine.plans()[0];
    assert_eq!(plan.output, Dimensions::new(100, 50));
    assert_eq!(plan.clip_length(), 4.0);
    assert_eq!(plan.target_duration(), 2.0);
    assert_eq!(artifact.dimensions, Dimensions::new(100, 50));
    assert_eq!(artifact.target_duration, 2.0);
}

#[tokio::test]
async fn test_end_past_source_duration_is_rejected() {
    let harness = Harness::new(4.0, 320, 240, MockTranscodeAdapter::new(1024));
    let input = harness.input_file("clip.mp4");

    let err = harness
        .interactor
        .execute(&input, &request(1.0, 6.0))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(harness.probe.calls(), 1);
    assert_eq!(harness.engine.calls(), 0);
    assert!(harness.workspaces_removed());
}

#[tokio::test]
async fn test_unsupported_container_is_rejected_up_front() {
    let harness = Harness::new(10.0, 320, 240, MockTranscodeAdapter::new(1024));
    let input = harness.input_file("notes.txt");

    let err = harness
        .interactor
        .execute(&input, &request(0.0, 1.0))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(harness.probe.calls(), 0);
    assert!(harness.workspaces_removed());
}

#[tokio::test]
async fn test_missing_input_file_is_validation_error() {
    let harness = Harness::new(10.0, 320, 240, MockTranscodeAdapter::new(1024));
    let input = SourceInput::File(harness.input_dir.path().join("missing.mp4"));

    let err = harness
        .interactor
        .execute(&input, &request(0.0, 1.0))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(harness.probe.calls(), 0);
    assert!(harness.workspaces_removed());
}

#[tokio::test]
async fn test_engine_failure_is_transcode_error_and_cleans_partial_output() {
    let harness = Harness::new(
        10.0,
        320,
        240,
        MockTranscodeAdapter::failing("Error while decoding stream #0:0"),
    );
    let input = harness.input_file("clip.mp4");

    let err = harness
        .interactor
        .execute(&input, &request(0.0, 1.0))
        .await
        .unwrap_err();

    assert!(err.is_transcode());
    assert!(err.to_string().contains("Error while decoding stream"));

    let outputs = harness.engine.outputs();
    assert_eq!(outputs.len(), 1);
    assert!(!outputs[0].exists());
    assert!(harness.workspaces_removed());
    assert_eq!(harness.progress.phases().last(), Some(&ProgressPhase::Failed));
}

#[tokio::test]
async fn test_workspace_failure_is_resource_error() {
    let probe = Arc::new(MockProbeAdapter::new(10.0, 320, 240));
    let engine = Arc::new(MockTranscodeAdapter::new(1024));
    let interactor = ConvertInteractor::new(
        probe.clone(),
        engine.clone(),
        Arc::new(FailingWorkspaceAdapter),
        Arc::new(RecordingProgress::new()),
    );

    let err = interactor
        .execute(&SourceInput::Bytes(b"clip".to_vec()), &request(0.0, 1.0))
        .await
        .unwrap_err();

    assert!(err.is_resource());
    assert_eq!(probe.calls(), 0);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_uploaded_bytes_are_staged_and_removed() {
    let harness = Harness::new(10.0, 320, 240, MockTranscodeAdapter::new(512));

    harness
        .interactor
        .execute(&SourceInput::Bytes(vec![0u8; 64]), &request(0.0, 1.0))
        .await
        .unwrap();

    let plan = &harness.engine.plans()[0];
    assert!(plan.source.starts_with(harness.temp_root.path()));
    assert!(!plan.source.exists());
    assert!(harness.workspaces_removed());
}

#[tokio::test]
async fn test_empty_upload_is_validation_error() {
    let harness = Harness::new(10.0, 320, 240, MockTranscodeAdapter::new(512));

    let err = harness
        .interactor
        .execute(&SourceInput::Bytes(Vec::new()), &request(0.0, 1.0))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(harness.workspaces_removed());
}

#[tokio::test]
async fn test_repeated_conversion_reports_same_size() {
    let harness = Harness::new(10.0, 320, 240, MockTranscodeAdapter::new(3000));
    let input = harness.input_file("clip.mov");
    let req = request(1.0, 3.0).with_scale(ScalePolicy::Width(160));

    let first = harness.interactor.execute(&input, &req).await.unwrap();
    let second = harness.interactor.execute(&input, &req).await.unwrap();

    assert_eq!(first.size_string(), second.size_string());
    assert_eq!(harness.engine.calls(), 2);
    assert_ne!(harness.engine.outputs()[0], harness.engine.outputs()[1]);
    assert!(harness.workspaces_removed());
}

#[tokio::test]
async fn test_progress_milestones_in_order() {
    let harness = Harness::new(10.0, 320, 240, MockTranscodeAdapter::new(100));
    let input = harness.input_file("clip.webm");

    harness
        .interactor
        .execute(&input, &request(0.0, 1.0))
        .await
        .unwrap();

    assert_eq!(
        harness.progress.phases(),
        vec![
            ProgressPhase::Validating,
            ProgressPhase::Planned,
            ProgressPhase::Encoding,
            ProgressPhase::Complete,
        ]
    );
}

#[tokio::test]
async fn test_probe_interactor_reports_media() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clip.mkv");
    std::fs::write(&path, b"data").unwrap();

    let probe = Arc::new(MockProbeAdapter::new(12.5, 1280, 720));
    let interactor = ProbeInteractor::new(probe.clone());

    let media = interactor.execute(&path).await.unwrap();
    assert_eq!(media.duration.as_seconds(), 12.5);
    assert_eq!(media.dimensions, Dimensions::new(1280, 720));

    let err = interactor
        .execute(&dir.path().join("absent.mp4"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(probe.calls(), 1);
}

#[tokio::test]
async fn test_real_engine_produces_looping_gif() {
    if !ffmpeg_available() {
        eprintln!("ffmpeg not available, skipping");
        return;
    }

    let input_dir = TempDir::new().unwrap();
    let temp_root = TempDir::new().unwrap();
    let source = create_test_video(&input_dir.path().join("testsrc.mp4"), 4, "320x240");

    let interactor = ConvertInteractor::new(
        Arc::new(FFprobeAdapter::new("ffprobe")),
        Arc::new(FFmpegAdapter::new("ffmpeg", 2)),
        Arc::new(TempWorkspaceAdapter::in_dir(temp_root.path())),
        Arc::new(RecordingProgress::new()),
    );

    let artifact = interactor
        .execute(
            &SourceInput::File(source),
            &request(1.0, 3.0)
                .with_crop(20, 20)
                .with_scale(ScalePolicy::Width(160))
                .with_speed(2.0),
        )
        .await
        .unwrap();

    assert!(artifact.bytes.starts_with(b"GIF8"));
    assert_eq!(artifact.dimensions, Dimensions::new(160, 100));
    assert_eq!(artifact.target_duration, 1.0);
    assert!(dir_is_empty(temp_root.path()));
}
