//! FFmpeg execution adapter
//!
//! Encodes a transform plan into an animated GIF by running `ffmpeg` as a
//! child process.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Number of stderr lines kept in an engine diagnostic
const DIAGNOSTIC_LINES: usize = 5;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    binary: PathBuf,
    threads: usize,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(binary: impl Into<PathBuf>, threads: usize) -> Self {
        Self {
            binary: binary.into(),
            threads: threads.max(1),
        }
    }

    /// Build the `-vf` filter chain: crop, scale, speed, then frame rate
    pub fn filter_chain(plan: &TransformPlan) -> String {
        let mut filters = Vec::new();

        if !plan.keeps_full_frame() {
            filters.push(format!(
                "crop={}:{}:{}:{}",
                plan.crop.width, plan.crop.height, plan.crop.x, plan.crop.y
            ));
        }
        if !plan.keeps_cropped_size() {
            filters.push(format!(
                "scale={}:{}:flags=lanczos",
                plan.output.width, plan.output.height
            ));
        }
        if plan.speed != 1.0 {
            filters.push(format!("setpts=PTS/{}", plan.speed));
        }
        filters.push(format!("fps={}", plan.fps));

        filters.join(",")
    }

    /// Full argument list for one encode
    pub fn build_args(&self, plan: &TransformPlan, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-nostdin".into(),
            "-v".into(),
            "error".into(),
            "-y".into(),
            "-ss".into(),
            format!("{:.3}", plan.start.seconds).into(),
            "-t".into(),
            format!("{:.3}", plan.clip_length()).into(),
            "-i".into(),
            plan.source.clone().into_os_string(),
            "-an".into(),
            "-vf".into(),
            Self::filter_chain(plan).into(),
        ];

        // 0 loops forever, -1 plays once
        let loop_flag = if plan.loop_forever { "0" } else { "-1" };
        for arg in ["-loop", loop_flag, "-threads"] {
            args.push(OsString::from(arg));
        }
        args.push(OsString::from(self.threads.to_string()));
        args.push(OsString::from("-f"));
        args.push(OsString::from("gif"));
        args.push(output.as_os_str().to_os_string());
        args
    }

    fn diagnostic(stderr: &[u8]) -> String {
        let text = String::from_utf8_lossy(stderr);
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(DIAGNOSTIC_LINES);
        let tail = lines[start..].join("\n");
        if tail.is_empty() {
            "no diagnostic output".to_string()
        } else {
            tail
        }
    }
}

#[async_trait]
impl TranscodePort for FFmpegAdapter {
    async fn transcode(&self, plan: &TransformPlan, output: &Path) -> Result<(), DomainError> {
        let args = self.build_args(plan, output);
        debug!("Running {} {:?}", self.binary.display(), args);

        let started = Instant::now();
        let result = Command::new(&self.binary)
            .args(&args)
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

        if !result.status.success() {
            return Err(DomainError::transcode(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                Self::diagnostic(&result.stderr)
            )));
        }

        info!(
            "ffmpeg finished in {:.2}s ({} -> {})",
            started.elapsed().as_secs_f64(),
            plan.source_dimensions,
            plan.output
        );
        Ok(())
    }
}
