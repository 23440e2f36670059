//! Command implementations

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::app::AppContainer;
use crate::cli::args::{ConvertArgs, ProbeArgs};
use crate::config_initialization::ConvertDefaults;
use crate::domain::model::*;
use crate::error::{AppError, AppResult};
use crate::ports::SourceInput;

/// Machine-readable summary of a finished conversion
#[derive(Debug, Serialize)]
pub struct ConversionReport {
    pub output: PathBuf,
    pub size_bytes: u64,
    pub size: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub duration_seconds: f64,
    pub fps: u32,
    pub loops: bool,
    pub finished_at: DateTime<Utc>,
}

impl ConversionReport {
    pub fn new(output: &Path, artifact: &OutputArtifact) -> Self {
        Self {
            output: output.to_path_buf(),
            size_bytes: artifact.size(),
            size: artifact.size_string(),
            mime_type: artifact.mime_type(),
            width: artifact.dimensions.width,
            height: artifact.dimensions.height,
            duration_seconds: artifact.target_duration,
            fps: artifact.fps,
            loops: true,
            finished_at: Utc::now(),
        }
    }
}

/// Machine-readable probe result
#[derive(Debug, Serialize)]
pub struct ProbeSummary {
    pub path: PathBuf,
    pub container: String,
    pub duration_seconds: f64,
    pub duration: String,
    pub width: u32,
    pub height: u32,
}

impl From<&SourceMedia> for ProbeSummary {
    fn from(media: &SourceMedia) -> Self {
        Self {
            path: media.path.clone(),
            container: media.container.clone(),
            duration_seconds: media.duration.as_seconds(),
            duration: media.duration.format_hms(),
            width: media.dimensions.width,
            height: media.dimensions.height,
        }
    }
}

/// Build the transform request from flags, falling back to configured defaults
pub fn build_request(args: &ConvertArgs, defaults: &ConvertDefaults) -> AppResult<TransformRequest> {
    let start = TimeSpec::parse(&args.start)?;
    let end = TimeSpec::parse(&args.end)?;

    let scale = match (args.scale, args.width) {
        (Some(factor), _) => ScalePolicy::Factor(factor),
        (None, Some(width)) => ScalePolicy::Width(width),
        (None, None) => match defaults.width {
            Some(width) => ScalePolicy::Width(width),
            None => ScalePolicy::Factor(defaults.scale),
        },
    };

    Ok(TransformRequest::new(start, end)
        .with_crop(args.top, args.bottom)
        .with_scale(scale)
        .with_speed(args.speed.unwrap_or(defaults.speed))
        .with_fps(args.fps.unwrap_or(defaults.fps)))
}

/// Execute the convert command
pub async fn convert(
    container: &dyn AppContainer,
    defaults: &ConvertDefaults,
    args: ConvertArgs,
) -> AppResult<()> {
    let request = build_request(&args, defaults)?;
    let output = args.output.clone().unwrap_or_else(|| defaults.output.clone());

    if output.exists() && !args.overwrite {
        return Err(AppError::OutputExists {
            path: output.display().to_string(),
        });
    }

    let input = SourceInput::from_arg(&args.input);
    let artifact = container.convert_interactor().execute(&input, &request).await?;

    write_artifact(&output, &artifact.bytes, args.overwrite).await?;
    info!("Saved {} to {}", artifact.mime_type(), output.display());

    if args.json {
        let report = ConversionReport::new(&output, &artifact);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} ({}, {}, {:.2}s at {} fps)",
            output.display(),
            artifact.size_string(),
            artifact.dimensions,
            artifact.target_duration,
            artifact.fps
        );
    }

    Ok(())
}

/// Write the GIF; without `overwrite` an existing file is never replaced
pub async fn write_artifact(output: &Path, bytes: &[u8], overwrite: bool) -> AppResult<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = match options.open(output).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(AppError::OutputExists {
                path: output.display().to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}

/// Execute the probe command
pub async fn probe(container: &dyn AppContainer, args: ProbeArgs) -> AppResult<()> {
    let media = container.probe_interactor().execute(&args.input).await?;
    let summary = ProbeSummary::from(&media);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("File:      {}", summary.path.display());
        println!("Container: {}", summary.container);
        println!(
            "Duration:  {} ({:.2}s)",
            summary.duration, summary.duration_seconds
        );
        println!("Frame:     {}x{}", summary.width, summary.height);
    }

    Ok(())
}
