// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for reading duration and frame size of a clip
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe a media file and describe its primary video stream
    async fn probe_media(&self, file_path: &Path) -> Result<SourceMedia, DomainError>;
}

/// Port for the external transcoding engine
#[async_trait]
pub trait TranscodePort: Send + Sync {
    /// Run the full decode, filter and encode pass, writing a GIF to `output`
    ///
    /// Returns only after the engine has finished; no partial output is
    /// consumed.
    async fn transcode(&self, plan: &TransformPlan, output: &Path) -> Result<(), DomainError>;
}

/// Port for per-request temporary storage
#[async_trait]
pub trait WorkspacePort: Send + Sync {
    /// Create an empty workspace owned by a single request
    async fn create_workspace(&self) -> Result<Workspace, DomainError>;
}

/// Port for advisory progress reporting
pub trait ProgressPort: Send + Sync {
    /// Called when the conversion reaches a milestone
    fn report(&self, phase: ProgressPhase, message: &str);
}

/// Conversion milestones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressPhase {
    /// Checking request parameters
    Validating,
    /// Trim, crop, scale and speed resolved against the source
    Planned,
    /// Engine running
    Encoding,
    /// Artifact read back
    Complete,
    /// Conversion aborted
    Failed,
}

impl ProgressPhase {
    /// Nominal completion percentage for the milestone
    pub fn percent(&self) -> u8 {
        match self {
            ProgressPhase::Validating => 0,
            ProgressPhase::Planned => 25,
            ProgressPhase::Encoding => 50,
            ProgressPhase::Complete => 100,
            ProgressPhase::Failed => 100,
        }
    }
}

/// Where the source clip comes from
#[derive(Debug, Clone, PartialEq)]
pub enum SourceInput {
    /// A file on disk
    File(PathBuf),
    /// Uploaded bytes already in memory
    Bytes(Vec<u8>),
    /// Bytes read from standard input
    Stdin,
}

impl SourceInput {
    /// Parse a command-line input argument; `-` means standard input
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            SourceInput::Stdin
        } else {
            SourceInput::File(PathBuf::from(arg))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SourceInput::File(path) => path.display().to_string(),
            SourceInput::Bytes(bytes) => format!("<{} uploaded bytes>", bytes.len()),
            SourceInput::Stdin => "<stdin>".to_string(),
        }
    }
}

const STAGED_INPUT_STEM: &str = "input";
const OUTPUT_FILE_NAME: &str = "output.gif";

/// Temporary directory holding the staged input and the output artifact
///
/// Dropping the workspace removes the directory and everything in it.
/// `close` does the same but reports failures.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new(dir: TempDir) -> Self {
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path the engine writes the artifact to
    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join(OUTPUT_FILE_NAME)
    }

    /// Copy the source clip into the workspace and return the staged path
    pub async fn stage(&self, input: &SourceInput) -> Result<PathBuf, DomainError> {
        match input {
            SourceInput::File(path) => {
                let metadata = tokio::fs::metadata(path).await.map_err(|e| {
                    DomainError::validation(format!(
                        "cannot read input file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                if !metadata.is_file() {
                    return Err(DomainError::validation(format!(
                        "input '{}' is not a regular file",
                        path.display()
                    )));
                }

                let staged = self.staged_path(path.extension().map(|e| e.to_string_lossy()).as_deref());
                if tokio::fs::hard_link(path, &staged).await.is_err() {
                    tokio::fs::copy(path, &staged).await.map_err(|e| {
                        DomainError::resource(format!("failed to stage input file: {}", e))
                    })?;
                }
                Ok(staged)
            }
            SourceInput::Bytes(bytes) => self.write_staged(bytes).await,
            SourceInput::Stdin => {
                let mut bytes = Vec::new();
                tokio::io::stdin()
                    .read_to_end(&mut bytes)
                    .await
                    .map_err(|e| DomainError::resource(format!("failed to read stdin: {}", e)))?;
                self.write_staged(&bytes).await
            }
        }
    }

    async fn write_staged(&self, bytes: &[u8]) -> Result<PathBuf, DomainError> {
        if bytes.is_empty() {
            return Err(DomainError::validation("uploaded clip is empty"));
        }
        let staged = self.staged_path(None);
        tokio::fs::write(&staged, bytes)
            .await
            .map_err(|e| DomainError::resource(format!("failed to stage upload: {}", e)))?;
        Ok(staged)
    }

    fn staged_path(&self, extension: Option<&str>) -> PathBuf {
        match extension {
            Some(ext) => self.dir.path().join(format!("{}.{}", STAGED_INPUT_STEM, ext)),
            None => self.dir.path().join(STAGED_INPUT_STEM),
        }
    }

    /// Read the finished artifact back into memory
    pub async fn read_artifact(&self) -> Result<Vec<u8>, DomainError> {
        let output = self.output_path();
        let bytes = match tokio::fs::read(&output).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DomainError::transcode("engine finished without producing output"));
            }
            Err(e) => {
                return Err(DomainError::resource(format!(
                    "failed to read artifact {}: {}",
                    output.display(),
                    e
                )));
            }
        };

        if bytes.is_empty() {
            return Err(DomainError::transcode("engine produced an empty artifact"));
        }
        Ok(bytes)
    }

    /// Remove the workspace, reporting any failure
    pub fn close(self) -> Result<(), DomainError> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| {
            DomainError::resource(format!(
                "failed to remove workspace {}: {}",
                path.display(),
                e
            ))
        })
    }
}
