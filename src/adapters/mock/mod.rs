// Mock adapters - In-process stand-ins for the external engine and probe

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Probe that reports fixed media properties for any file
pub struct MockProbeAdapter {
    duration: f64,
    dimensions: Dimensions,
    calls: AtomicUsize,
}

impl MockProbeAdapter {
    pub fn new(duration: f64, width: u32, height: u32) -> Self {
        Self {
            duration,
            dimensions: Dimensions::new(width, height),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProbePort for MockProbeAdapter {
    async fn probe_media(&self, file_path: &Path) -> Result<SourceMedia, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        SourceMedia::new(
            file_path,
            "mock",
            TimeSpec::from_seconds(self.duration),
            self.dimensions,
        )
    }
}

/// Engine that writes a deterministic artifact, or fails on demand
pub struct MockTranscodeAdapter {
    artifact_size: usize,
    failure: Option<String>,
    plans: Mutex<Vec<TransformPlan>>,
    outputs: Mutex<Vec<PathBuf>>,
}

impl MockTranscodeAdapter {
    /// Engine producing `artifact_size` bytes per run
    pub fn new(artifact_size: usize) -> Self {
        Self {
            artifact_size,
            failure: None,
            plans: Mutex::new(Vec::new()),
            outputs: Mutex::new(Vec::new()),
        }
    }

    /// Engine that writes a partial file and then fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            artifact_size: 16,
            failure: Some(message.into()),
            plans: Mutex::new(Vec::new()),
            outputs: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.plans.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Plans received so far, in call order
    pub fn plans(&self) -> Vec<TransformPlan> {
        self.plans.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Output paths written so far, in call order
    pub fn outputs(&self) -> Vec<PathBuf> {
        self.outputs.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TranscodePort for MockTranscodeAdapter {
    async fn transcode(&self, plan: &TransformPlan, output: &Path) -> Result<(), DomainError> {
        if let Ok(mut plans) = self.plans.lock() {
            plans.push(plan.clone());
        }
        if let Ok(mut outputs) = self.outputs.lock() {
            outputs.push(output.to_path_buf());
        }

        let mut bytes = b"GIF89a".to_vec();
        bytes.resize(self.artifact_size.max(bytes.len()), 0);
        tokio::fs::write(output, &bytes)
            .await
            .map_err(|e| DomainError::resource(format!("mock engine write failed: {}", e)))?;

        match &self.failure {
            Some(message) => Err(DomainError::transcode(message.clone())),
            None => Ok(()),
        }
    }
}

/// Workspace provider that always fails
pub struct FailingWorkspaceAdapter;

#[async_trait]
impl WorkspacePort for FailingWorkspaceAdapter {
    async fn create_workspace(&self) -> Result<Workspace, DomainError> {
        Err(DomainError::resource("no space left for temporary files"))
    }
}

/// Progress sink that keeps every milestone
#[derive(Default)]
pub struct RecordingProgress {
    phases: Mutex<Vec<ProgressPhase>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phases(&self) -> Vec<ProgressPhase> {
        self.phases.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl ProgressPort for RecordingProgress {
    fn report(&self, phase: ProgressPhase, _message: &str) {
        if let Ok(mut phases) = self.phases.lock() {
            phases.push(phase);
        }
    }
}
