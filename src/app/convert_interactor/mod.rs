// Convert interactor - Orchestrates the clip to GIF use case

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for the clip to GIF conversion
///
/// Each call owns a fresh workspace. The workspace is removed before
/// `execute` returns, whether the conversion succeeded or not.
pub struct ConvertInteractor {
    probe_port: Arc<dyn ProbePort>,
    transcode_port: Arc<dyn TranscodePort>,
    workspace_port: Arc<dyn WorkspacePort>,
    progress_port: Arc<dyn ProgressPort>,
}

impl ConvertInteractor {
    /// Create new convert interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        transcode_port: Arc<dyn TranscodePort>,
        workspace_port: Arc<dyn WorkspacePort>,
        progress_port: Arc<dyn ProgressPort>,
    ) -> Self {
        Self {
            probe_port,
            transcode_port,
            workspace_port,
            progress_port,
        }
    }

    /// Convert one clip into a looping GIF held in memory
    pub async fn execute(
        &self,
        input: &SourceInput,
        request: &TransformRequest,
    ) -> Result<OutputArtifact, DomainError> {
        info!("Starting conversion of {}", input.describe());
        self.progress_port
            .report(ProgressPhase::Validating, "Validating request");

        if let Err(e) = Self::check_request(input, request) {
            return Err(self.fail(e));
        }

        let workspace = match self.workspace_port.create_workspace().await {
            Ok(workspace) => workspace,
            Err(e) => return Err(self.fail(e)),
        };
        debug!("Workspace created at {}", workspace.path().display());

        let outcome = self.convert_in(&workspace, input, request).await;

        match (outcome, workspace.close()) {
            (Ok(artifact), Ok(())) => {
                self.progress_port.report(
                    ProgressPhase::Complete,
                    &format!("GIF ready ({})", artifact.size_string()),
                );
                Ok(artifact)
            }
            (Ok(_), Err(close_error)) => Err(self.fail(close_error)),
            (Err(e), Ok(())) => Err(self.fail(e)),
            (Err(e), Err(close_error)) => {
                warn!("Workspace cleanup also failed: {}", close_error);
                Err(self.fail(e))
            }
        }
    }

    /// Checks that need no file access
    fn check_request(input: &SourceInput, request: &TransformRequest) -> Result<(), DomainError> {
        RequestValidator::validate(request)?;
        if let SourceInput::File(path) = input {
            RequestValidator::validate_container(path)?;
        }
        Ok(())
    }

    async fn convert_in(
        &self,
        workspace: &Workspace,
        input: &SourceInput,
        request: &TransformRequest,
    ) -> Result<OutputArtifact, DomainError> {
        let staged = workspace.stage(input).await?;
        let source = self.probe_port.probe_media(&staged).await?;
        debug!(
            "Source probed: {} {}, {}",
            source.container, source.dimensions, source.duration
        );

        let plan = TransformPlanner::plan(&source, request)?;
        self.progress_port.report(
            ProgressPhase::Planned,
            &format!(
                "{} to {} at {}x speed, {} fps, output {}",
                plan.start, plan.end, plan.speed, plan.fps, plan.output
            ),
        );

        let output = workspace.output_path();
        self.progress_port
            .report(ProgressPhase::Encoding, "Running transcoding engine");
        self.transcode_port.transcode(&plan, &output).await?;

        let bytes = workspace.read_artifact().await?;
        Ok(OutputArtifact::new(bytes, &plan))
    }

    fn fail(&self, error: DomainError) -> DomainError {
        self.progress_port
            .report(ProgressPhase::Failed, &error.to_string());
        error
    }
}
