// Temporary filesystem adapter - Per-request workspaces under a base directory

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

const WORKSPACE_PREFIX: &str = "gifclip-";

/// Creates workspaces as `tempfile` directories
pub struct TempWorkspaceAdapter {
    base_dir: PathBuf,
}

impl TempWorkspaceAdapter {
    /// Use the system temporary directory
    pub fn new() -> Self {
        Self {
            base_dir: std::env::temp_dir(),
        }
    }

    /// Use a specific base directory
    pub fn in_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl Default for TempWorkspaceAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkspacePort for TempWorkspaceAdapter {
    async fn create_workspace(&self) -> Result<Workspace, DomainError> {
        tokio::fs::create_dir_all(&self.base_dir).await.map_err(|e| {
            DomainError::resource(format!(
                "failed to create temp directory {}: {}",
                self.base_dir.display(),
                e
            ))
        })?;

        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(&self.base_dir)
            .map_err(|e| DomainError::resource(format!("failed to create workspace: {}", e)))?;

        debug!("Created workspace {}", dir.path().display());
        Ok(Workspace::new(dir))
    }
}
