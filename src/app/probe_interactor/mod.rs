// Probe interactor - Reports source clip properties without converting

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for the probe use case
pub struct ProbeInteractor {
    probe_port: Arc<dyn ProbePort>,
}

impl ProbeInteractor {
    /// Create new probe interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>) -> Self {
        Self { probe_port }
    }

    /// Probe a clip on disk
    pub async fn execute(&self, path: &Path) -> Result<SourceMedia, DomainError> {
        RequestValidator::validate_container(path)?;
        if !path.is_file() {
            return Err(DomainError::validation(format!(
                "input file does not exist: {}",
                path.display()
            )));
        }

        let media = self.probe_port.probe_media(path).await?;
        info!(
            "Probed {}: {} {}, {}",
            path.display(),
            media.container,
            media.dimensions,
            media.duration
        );
        Ok(media)
    }
}
