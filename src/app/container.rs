use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFprobeAdapter, TempWorkspaceAdapter, TracingProgressAdapter};
use crate::app::{convert_interactor::ConvertInteractor, probe_interactor::ProbeInteractor};
use crate::config_initialization::AppConfig;
use crate::ports::{ProbePort, ProgressPort, TranscodePort, WorkspacePort};

pub trait AppContainer: Send + Sync {
    fn convert_interactor(&self) -> Arc<ConvertInteractor>;
    fn probe_interactor(&self) -> Arc<ProbeInteractor>;
}

pub struct DefaultAppContainer {
    convert_interactor: Arc<ConvertInteractor>,
    probe_interactor: Arc<ProbeInteractor>,
}

impl DefaultAppContainer {
    /// Wire the ffmpeg/ffprobe adapters described by `config`
    pub fn from_config(config: &AppConfig) -> Self {
        let probe_port = Arc::new(FFprobeAdapter::new(config.engine.ffprobe.clone()));
        let transcode_port = Arc::new(FFmpegAdapter::new(
            config.engine.ffmpeg.clone(),
            config.engine.threads,
        ));
        let workspace_port = Arc::new(match &config.workspace.temp_dir {
            Some(dir) => TempWorkspaceAdapter::in_dir(dir.clone()),
            None => TempWorkspaceAdapter::new(),
        });
        let progress_port = Arc::new(TracingProgressAdapter::new());

        Self::with_ports(probe_port, transcode_port, workspace_port, progress_port)
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        probe_port: Arc<dyn ProbePort>,
        transcode_port: Arc<dyn TranscodePort>,
        workspace_port: Arc<dyn WorkspacePort>,
        progress_port: Arc<dyn ProgressPort>,
    ) -> Self {
        let convert_interactor = Arc::new(ConvertInteractor::new(
            Arc::clone(&probe_port),
            transcode_port,
            workspace_port,
            progress_port,
        ));
        let probe_interactor = Arc::new(ProbeInteractor::new(probe_port));

        Self {
            convert_interactor,
            probe_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn convert_interactor(&self) -> Arc<ConvertInteractor> {
        Arc::clone(&self.convert_interactor)
    }

    fn probe_interactor(&self) -> Arc<ProbeInteractor> {
        Arc::clone(&self.probe_interactor)
    }
}
