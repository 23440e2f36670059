// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fs_temp;
#[cfg(any(test, feature = "testing"))]
pub mod mock;
pub mod probe_ffprobe;
pub mod toml_config;
pub mod tracing_progress;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use fs_temp::TempWorkspaceAdapter;
pub use probe_ffprobe::FFprobeAdapter;
pub use toml_config::TomlConfigAdapter;
pub use tracing_progress::TracingProgressAdapter;
