//! Configuration initialization and hierarchy management
//!
//! Precedence, lowest to highest: built-in defaults, config file,
//! `GIFCLIP_*` environment variables, command-line flags. Environment
//! variables reach this module through clap's `env` support, so they
//! arrive already merged with the flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::adapters::toml_config::TomlConfigAdapter;
use crate::cli::Cli;
use crate::domain::model::{DEFAULT_OUTPUT_FILE, MAX_FPS};
use crate::error::{AppError, AppResult};
use crate::utils::logging::LoggingConfig;

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub workspace: WorkspaceConfig,
    pub defaults: ConvertDefaults,
    pub logging: LoggingConfig,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// External engine binaries and threading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            threads: num_cpus::get(),
        }
    }
}

/// Where per-request workspaces are created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Parent directory; the system temp dir when unset
    pub temp_dir: Option<PathBuf>,
}

/// Values used when a convert flag is omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertDefaults {
    pub fps: u32,
    pub speed: f64,
    pub scale: f64,
    /// Target width; takes the place of `scale` when set
    pub width: Option<u32>,
    pub output: PathBuf,
}

impl Default for ConvertDefaults {
    fn default() -> Self {
        Self {
            fps: 10,
            speed: 1.0,
            scale: 1.0,
            width: None,
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

impl AppConfig {
    /// Reject values no conversion could run with
    pub fn validate(&self) -> AppResult<()> {
        if self.engine.threads == 0 {
            return Err(AppError::config("engine.threads must be at least 1"));
        }
        if self.defaults.fps == 0 || self.defaults.fps > MAX_FPS {
            return Err(AppError::config(format!(
                "defaults.fps must be between 1 and {}, got {}",
                MAX_FPS, self.defaults.fps
            )));
        }
        if !self.defaults.speed.is_finite() || self.defaults.speed <= 0.0 {
            return Err(AppError::config(format!(
                "defaults.speed must be positive, got {}",
                self.defaults.speed
            )));
        }
        if !(self.defaults.scale > 0.0 && self.defaults.scale <= 1.0) {
            return Err(AppError::config(format!(
                "defaults.scale must be in (0, 1], got {}",
                self.defaults.scale
            )));
        }
        if self.defaults.width == Some(0) {
            return Err(AppError::config("defaults.width must be positive"));
        }
        Ok(())
    }
}

/// Build the effective configuration for this invocation
pub fn initialize_configuration(cli: &Cli) -> AppResult<AppConfig> {
    let cwd = std::env::current_dir()?;
    let mut config = load_config_file(cli.config.as_deref(), &cwd)?;
    apply_cli_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

/// Load the explicit file, or the first default file found in `dir`
fn load_config_file(explicit: Option<&Path>, dir: &Path) -> AppResult<AppConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => TomlConfigAdapter::discover(dir),
    };

    match path {
        Some(path) => {
            let mut config = TomlConfigAdapter::load(&path)?;
            config.source = Some(path);
            Ok(config)
        }
        None => Ok(AppConfig::default()),
    }
}

/// Apply flag and environment overrides on top of the file values
fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    if let Some(ffmpeg) = &cli.ffmpeg {
        config.engine.ffmpeg = ffmpeg.clone();
    }
    if let Some(ffprobe) = &cli.ffprobe {
        config.engine.ffprobe = ffprobe.clone();
    }
    if let Some(threads) = cli.threads {
        config.engine.threads = threads;
    }
    if let Some(temp_dir) = &cli.temp_dir {
        config.workspace.temp_dir = Some(temp_dir.clone());
    }
}
