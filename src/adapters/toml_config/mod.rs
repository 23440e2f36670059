// Config file adapter - Loads AppConfig from TOML or YAML files

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config_initialization::AppConfig;
use crate::error::{AppError, AppResult};

/// File names looked up in the working directory when no file is given
pub const DEFAULT_CONFIG_FILES: &[&str] = &["gifclip.toml", "gifclip.yaml", "gifclip.yml"];

/// Supported configuration file syntaxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Pick the syntax from the file extension; anything unknown is read as TOML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Toml,
        }
    }
}

/// TOML/YAML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse configuration text in the given syntax
    pub fn parse(content: &str, format: ConfigFormat) -> AppResult<AppConfig> {
        match format {
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| AppError::config(format!("Failed to parse TOML config: {}", e))),
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| AppError::config(format!("Failed to parse YAML config: {}", e))),
        }
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> AppResult<AppConfig> {
        if !path.exists() {
            return Err(AppError::config(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        info!("Loading configuration from: {}", path.display());
        Self::parse(&content, ConfigFormat::from_path(path))
    }

    /// First default config file present in `dir`
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }
}
