//! Error handling module for GifClip

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Application-level error returned by the command boundary
#[derive(Error, Debug)]
pub enum AppError {
    /// A conversion or probe attempt failed
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration file or value is invalid
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Output file already exists and overwriting was not requested
    #[error("Output file already exists: {path} (use --overwrite to replace it)")]
    OutputExists { path: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config {
            message: message.into(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Domain(DomainError::Validation(_)) => 2,
            AppError::OutputExists { .. } => 2,
            AppError::Domain(DomainError::Transcode(_)) => 3,
            AppError::Domain(DomainError::Resource(_)) => 4,
            AppError::Io(_) | AppError::Serialization(_) => 4,
            AppError::Config { .. } => 5,
        }
    }
}

/// Result type alias for GifClip operations
pub type AppResult<T> = std::result::Result<T, AppError>;
