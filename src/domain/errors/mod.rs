// Domain errors - Error taxonomy for a single conversion attempt

use thiserror::Error;

/// Domain-specific error types
///
/// The three kinds are kept apart so callers can tell a rejected request
/// (which never reaches the engine) from an engine failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// User-supplied parameters violate a precondition
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The transcoding engine failed or the source could not be decoded
    #[error("Transcode failed: {0}")]
    Transcode(String),
    /// Temporary file creation or deletion failed
    #[error("Resource error: {0}")]
    Resource(String),
}

impl DomainError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    /// Shorthand for an engine failure
    pub fn transcode(message: impl Into<String>) -> Self {
        DomainError::Transcode(message.into())
    }

    /// Shorthand for a temporary resource failure
    pub fn resource(message: impl Into<String>) -> Self {
        DomainError::Resource(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }

    pub fn is_transcode(&self) -> bool {
        matches!(self, DomainError::Transcode(_))
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, DomainError::Resource(_))
    }
}
