//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed specifications and identifiers.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid specification at '{location}': {message}")]
    SpecShape { location: String, message: String },

    #[error("invalid path segment '{value}': {reason}")]
    InvalidSegment { value: String, reason: String },

    #[error("identifier must not be empty")]
    EmptyIdentifier,
}

impl DomainError {
    /// Create a spec shape error for a node location.
    pub fn spec_shape(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SpecShape {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
