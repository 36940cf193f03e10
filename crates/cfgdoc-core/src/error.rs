//! Error types for document access

use thiserror::Error;

/// Result type for attribute-style document access
pub type ThingResult<T> = Result<T, ThingError>;

/// Errors raised when reading named fields out of a document
#[derive(Debug, Error)]
pub enum ThingError {
    /// No entry with this name
    #[error("no attribute '{key}'")]
    NotFound { key: String },

    /// Attempted a named lookup on something that is not a mapping
    #[error("'{key}' is not a mapping")]
    NotAMapping { key: String },

    /// Typed extraction failed
    #[error("failed to deserialize document: {0}")]
    Deserialize(#[from] serde_yaml::Error),
}
