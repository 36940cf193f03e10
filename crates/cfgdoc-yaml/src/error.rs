//! Error types for YAML loading and dumping

use std::path::PathBuf;
use thiserror::Error;

/// Result type for YAML operations
pub type YamlResult<T> = Result<T, YamlError>;

/// Errors that can occur while loading or dumping YAML documents
#[derive(Debug, Error)]
pub enum YamlError {
    /// Malformed YAML, as reported by the parser
    #[error(transparent)]
    Parse(#[from] serde_yaml::Error),

    /// The path is neither a regular file nor a directory
    #[error("can't read YAML from non-file, non-directory '{}'", path.display())]
    CantLoad { path: PathBuf },

    /// Filesystem error from stat, open or directory listing
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A file includes itself, directly or through other files
    #[error("circular include detected: {}", path.display())]
    CircularInclude { path: PathBuf },

    /// Include tag with something other than a path string
    #[error("{tag} expects a path, found {found}")]
    InvalidInclude { tag: String, found: String },

    /// Merge key (`<<`) whose value is not a mapping or list of mappings
    #[error("expected a mapping or list of mappings for merging, found {found}")]
    Merge { found: String },

    /// Failed to emit YAML
    #[error("failed to write YAML: {0}")]
    Emit(#[source] serde_yaml::Error),
}

impl YamlError {
    /// The offending path, for errors that carry one
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            YamlError::CantLoad { path } | YamlError::CircularInclude { path } => Some(path),
            _ => None,
        }
    }
}
