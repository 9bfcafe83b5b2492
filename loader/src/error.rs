//! Error types for definition loading and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading definitions or configuration.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure of the configuration file.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A definition file is not valid YAML or has an unexpected shape.
    #[error("invalid definition file {}: {source}", .path.display())]
    InvalidDefinitionFile {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The models directory does not exist.
    #[error("models directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
