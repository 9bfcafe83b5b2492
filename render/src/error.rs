//! Error types for rendering, writing and formatting.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing or formatting generated files.
#[derive(Debug, Error)]
pub enum RenderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A generated file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The formatter executable could not be started.
    #[error("formatter '{command}' could not be started: {source}")]
    FormatterUnavailable {
        command: String,
        source: std::io::Error,
    },

    /// The formatter exited with a non-zero status.
    #[error("formatter '{command}' failed with {status}: {stderr}")]
    FormatterFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The formatter did not finish in time and was killed.
    #[error("formatter '{command}' timed out after {timeout_secs}s")]
    FormatterTimeout { command: String, timeout_secs: u64 },
}

/// Convenience alias for results with [`RenderError`].
pub type Result<T> = std::result::Result<T, RenderError>;
