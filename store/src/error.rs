//! Error types for file-backed schema operations.
//!
//! Provides a unified error type covering I/O, serialization, unsupported
//! file formats, and invalid input paths.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or persisting schema files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is not one of the supported document formats.
    #[error("unsupported document format: '{}'", .0.display())]
    UnsupportedFormat(PathBuf),

    /// An output file could not be written.
    #[error("failed to write '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input paths are missing or unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
