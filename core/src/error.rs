//! Error types for composition runs.
//!
//! Every variant is fatal: a composition either completes and persists
//! everything, or stops at the first failure. Class name clashes, attribute
//! type conflicts and unresolved references are not errors; they surface as
//! [`ComposeEvent`](crate::ComposeEvent)s instead.

use thiserror::Error;

/// Boxed error returned by loader, writer and sink collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort a composition.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A source document could not be read or parsed. Nothing is written.
    #[error("failed to load schema document {document}: {source}")]
    Load {
        document: String,
        #[source]
        source: BoxError,
    },

    /// The merged schema could not be persisted. No provenance is written.
    #[error("failed to write merged schema to {destination}: {source}")]
    Write {
        destination: String,
        #[source]
        source: BoxError,
    },

    /// A provenance record could not be persisted.
    #[error("failed to record provenance for {document}: {source}")]
    Provenance {
        document: String,
        #[source]
        source: BoxError,
    },

    /// A class name was registered twice. Signals a merge logic bug.
    #[error("class already registered: {0}")]
    DuplicateRegistration(String),
}

/// Convenience alias for results with [`ComposeError`].
pub type Result<T> = std::result::Result<T, ComposeError>;
