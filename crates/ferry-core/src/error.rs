//! Error types for orchestration and the fallback engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a whole call.
///
/// Per-item failures are not errors; they travel through outcome lists and
/// the status sink.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Batch arrays were not positionally aligned.
    #[error(
        "batch arrays must be aligned ({sources} sources, {destinations} destinations, {policies} policies)"
    )]
    MisalignedBatch {
        sources: usize,
        destinations: usize,
        policies: usize,
    },

    /// The broker channel was torn down before a terminal response arrived.
    /// Treated as total batch failure; no partial history is produced.
    #[error("broker channel closed mid-flight")]
    ChannelClosed,

    /// The call was cancelled during a non-cancellable phase.
    #[error("operation cancelled")]
    Cancelled,

    /// Generic I/O error with path context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An invalid name was supplied for a rename or create.
    #[error("invalid name '{name}': {message}")]
    InvalidName { name: String, message: String },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl OpsError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid-name error.
    pub fn invalid_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            message: message.into(),
        }
    }
}
