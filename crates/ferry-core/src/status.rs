//! The closed filesystem status taxonomy.

use serde::{Deserialize, Serialize};

/// Outcome category of a filesystem operation, derived from the worker's
/// native result codes by the broker's classifier.
///
/// The taxonomy is closed: new native codes extend the classifier table,
/// not this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    /// The operation completed.
    Success,
    /// An unclassified failure.
    Generic,
    /// The caller lacks the privilege to perform the operation.
    Unauthorized,
    /// A source or destination is locked by another process.
    InUse,
    /// A path exceeds the length the target store accepts.
    NameTooLong,
    /// A source no longer exists.
    NotFound,
    /// The destination already exists.
    AlreadyExists,
    /// The destination is not a folder.
    NotAFolder,
    /// A required property was missing.
    PropertyNotFound,
    /// A request argument was rejected.
    InvalidArgument,
}

impl StatusCode {
    /// Whether this code reports success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Generic => write!(f, "Operation failed"),
            Self::Unauthorized => write!(f, "Access denied"),
            Self::InUse => write!(f, "Item is in use"),
            Self::NameTooLong => write!(f, "Path is too long"),
            Self::NotFound => write!(f, "Item not found"),
            Self::AlreadyExists => write!(f, "Item already exists"),
            Self::NotAFolder => write!(f, "Destination is not a folder"),
            Self::PropertyNotFound => write!(f, "Property not found"),
            Self::InvalidArgument => write!(f, "Invalid argument"),
        }
    }
}
