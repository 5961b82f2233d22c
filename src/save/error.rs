//! Error types for the persistence layer.

use thiserror::Error;

/// Errors raised by a local key-value store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The store refused the write because it is full
    #[error("Storage quota exceeded while writing '{key}'")]
    QuotaExceeded {
        /// Key that was being written
        key: String,
    },

    /// The store cannot be reached at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Value could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO error of a file-backed store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a remote persistence backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never completed (network, timeout, promise rejection)
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The backend answered but refused the document
    #[error("Remote rejected save: {0}")]
    Rejected(String),

    /// No backend is configured
    #[error("Remote backend unavailable")]
    Unavailable,
}

/// Errors raised when a status target cannot be rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusViewError {
    /// The element the status is rendered into does not exist
    #[error("Status element not found: {id}")]
    MissingElement {
        /// Id or class of the missing element
        id: String,
    },
}

impl StatusViewError {
    /// Create a missing element error.
    pub fn missing(id: impl Into<String>) -> Self {
        Self::MissingElement { id: id.into() }
    }
}
