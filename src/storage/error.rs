//! Storage error types.

use thiserror::Error;

/// Errors raised by key-value stores.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key contains characters that cannot be stored.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// Reading a value failed.
    #[error("failed to read '{key}'")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing a value failed.
    #[error("failed to write '{key}'")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Deleting a value failed.
    #[error("failed to delete '{key}'")]
    Delete {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing store refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
