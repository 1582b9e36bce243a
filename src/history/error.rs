//! Brew history error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the brew history store.
///
/// Whenever one of these is returned the in-memory collection still holds
/// its last known good value.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Reading the persisted history failed.
    #[error("failed to load brew history")]
    Load(#[source] StorageError),

    /// Writing the updated history failed.
    #[error("failed to save brew history")]
    Save(#[source] StorageError),

    /// Removing the persisted history failed.
    #[error("failed to clear brew history")]
    Clear(#[source] StorageError),

    /// The history could not be serialized.
    #[error("failed to encode brew history: {0}")]
    Encode(#[from] serde_json::Error),
}

impl HistoryError {
    /// Short message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Load(_) => "Failed to load history",
            Self::Save(_) | Self::Encode(_) => "Failed to save history",
            Self::Clear(_) => "Failed to clear history",
        }
    }
}
