//! Brew history.
//!
//! The history is an ordered, newest-first list of completed brew sessions.
//! It is persisted as one JSON array under a single storage key and every
//! mutation rewrites the whole collection before the in-memory copy changes.
//!
//! Consumers that want to follow changes call
//! [`BrewHistoryStore::subscribe`] and receive [`HistorySnapshot`]s.

pub mod error;
pub mod store;

pub use error::HistoryError;
pub use store::{BrewHistoryStore, HistorySnapshot, HISTORY_STORAGE_KEY};
