//! Key-value persistence.
//!
//! Values are opaque strings addressed by a key. The brew history stores its
//! whole collection under a single key.
//!
//! - `file`: one file per key with atomic replacement
//! - `memory`: in-process map with failure injection for tests

pub mod error;
pub mod file;
pub mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Asynchronous string key-value store.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Returns the value for `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        T::get(self, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        T::set(self, key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        T::delete(self, key).await
    }
}

/// Returns true if `key` only uses characters that are safe as a file name.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
