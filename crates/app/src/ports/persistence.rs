//! Persistence port — opaque byte blobs stored under fixed keys.
//!
//! The inventory store writes its whole item collection under one key and the
//! credential store writes the API key under another. Adapters decide where
//! the bytes live (a directory of files, memory, …).

use std::sync::Arc;

use fridge_domain::error::FridgeError;

/// Key/value persistence for small local documents.
///
/// Calls are synchronous: the store is local and fast, and inventory
/// mutations must be observable as atomic by the caller.
pub trait KeyValueStore {
    /// Read the bytes saved under `key`, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Storage`] when the backing medium fails.
    fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, FridgeError>;

    /// Replace whatever is saved under `key` with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Storage`] when the backing medium fails.
    fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<(), FridgeError>;
}

impl<T: KeyValueStore> KeyValueStore for Arc<T> {
    fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, FridgeError> {
        (**self).read_bytes(key)
    }

    fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<(), FridgeError> {
        (**self).write_bytes(key, bytes)
    }
}

impl<T: KeyValueStore> KeyValueStore for &T {
    fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, FridgeError> {
        (**self).read_bytes(key)
    }

    fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<(), FridgeError> {
        (**self).write_bytes(key, bytes)
    }
}
