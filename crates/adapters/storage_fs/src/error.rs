//! Storage-specific error type wrapping filesystem errors.

use std::path::PathBuf;

use fridge_domain::error::FridgeError;

/// Errors originating from the filesystem storage layer.
#[derive(Debug, thiserror::Error)]
pub enum FsStorageError {
    /// Reading, writing, or renaming a file failed.
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be used as a file name.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

impl From<FsStorageError> for FridgeError {
    fn from(err: FsStorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
