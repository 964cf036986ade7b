//! # fridge-adapter-storage-fs
//!
//! Filesystem implementation of the [`KeyValueStore`] port.
//!
//! Each key maps to one file inside a data directory. Writes go to a
//! temporary sibling first and are renamed into place, so a crash mid-write
//! leaves the previous document intact.
//!
//! ## Dependency rule
//!
//! Depends on `fridge-app` (port traits) and `fridge-domain` only.

mod error;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fridge_app::ports::KeyValueStore;
use fridge_domain::error::FridgeError;

pub use error::FsStorageError;

/// Key/value store backed by files in a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Use `dir` as the data directory. It is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, FsStorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(FsStorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, FridgeError> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => {
                tracing::trace!(path = %path.display(), size = bytes.len(), "read stored document");
                Ok(Some(bytes))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FsStorageError::Io { path, source }.into()),
        }
    }

    fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<(), FridgeError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| FsStorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let tmp_path = self.dir.join(format!(".{key}.tmp"));
        std::fs::write(&tmp_path, bytes).map_err(|source| FsStorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        if let Err(source) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(FsStorageError::Io { path, source }.into());
        }

        tracing::trace!(path = %path.display(), size = bytes.len(), "wrote stored document");
        Ok(())
    }
}
