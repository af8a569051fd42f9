//! Storage capability for the persisted store snapshot.
//!
//! The store writes its whole state as one named string blob. Where that blob
//! lives is up to the [`StateStorage`] implementation handed to the store:
//!
//! - [`MemoryStorage`]: a shared in-process map, cloned handles see the same data
//! - [`FileStorage`]: one `<name>.json` file per blob inside a directory

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised by a [`StateStorage`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("Storage I/O failed for '{name}': {source}")]
    Io {
        /// Blob name.
        name: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The blob name cannot be mapped onto the backing medium.
    #[error("Invalid storage name '{name}'")]
    InvalidName {
        /// Blob name.
        name: String,
    },
}

/// Get/set access to named string blobs.
pub trait StateStorage: Send + Sync {
    /// Returns the blob stored under `name`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be read.
    fn get_item(&self, name: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `name`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be written.
    fn set_item(&self, name: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// the store wrote.
///
/// ```rust
/// use shopify_product::store::{MemoryStorage, StateStorage};
///
/// let storage = MemoryStorage::new();
/// let handle = storage.clone();
/// storage.set_item("blob", "{}").unwrap();
/// assert_eq!(handle.get_item("blob").unwrap().as_deref(), Some("{}"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn get_item(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().get(name).cloned())
    }

    fn set_item(&self, name: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .lock()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed storage, one `<name>.json` file per blob.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `dir`. The directory is created on the
    /// first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory blobs are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !name.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

impl StateStorage for FileStorage {
    fn get_item(&self, name: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(name)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }

    fn set_item(&self, name: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        let io_error = |source| StorageError::Io {
            name: name.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_error)?;
        // Replace atomically; readers see the old blob or the new one.
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_error)?;
        tmp.write_all(value.as_bytes()).map_err(io_error)?;
        tmp.persist(&path).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}
