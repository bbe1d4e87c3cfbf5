//! Directory-backed key-value adapter.
//!
//! Each key maps to `<key>.json` in the data directory. Keys must form a
//! single plain file name, so a key can never escape the directory.

use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use super::atomic_io::write_atomic;
use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

const EXTENSION: &str = "json";

/// Key-value store persisting entries as files under one directory.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use cityeye::domain::ports::KeyValueStore;
/// use cityeye::outbound::FileKeyValueStore;
///
/// let store = FileKeyValueStore::open(Utf8Path::new("/var/lib/cityeye"))?;
/// store.set("cityeye-issues", "[]")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct FileKeyValueStore {
    root: Utf8PathBuf,
    dir: Dir,
}

impl FileKeyValueStore {
    /// Open `root`, creating it and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueStoreError::Write`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Utf8Path) -> Result<Self, KeyValueStoreError> {
        let authority = ambient_authority();
        Dir::create_ambient_dir_all(root, authority)
            .and_then(|()| Dir::open_ambient_dir(root, authority))
            .map(|dir| Self {
                root: root.to_path_buf(),
                dir,
            })
            .map_err(|err| KeyValueStoreError::write(root.as_str(), err.to_string()))
    }

    /// Directory holding the entries.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn file_name(key: &str) -> Result<String, KeyValueStoreError> {
        let candidate = Utf8Path::new(key);
        let mut components = candidate.components();
        match (components.next(), components.next()) {
            (Some(Utf8Component::Normal(name)), None) if name == key => {
                Ok(format!("{key}.{EXTENSION}"))
            }
            _ => Err(KeyValueStoreError::invalid_key(key)),
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let file_name = Self::file_name(key)?;
        match self.dir.read_to_string(&file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(KeyValueStoreError::read(key, err.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let file_name = Self::file_name(key)?;
        write_atomic(&self.dir, key, &file_name, value)?;
        debug!(key, bytes = value.len(), "entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let file_name = Self::file_name(key)?;
        match self.dir.remove_file(&file_name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(KeyValueStoreError::remove(key, err.to_string())),
        }
    }
}
