//! FileStorage - one file per key inside a directory.
//!
//! `key` is stored at `<dir>/<key>.json`. Every write lands in its own
//! uniquely named temporary file in the same directory and is then
//! renamed into place, so readers never see a partial blob and
//! concurrent writers never share a scratch file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{StorageError, TodoStorage};

/// Directory-backed key-value storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (or create) a storage rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory holding the entries.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Option<PathBuf> {
        valid_key(key).then(|| self.dir.join(format!("{}.json", key)))
    }
}

fn valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl TodoStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self
            .path_for(key)
            .ok_or_else(|| StorageError::read(key, "invalid key"))?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::read(key, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self
            .path_for(key)
            .ok_or_else(|| StorageError::write(key, "invalid key"))?;

        // The temp file is removed on drop if anything below fails.
        let write = || -> io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&self.dir)?;
            tmp.write_all(value.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        };

        write().map_err(|e| StorageError::write(key, e))
    }

    fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        let path = self
            .path_for(key)
            .ok_or_else(|| StorageError::write(key, "invalid key"))?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::write(key, e)),
        }
    }
}
