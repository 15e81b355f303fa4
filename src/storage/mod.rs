//! Storage - the key-value medium the todo collection is persisted in.
//!
//! A storage holds text values under string keys, the way browser local
//! storage does. The service keeps the whole collection under one key and
//! rewrites it on every mutation.
//!
//! ## Example
//!
//! ```ignore
//! use todo_store::{InMemoryStorage, TodoStorage};
//!
//! let storage = InMemoryStorage::new();
//! storage.set_item("todos", "[]")?;
//! assert_eq!(storage.get_item("todos")?.as_deref(), Some("[]"));
//! ```

mod file;
mod in_memory;

use std::fmt;

/// Abstract key-value storage for text blobs.
pub trait TodoStorage: Send + Sync {
    /// Read the value stored under `key`. Returns None if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Returns true if it existed.
    fn remove_item(&self, key: &str) -> Result<bool, StorageError>;
}

impl<S: TodoStorage + ?Sized> TodoStorage for std::sync::Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove_item(key)
    }
}

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Reading or decoding the stored value failed.
    Read { key: String, reason: String },
    /// Encoding or writing the value failed.
    Write { key: String, reason: String },
    /// An internal lock was poisoned.
    Poisoned(&'static str),
}

impl StorageError {
    pub fn read(key: &str, reason: impl fmt::Display) -> Self {
        StorageError::Read {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn write(key: &str, reason: impl fmt::Display) -> Self {
        StorageError::Write {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Read { key, reason } => {
                write!(f, "failed to read storage key {}: {}", key, reason)
            }
            StorageError::Write { key, reason } => {
                write!(f, "failed to write storage key {}: {}", key, reason)
            }
            StorageError::Poisoned(operation) => {
                write!(f, "storage lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for StorageError {}

pub use file::FileStorage;
pub use in_memory::InMemoryStorage;
