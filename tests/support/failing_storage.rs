use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use todo_store::{InMemoryStorage, StorageError, TodoStorage};

/// In-memory storage whose reads and writes can be made to fail on demand.
#[derive(Clone, Default)]
pub struct FailingStorage {
    inner: InMemoryStorage,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl FailingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryStorage {
        &self.inner
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl TodoStorage for FailingStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::read(key, "read rejected"));
        }
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::write(key, "quota exceeded"));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::write(key, "quota exceeded"));
        }
        self.inner.remove_item(key)
    }
}
