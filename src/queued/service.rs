use std::sync::Arc;

use crate::lock::{InMemoryLock, Lock, LockGuard};
use crate::service::{TodoError, TodoService};
use crate::todo::{CreateTodo, Todo, TodoFilter, TodoStats, UpdateTodo};

/// Serializes every operation of the wrapped service behind one lock.
///
/// Each load-mutate-store cycle runs to completion before the next one
/// starts, so overlapping calls no longer overwrite each other. Clones
/// share the lock; give every adapter or thread a clone of the same
/// `QueuedTodoService`.
pub struct QueuedTodoService<T> {
    inner: T,
    lock: Arc<dyn Lock>,
}

impl<T> QueuedTodoService<T> {
    pub fn new(inner: T) -> Self {
        Self::with_lock(inner, Arc::new(InMemoryLock::new()))
    }

    /// Wrap `inner` using an existing lock, e.g. one shared with another
    /// service writing the same storage key.
    pub fn with_lock(inner: T, lock: Arc<dyn Lock>) -> Self {
        QueuedTodoService { inner, lock }
    }

    /// Access the inner service.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Access the lock.
    pub fn lock(&self) -> &Arc<dyn Lock> {
        &self.lock
    }

    fn serialized<R>(&self, op: impl FnOnce(&T) -> Result<R, TodoError>) -> Result<R, TodoError> {
        let _guard = LockGuard::acquire(self.lock.as_ref())?;
        op(&self.inner)
    }
}

impl<T: Clone> Clone for QueuedTodoService<T> {
    fn clone(&self) -> Self {
        QueuedTodoService {
            inner: self.inner.clone(),
            lock: Arc::clone(&self.lock),
        }
    }
}

impl<T: TodoService> TodoService for QueuedTodoService<T> {
    fn load_all(&self) -> Result<Vec<Todo>, TodoError> {
        self.serialized(|inner| inner.load_all())
    }

    fn create(&self, input: CreateTodo) -> Result<Todo, TodoError> {
        self.serialized(|inner| inner.create(input))
    }

    fn update(&self, id: &str, updates: UpdateTodo) -> Result<Todo, TodoError> {
        self.serialized(|inner| inner.update(id, updates))
    }

    fn toggle(&self, id: &str) -> Result<Todo, TodoError> {
        self.serialized(|inner| inner.toggle(id))
    }

    fn delete(&self, id: &str) -> Result<bool, TodoError> {
        self.serialized(|inner| inner.delete(id))
    }

    fn delete_completed(&self) -> Result<usize, TodoError> {
        self.serialized(|inner| inner.delete_completed())
    }

    fn filter(&self, criteria: &TodoFilter) -> Result<Vec<Todo>, TodoError> {
        self.serialized(|inner| inner.filter(criteria))
    }

    fn stats(&self) -> Result<TodoStats, TodoError> {
        self.serialized(|inner| inner.stats())
    }
}

/// Extension trait for wrapping any service in a [`QueuedTodoService`].
pub trait Queueable: Sized {
    fn queued(self) -> QueuedTodoService<Self> {
        QueuedTodoService::new(self)
    }
}

impl<T: TodoService> Queueable for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::LocalTodoService;
    use crate::storage::InMemoryStorage;

    #[test]
    fn clones_share_the_lock() {
        let service = LocalTodoService::new(InMemoryStorage::new()).queued();
        let other = service.clone();
        assert!(Arc::ptr_eq(service.lock(), other.lock()));
    }

    #[test]
    fn lock_is_released_after_errors() {
        let service = LocalTodoService::new(InMemoryStorage::new()).queued();

        assert!(service.toggle("missing").is_err());
        assert!(service.lock().try_lock().unwrap());
        service.lock().unlock().unwrap();
    }

    #[test]
    fn delegates_to_inner_service() {
        let service = LocalTodoService::new(InMemoryStorage::new()).queued();
        service.create(CreateTodo::new("Buy milk")).unwrap();
        assert_eq!(service.stats().unwrap().total, 1);
    }
}
