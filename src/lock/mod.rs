//! Locks that serialize whole load-mutate-store cycles.
//!
//! The plain service runs each cycle unguarded, so two overlapping calls
//! can overwrite each other's collection. `QueuedTodoService` holds one of
//! these locks around every operation.

mod error;
mod in_memory;

pub use error::LockError;
pub use in_memory::InMemoryLock;

/// Trait for a single lock instance.
///
/// Implementations provide blocking lock, non-blocking try-lock, and unlock.
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until it becomes available.
    fn lock(&self) -> Result<(), LockError>;

    /// Try to acquire the lock without blocking.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock.
    fn unlock(&self) -> Result<(), LockError>;
}

/// Holds a lock until dropped.
pub struct LockGuard<'a, L: Lock + ?Sized> {
    lock: &'a L,
}

impl<'a, L: Lock + ?Sized> LockGuard<'a, L> {
    /// Block until `lock` is acquired.
    pub fn acquire(lock: &'a L) -> Result<Self, LockError> {
        lock.lock()?;
        Ok(Self { lock })
    }
}

impl<L: Lock + ?Sized> Drop for LockGuard<'_, L> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.unlock() {
            tracing::warn!(error = %e, "failed to release collection lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_releases_on_drop() {
        let lock = InMemoryLock::new();
        {
            let _guard = LockGuard::acquire(&lock).unwrap();
            assert!(!lock.try_lock().unwrap());
        }
        assert!(lock.try_lock().unwrap());
        lock.unlock().unwrap();
    }
}
