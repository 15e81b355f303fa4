//! Todo collection persistence over a single key-value entry.
//!
//! The crate is layered leaf-first:
//!
//! - [`todo`]: the `Todo` record and the create/update/filter/stats contracts.
//! - [`storage`]: the key-value medium (`InMemoryStorage`, `FileStorage`).
//! - [`service`]: `LocalTodoService`, which loads, mutates and rewrites the
//!   whole collection on every operation. Reads fail open, writes fail closed.
//! - [`queued`]: `QueuedTodoService`, an opt-in wrapper serializing operations.
//! - [`adapter`]: `TodoAdapter`, a cached and observable view with an explicit
//!   `Idle/Loading/Ready/Error` state machine.

pub mod adapter;
mod clock;
pub mod lock;
pub mod queued;
pub mod service;
pub mod storage;
pub mod todo;

pub use adapter::{AdapterState, TodoAdapter};
pub use clock::{Clock, SystemClock};
pub use lock::{InMemoryLock, Lock, LockError, LockGuard};
pub use queued::{Queueable, QueuedTodoService};
pub use service::{
    LocalTodoService, StoredTodo, TodoError, TodoService, TodoServiceOptions,
    DEFAULT_STORAGE_KEY,
};
pub use storage::{FileStorage, InMemoryStorage, StorageError, TodoStorage};
pub use todo::{CreateTodo, Todo, TodoFilter, TodoStats, UpdateTodo, TITLE_MAX_LEN};
