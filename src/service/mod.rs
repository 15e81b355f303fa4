//! Service - persistence operations over the todo collection.
//!
//! Every operation is a full cycle: load the whole collection from its
//! storage key, apply the change, write the whole collection back. Reads
//! fail open (a missing or corrupt blob reads as an empty collection);
//! writes fail closed.
//!
//! ## Example
//!
//! ```ignore
//! use todo_store::{CreateTodo, InMemoryStorage, LocalTodoService, TodoService};
//!
//! let service = LocalTodoService::new(InMemoryStorage::new());
//! let todo = service.create(CreateTodo::new("Buy milk"))?;
//! service.toggle(&todo.id)?;
//! assert_eq!(service.stats()?.completed, 1);
//! ```

mod local;
mod record;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::lock::LockError;
use crate::storage::StorageError;
use crate::todo::{CreateTodo, Todo, TodoFilter, TodoStats, UpdateTodo};

pub use local::LocalTodoService;
pub use record::StoredTodo;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// The operations a todo service exposes.
///
/// `LocalTodoService` is the storage-backed implementation;
/// `QueuedTodoService` wraps any implementation to serialize calls.
pub trait TodoService {
    /// Load the whole collection in stored order.
    fn load_all(&self) -> Result<Vec<Todo>, TodoError>;

    /// Create and append a new todo.
    fn create(&self, input: CreateTodo) -> Result<Todo, TodoError>;

    /// Merge `updates` onto the todo with `id`, keeping its position.
    fn update(&self, id: &str, updates: UpdateTodo) -> Result<Todo, TodoError>;

    /// Flip `completed` on the todo with `id`.
    fn toggle(&self, id: &str) -> Result<Todo, TodoError>;

    /// Remove the todo with `id`. Returns true if it existed.
    fn delete(&self, id: &str) -> Result<bool, TodoError>;

    /// Remove every completed todo. Returns how many were removed.
    fn delete_completed(&self) -> Result<usize, TodoError>;

    /// Todos matching `criteria`, in stored order.
    fn filter(&self, criteria: &TodoFilter) -> Result<Vec<Todo>, TodoError>;

    /// Counts over the whole collection.
    fn stats(&self) -> Result<TodoStats, TodoError>;
}

macro_rules! forward_todo_service {
    ($($ty:ty),*) => {$(
        impl<T: TodoService + ?Sized> TodoService for $ty {
            fn load_all(&self) -> Result<Vec<Todo>, TodoError> {
                (**self).load_all()
            }

            fn create(&self, input: CreateTodo) -> Result<Todo, TodoError> {
                (**self).create(input)
            }

            fn update(&self, id: &str, updates: UpdateTodo) -> Result<Todo, TodoError> {
                (**self).update(id, updates)
            }

            fn toggle(&self, id: &str) -> Result<Todo, TodoError> {
                (**self).toggle(id)
            }

            fn delete(&self, id: &str) -> Result<bool, TodoError> {
                (**self).delete(id)
            }

            fn delete_completed(&self) -> Result<usize, TodoError> {
                (**self).delete_completed()
            }

            fn filter(&self, criteria: &TodoFilter) -> Result<Vec<Todo>, TodoError> {
                (**self).filter(criteria)
            }

            fn stats(&self) -> Result<TodoStats, TodoError> {
                (**self).stats()
            }
        }
    )*};
}

forward_todo_service!(&T, Arc<T>, Box<T>);

/// Service configuration.
///
/// Deserializable so hosts can keep it alongside their own settings:
///
/// ```ignore
/// let options = TodoServiceOptions::from_json(r#"{"storage_key":"work-todos"}"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoServiceOptions {
    /// Key the collection blob is stored under.
    pub storage_key: String,
}

impl Default for TodoServiceOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl TodoServiceOptions {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Error type for todo service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Input failed a precondition. Raised before any storage access.
    Validation(String),
    /// No todo with this id exists in the collection.
    NotFound { id: String },
    /// Reading the collection failed. Only surfaced by strict loads.
    StorageRead(StorageError),
    /// Writing the collection failed. Always surfaced.
    StorageWrite(StorageError),
    /// The collection lock could not be taken or released.
    Lock(LockError),
}

impl fmt::Display for TodoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoError::Validation(msg) => write!(f, "validation failed: {}", msg),
            TodoError::NotFound { id } => write!(f, "todo not found: {}", id),
            TodoError::StorageRead(err) => write!(f, "storage read failed: {}", err),
            TodoError::StorageWrite(err) => write!(f, "storage write failed: {}", err),
            TodoError::Lock(err) => write!(f, "collection lock failed: {}", err),
        }
    }
}

impl std::error::Error for TodoError {}

impl From<LockError> for TodoError {
    fn from(value: LockError) -> Self {
        TodoError::Lock(value)
    }
}
