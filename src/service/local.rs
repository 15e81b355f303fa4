//! LocalTodoService - the storage-backed todo service.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use super::record::{decode_collection, encode_collection};
use super::{TodoError, TodoService, TodoServiceOptions};
use crate::clock::{Clock, SystemClock};
use crate::storage::{StorageError, TodoStorage};
use crate::todo::{CreateTodo, Todo, TodoFilter, TodoStats, UpdateTodo};

/// Todo service over a key-value storage.
///
/// Holds no collection state of its own: every call loads the collection
/// from storage and every mutation writes all of it back. Clones share the
/// same storage handle when the storage is itself a shared handle (as
/// `InMemoryStorage` and `FileStorage` are).
///
/// Overlapping calls from several threads race on the whole collection
/// (last writer wins). Use [`Queueable::queued`](crate::Queueable::queued)
/// to serialize them.
#[derive(Clone)]
pub struct LocalTodoService<S> {
    storage: S,
    options: TodoServiceOptions,
    clock: Arc<dyn Clock>,
}

impl<S: TodoStorage> LocalTodoService<S> {
    /// Create a service storing under the default `"todos"` key.
    pub fn new(storage: S) -> Self {
        Self::with_options(storage, TodoServiceOptions::default())
    }

    pub fn with_options(storage: S, options: TodoServiceOptions) -> Self {
        Self {
            storage,
            options,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_key(&self) -> &str {
        &self.options.storage_key
    }

    /// Load the collection, surfacing read and decode failures instead of
    /// falling back to an empty collection.
    pub fn try_load_all(&self) -> Result<Vec<Todo>, TodoError> {
        let key = self.storage_key();
        let raw = self
            .storage
            .get_item(key)
            .map_err(TodoError::StorageRead)?;

        match raw {
            None => Ok(Vec::new()),
            Some(raw) => decode_collection(&raw)
                .map_err(|reason| TodoError::StorageRead(StorageError::read(key, reason))),
        }
    }

    /// Look up a single todo.
    pub fn get(&self, id: &str) -> Result<Option<Todo>, TodoError> {
        Ok(self.load().into_iter().find(|todo| todo.id == id))
    }

    /// Remove the persisted collection entirely. Returns true if it existed.
    pub fn clear(&self) -> Result<bool, TodoError> {
        let removed = self
            .storage
            .remove_item(self.storage_key())
            .map_err(TodoError::StorageWrite)?;
        tracing::debug!(key = self.storage_key(), removed, "cleared todo collection");
        Ok(removed)
    }

    fn load(&self) -> Vec<Todo> {
        match self.try_load_all() {
            Ok(todos) => todos,
            Err(e) => {
                tracing::warn!(
                    key = self.storage_key(),
                    error = %e,
                    "failed to load todo collection, treating it as empty"
                );
                Vec::new()
            }
        }
    }

    fn persist(&self, todos: &[Todo]) -> Result<(), TodoError> {
        let key = self.storage_key();
        let raw = encode_collection(todos)
            .map_err(|e| TodoError::StorageWrite(StorageError::write(key, e)))?;
        self.storage
            .set_item(key, &raw)
            .map_err(TodoError::StorageWrite)?;
        tracing::debug!(key, count = todos.len(), "persisted todo collection");
        Ok(())
    }

    /// Clock reading cut to the precision the stored form keeps.
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(3)
    }

    /// Mutation timestamp for `todo`, never earlier than its creation.
    fn touch(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        self.now().max(created_at)
    }

    /// Load, apply `change` to the todo with `id` in place, persist.
    fn modify<F>(&self, id: &str, change: F) -> Result<Todo, TodoError>
    where
        F: FnOnce(&mut Todo),
    {
        let mut todos = self.load();
        let todo = todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or_else(|| TodoError::NotFound { id: id.to_string() })?;

        change(todo);
        todo.updated_at = self.touch(todo.created_at);
        let updated = todo.clone();

        self.persist(&todos)?;
        Ok(updated)
    }
}

fn required_title(title: &str) -> Result<String, TodoError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TodoError::Validation("title is required".to_string()));
    }
    Ok(title.to_string())
}

impl<S: TodoStorage> TodoService for LocalTodoService<S> {
    fn load_all(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.load())
    }

    fn create(&self, input: CreateTodo) -> Result<Todo, TodoError> {
        let title = required_title(&input.title)?;
        let now = self.now();
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            title,
            description: input
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        };

        let mut todos = self.load();
        todos.push(todo.clone());
        self.persist(&todos)?;

        Ok(todo)
    }

    fn update(&self, id: &str, updates: UpdateTodo) -> Result<Todo, TodoError> {
        let title = updates.title.as_deref().map(required_title).transpose()?;

        self.modify(id, |todo| {
            if let Some(title) = title {
                todo.title = title;
            }
            if let Some(description) = updates.description {
                todo.description = description.trim().to_string();
            }
            if let Some(completed) = updates.completed {
                todo.completed = completed;
            }
        })
    }

    fn toggle(&self, id: &str) -> Result<Todo, TodoError> {
        self.modify(id, |todo| todo.completed = !todo.completed)
    }

    fn delete(&self, id: &str) -> Result<bool, TodoError> {
        let mut todos = self.load();
        let before = todos.len();
        todos.retain(|todo| todo.id != id);

        if todos.len() == before {
            return Ok(false);
        }

        self.persist(&todos)?;
        Ok(true)
    }

    fn delete_completed(&self) -> Result<usize, TodoError> {
        let mut todos = self.load();
        let before = todos.len();
        todos.retain(|todo| !todo.completed);
        let removed = before - todos.len();

        if removed > 0 {
            self.persist(&todos)?;
        }
        Ok(removed)
    }

    fn filter(&self, criteria: &TodoFilter) -> Result<Vec<Todo>, TodoError> {
        Ok(criteria.apply(self.load()))
    }

    fn stats(&self) -> Result<TodoStats, TodoError> {
        Ok(TodoStats::from_todos(&self.load()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;

    fn service() -> LocalTodoService<InMemoryStorage> {
        LocalTodoService::new(InMemoryStorage::new())
    }

    #[test]
    fn create_trims_and_defaults() {
        let service = service();
        let todo = service
            .create(CreateTodo::new("  Buy milk ").with_description("  2% "))
            .unwrap();

        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description, "2%");
        assert!(!todo.completed);
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[test]
    fn blank_title_is_rejected_before_storage_access() {
        let service = service();
        let err = service.create(CreateTodo::new(" \t ")).unwrap_err();

        assert!(matches!(err, TodoError::Validation(_)));
        assert!(service.storage().is_empty());
    }

    #[test]
    fn update_rejects_blank_title() {
        let service = service();
        let todo = service.create(CreateTodo::new("Buy milk")).unwrap();

        let err = service
            .update(&todo.id, UpdateTodo::new().title("  "))
            .unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
        assert_eq!(service.get(&todo.id).unwrap().unwrap().title, "Buy milk");
    }

    #[test]
    fn corrupt_blob_reads_as_empty_but_strict_load_fails() {
        let service = service();
        service.storage().set_item("todos", "{not json").unwrap();

        assert!(service.load_all().unwrap().is_empty());
        assert!(matches!(
            service.try_load_all(),
            Err(TodoError::StorageRead(StorageError::Read { .. }))
        ));
    }

    #[test]
    fn custom_storage_key() {
        let storage = InMemoryStorage::new();
        let service = LocalTodoService::with_options(
            storage.clone(),
            TodoServiceOptions::default().with_storage_key("work"),
        );
        service.create(CreateTodo::new("Ship it")).unwrap();

        assert!(storage.get_item("work").unwrap().is_some());
        assert!(storage.get_item("todos").unwrap().is_none());
    }

    #[test]
    fn clear_removes_the_entry() {
        let service = service();
        service.create(CreateTodo::new("Buy milk")).unwrap();

        assert!(service.clear().unwrap());
        assert!(!service.clear().unwrap());
        assert!(service.load_all().unwrap().is_empty());
    }
}
