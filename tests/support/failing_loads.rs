use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use todo_store::{
    CreateTodo, InMemoryStorage, LocalTodoService, StorageError, Todo, TodoError, TodoFilter,
    TodoService, TodoStats, UpdateTodo,
};

/// Service whose collection reads (`load_all`, `filter`) can be made to
/// return an error on demand. Mutations always go through.
#[derive(Clone)]
pub struct FailingLoads {
    inner: LocalTodoService<InMemoryStorage>,
    fail_loads: Arc<AtomicBool>,
}

impl FailingLoads {
    pub fn new() -> Self {
        Self {
            inner: super::service(),
            fail_loads: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn inner(&self) -> &LocalTodoService<InMemoryStorage> {
        &self.inner
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), TodoError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(TodoError::StorageRead(StorageError::read(
                "todos",
                "backend offline",
            )));
        }
        Ok(())
    }
}

impl TodoService for FailingLoads {
    fn load_all(&self) -> Result<Vec<Todo>, TodoError> {
        self.check()?;
        self.inner.load_all()
    }

    fn create(&self, input: CreateTodo) -> Result<Todo, TodoError> {
        self.inner.create(input)
    }

    fn update(&self, id: &str, updates: UpdateTodo) -> Result<Todo, TodoError> {
        self.inner.update(id, updates)
    }

    fn toggle(&self, id: &str) -> Result<Todo, TodoError> {
        self.inner.toggle(id)
    }

    fn delete(&self, id: &str) -> Result<bool, TodoError> {
        self.inner.delete(id)
    }

    fn delete_completed(&self) -> Result<usize, TodoError> {
        self.inner.delete_completed()
    }

    fn filter(&self, criteria: &TodoFilter) -> Result<Vec<Todo>, TodoError> {
        self.check()?;
        self.inner.filter(criteria)
    }

    fn stats(&self) -> Result<TodoStats, TodoError> {
        self.inner.stats()
    }
}
