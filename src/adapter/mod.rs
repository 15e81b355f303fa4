//! Adapter - a cached, observable view of the todo collection.
//!
//! `TodoAdapter` loads the collection once, keeps it in memory and wraps
//! each service operation so that it clears the previous error, delegates
//! to the service, reloads the cache and records any failure. Its state
//! moves through an explicit `Idle/Loading/Ready/Error` machine.
//!
//! ## Example
//!
//! ```ignore
//! use todo_store::{CreateTodo, InMemoryStorage, LocalTodoService, TodoAdapter};
//!
//! let mut todos = TodoAdapter::open(LocalTodoService::new(InMemoryStorage::new()));
//! let created = todos.create_todo(CreateTodo::new("Buy milk"))?;
//! todos.toggle_todo(&created.id)?;
//! assert_eq!(todos.stats().completed, 1);
//! ```

#[cfg(feature = "emitter")]
mod events;
mod state;

pub use state::AdapterState;

use crate::service::{TodoError, TodoService};
use crate::todo::{CreateTodo, Todo, TodoFilter, TodoStats, UpdateTodo};

#[cfg(feature = "emitter")]
use events::AdapterEvents;

/// Reactive wrapper over a [`TodoService`].
///
/// The cache holds the full collection, or the filtered view when the
/// adapter was built with criteria. Share one storage between several
/// adapters by giving each a clone of the same service.
pub struct TodoAdapter<T> {
    service: T,
    criteria: Option<TodoFilter>,
    todos: Vec<Todo>,
    state: AdapterState,
    error: Option<String>,
    #[cfg(feature = "emitter")]
    events: AdapterEvents,
}

impl<T: TodoService> TodoAdapter<T> {
    /// Create an idle adapter. Call [`start`](Self::start) to load.
    pub fn new(service: T) -> Self {
        TodoAdapter {
            service,
            criteria: None,
            todos: Vec::new(),
            state: AdapterState::Idle,
            error: None,
            #[cfg(feature = "emitter")]
            events: AdapterEvents::new(),
        }
    }

    /// Cache only the todos matching `criteria`.
    pub fn with_filter(mut self, criteria: TodoFilter) -> Self {
        self.criteria = Some(criteria);
        self
    }

    /// Create an adapter and run its initial load.
    ///
    /// A failed load leaves the adapter in `Error` with the message in
    /// [`error`](Self::error).
    pub fn open(service: T) -> Self {
        let mut adapter = Self::new(service);
        let _ = adapter.start();
        adapter
    }

    /// Like [`open`](Self::open), caching only todos matching `criteria`.
    pub fn open_filtered(service: T, criteria: TodoFilter) -> Self {
        let mut adapter = Self::new(service).with_filter(criteria);
        let _ = adapter.start();
        adapter
    }

    /// Run the initial load.
    pub fn start(&mut self) -> Result<(), TodoError> {
        self.refresh()
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    /// The cached collection.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn state(&self) -> AdapterState {
        self.state
    }

    /// True while a load or an operation is in flight.
    pub fn loading(&self) -> bool {
        self.state == AdapterState::Loading
    }

    /// Message of the most recent failure, cleared when the next
    /// operation starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Counts over the cached todos. May lag storage until the reload
    /// that follows every mutation completes.
    pub fn stats(&self) -> TodoStats {
        TodoStats::from_todos(&self.todos)
    }

    /// Criteria the cache is filtered by, if any.
    pub fn filter(&self) -> Option<&TodoFilter> {
        self.criteria.as_ref()
    }

    pub fn service(&self) -> &T {
        &self.service
    }

    // ------------------------------------------------------------------
    // Write side
    // ------------------------------------------------------------------

    pub fn create_todo(&mut self, input: CreateTodo) -> Result<Todo, TodoError> {
        self.run(|service| service.create(input))
    }

    pub fn update_todo(&mut self, id: &str, updates: UpdateTodo) -> Result<Todo, TodoError> {
        self.run(|service| service.update(id, updates))
    }

    pub fn toggle_todo(&mut self, id: &str) -> Result<Todo, TodoError> {
        self.run(|service| service.toggle(id))
    }

    pub fn delete_todo(&mut self, id: &str) -> Result<bool, TodoError> {
        self.run(|service| service.delete(id))
    }

    pub fn delete_completed(&mut self) -> Result<usize, TodoError> {
        self.run(|service| service.delete_completed())
    }

    /// Reload the cache from the service.
    pub fn refresh(&mut self) -> Result<(), TodoError> {
        self.begin();
        self.reload()
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    /// Register a listener receiving the new state's name (`"loading"`,
    /// `"ready"`, ...) on every transition. Returns the listener id.
    #[cfg(feature = "emitter")]
    pub fn on_state_change<F>(&mut self, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.events.on_state_change(listener)
    }

    /// Register a listener receiving every recorded error message.
    #[cfg(feature = "emitter")]
    pub fn on_error<F>(&mut self, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.events.on_error(listener)
    }

    /// Remove a listener by id. Returns true if it was registered.
    #[cfg(feature = "emitter")]
    pub fn remove_listener(&mut self, id: &str) -> bool {
        self.events.remove_listener(id)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Clear the error slot, delegate, then reload on success.
    ///
    /// A failed reload after a successful operation is recorded in the
    /// error slot but does not fail the operation.
    fn run<R>(&mut self, op: impl FnOnce(&T) -> Result<R, TodoError>) -> Result<R, TodoError> {
        self.begin();

        match op(&self.service) {
            Ok(value) => {
                let _ = self.reload();
                Ok(value)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    fn begin(&mut self) {
        self.error = None;
        self.transition(AdapterState::Loading);
    }

    fn reload(&mut self) -> Result<(), TodoError> {
        let loaded = match &self.criteria {
            Some(criteria) => self.service.filter(criteria),
            None => self.service.load_all(),
        };

        match loaded {
            Ok(todos) => {
                self.todos = todos;
                self.transition(AdapterState::Ready);
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    fn fail(&mut self, e: &TodoError) {
        let message = e.to_string();
        #[cfg(feature = "emitter")]
        self.events.error_recorded(&message);
        self.error = Some(message);
        self.transition(AdapterState::Error);
    }

    fn transition(&mut self, next: AdapterState) {
        if self.state == next {
            return;
        }
        tracing::debug!(from = %self.state, to = %next, "todo adapter state changed");
        self.state = next;
        #[cfg(feature = "emitter")]
        self.events.state_changed(next);
    }
}
