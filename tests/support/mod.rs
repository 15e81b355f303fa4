#![allow(dead_code)]

pub mod clock;
pub mod failing_loads;
pub mod failing_storage;

use todo_store::{InMemoryStorage, LocalTodoService};

pub use clock::StepClock;
pub use failing_loads::FailingLoads;
pub use failing_storage::FailingStorage;

/// Service over fresh in-memory storage with a stepping clock.
pub fn service() -> LocalTodoService<InMemoryStorage> {
    LocalTodoService::new(InMemoryStorage::new()).with_clock(StepClock::new())
}
