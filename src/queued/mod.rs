mod service;

pub use service::{Queueable, QueuedTodoService};
