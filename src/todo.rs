//! Todo entity and the data contracts used to create, update, filter and
//! summarize it.
//!
//! Nothing here touches storage. Timestamps are native `DateTime<Utc>`
//! values; the string encoding lives at the persistence boundary in
//! [`crate::service`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title length accepted by presentation forms.
///
/// Not enforced by the entity or the service.
pub const TITLE_MAX_LEN: usize = 200;

/// A single task in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Case-insensitive substring match against title or description.
    ///
    /// `needle` must already be lowercased.
    fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Input for creating a todo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

/// Filter criteria. Both constraints are conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(
        default,
        rename = "searchQuery",
        skip_serializing_if = "Option::is_none"
    )]
    pub search_query: Option<String>,
}

impl TodoFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    /// Returns true if `todo` satisfies every constraint that is set.
    ///
    /// A blank search query matches everything.
    pub fn matches(&self, todo: &Todo) -> bool {
        if let Some(completed) = self.completed {
            if todo.completed != completed {
                return false;
            }
        }

        match self.search_query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => todo.mentions(&query.to_lowercase()),
            _ => true,
        }
    }

    /// Applies the filter, keeping collection order.
    pub fn apply(&self, todos: Vec<Todo>) -> Vec<Todo> {
        todos.into_iter().filter(|todo| self.matches(todo)).collect()
    }
}

/// Collection counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TodoStats {
    pub fn from_todos(todos: &[Todo]) -> Self {
        let total = todos.len();
        let completed = todos.iter().filter(|todo| todo.completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }
}
