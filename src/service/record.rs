//! Stored form of a todo: the JSON shape kept under the collection key.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::todo::Todo;

/// A todo as persisted. Timestamps are RFC 3339 strings with millisecond
/// precision, e.g. `2024-03-01T12:00:00.000Z`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTodo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Todo> for StoredTodo {
    fn from(todo: &Todo) -> Self {
        StoredTodo {
            id: todo.id.clone(),
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: todo.completed,
            created_at: encode_timestamp(&todo.created_at),
            updated_at: encode_timestamp(&todo.updated_at),
        }
    }
}

impl TryFrom<StoredTodo> for Todo {
    type Error = String;

    fn try_from(stored: StoredTodo) -> Result<Self, Self::Error> {
        let created_at = decode_timestamp(&stored.created_at)
            .map_err(|e| format!("todo {}: bad createdAt: {}", stored.id, e))?;
        let updated_at = decode_timestamp(&stored.updated_at)
            .map_err(|e| format!("todo {}: bad updatedAt: {}", stored.id, e))?;

        Ok(Todo {
            id: stored.id,
            title: stored.title,
            description: stored.description,
            completed: stored.completed,
            created_at,
            updated_at,
        })
    }
}

fn encode_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|at| at.with_timezone(&Utc))
}

/// Encode a collection as the stored JSON array.
pub(crate) fn encode_collection(todos: &[Todo]) -> Result<String, serde_json::Error> {
    let stored: Vec<StoredTodo> = todos.iter().map(StoredTodo::from).collect();
    serde_json::to_string(&stored)
}

/// Decode the stored JSON array back into todos.
pub(crate) fn decode_collection(raw: &str) -> Result<Vec<Todo>, String> {
    let stored: Vec<StoredTodo> = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    stored.into_iter().map(Todo::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Todo {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Todo {
            id: "7d6c5a1e".to_string(),
            title: "Buy milk".to_string(),
            description: String::new(),
            completed: true,
            created_at: created,
            updated_at: created + chrono::Duration::milliseconds(1500),
        }
    }

    #[test]
    fn stored_shape_uses_camel_case_and_string_dates() {
        let json = encode_collection(&[sample()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value,
            serde_json::json!([{
                "id": "7d6c5a1e",
                "title": "Buy milk",
                "description": "",
                "completed": true,
                "createdAt": "2024-03-01T12:00:00.000Z",
                "updatedAt": "2024-03-01T12:00:01.500Z",
            }])
        );
    }

    #[test]
    fn decodes_what_it_encodes() {
        let json = encode_collection(&[sample()]).unwrap();
        assert_eq!(decode_collection(&json).unwrap(), vec![sample()]);
    }

    #[test]
    fn accepts_offsets_and_missing_optional_fields() {
        let raw = r#"[{"id":"a","title":"t","createdAt":"2024-03-01T13:00:00+01:00","updatedAt":"2024-03-01T12:00:00Z"}]"#;
        let todos = decode_collection(raw).unwrap();

        assert_eq!(todos[0].description, "");
        assert!(!todos[0].completed);
        assert_eq!(todos[0].created_at, todos[0].updated_at);
    }

    #[test]
    fn rejects_bad_dates() {
        let raw = r#"[{"id":"a","title":"t","createdAt":"yesterday","updatedAt":"2024-03-01T12:00:00Z"}]"#;
        let err = decode_collection(raw).unwrap_err();
        assert!(err.contains("bad createdAt"));
    }
}
