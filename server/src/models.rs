//! Todo entity and request payloads.
//!
//! Payloads arrive as raw JSON values so that type errors can be reported
//! per field as validation failures instead of generic body rejections.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use crate::service::ServiceError;

pub type TodoId = i64;

/// Upper bound on title length, matching the `VARCHAR(255)` column.
pub const MAX_TITLE_LEN: usize = 255;

/// A row from the `todos` table.
///
/// Timestamps are maintained by the store and are not part of the wire shape.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
}

/// Validated partial update. Absent fields are left untouched by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl CreateTodo {
    /// Parse `{ "title": string }`. The stored title is trimmed.
    pub fn from_json(body: &Value) -> Result<Self, ServiceError> {
        let fields = body
            .as_object()
            .ok_or_else(|| ServiceError::validation("body", "request body must be a JSON object"))?;
        let title = match fields.get("title") {
            Some(value) => parse_title(value)?,
            None => return Err(ServiceError::validation("title", "title is required")),
        };
        Ok(Self { title })
    }
}

impl TodoPatch {
    /// Parse `{ "title"?: string, "completed"?: bool }`. Unknown keys are ignored.
    pub fn from_json(body: &Value) -> Result<Self, ServiceError> {
        let fields = body
            .as_object()
            .ok_or_else(|| ServiceError::validation("body", "request body must be a JSON object"))?;

        let title = fields.get("title").map(parse_title).transpose()?;
        let completed = match fields.get("completed") {
            None => None,
            Some(Value::Bool(flag)) => Some(*flag),
            Some(_) => {
                return Err(ServiceError::validation(
                    "completed",
                    "completed must be a boolean",
                ))
            }
        };

        Ok(Self { title, completed })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

fn parse_title(value: &Value) -> Result<String, ServiceError> {
    let raw = value
        .as_str()
        .ok_or_else(|| ServiceError::validation("title", "title must be a string"))?;
    let title = raw.trim();
    if title.is_empty() {
        return Err(ServiceError::validation("title", "title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ServiceError::validation(
            "title",
            format!("title must be at most {MAX_TITLE_LEN} characters"),
        ));
    }
    Ok(title.to_string())
}
