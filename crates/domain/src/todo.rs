use crate::errors::DomainError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on a todo name after trimming
pub const MAX_NAME_LENGTH: usize = 200;

/// ToDo ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(String);

impl TodoId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Build an id from a path parameter or a stored attribute
    pub fn from_string(id: String) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidTodoId(
                "Todo ID cannot be empty".to_string(),
            ));
        }
        if id.contains('/') {
            return Err(DomainError::InvalidTodoId(format!(
                "Todo ID cannot contain '/': {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User ID (the `sub` claim of the caller's token)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn from_string(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidUserId(
                "User ID cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted todo, owned by exactly one user.
///
/// `(user_id, todo_id)` is the primary key; `user_id` never changes after
/// creation. `created_at` is empty for a record that was only ever written
/// by an update (updates do not require the item to exist).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub user_id: UserId,
    pub todo_id: TodoId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

impl TodoItem {
    /// Build a new, not yet persisted item with every default applied.
    pub fn new(
        user_id: UserId,
        todo_id: TodoId,
        request: CreateTodoRequest,
        bucket: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let attachment_url = attachment_url(bucket, &todo_id);
        Self {
            user_id,
            todo_id,
            created_at: format_timestamp(now),
            name: request.name,
            due_date: request.due_date,
            done: false,
            attachment_url: Some(attachment_url),
        }
    }

    /// Overwrite the three mutable fields. An absent due date clears it.
    pub fn apply_update(&mut self, update: &TodoUpdate) {
        self.name = update.name.clone();
        self.due_date = update.due_date.clone();
        self.done = update.done;
    }
}

/// The mutable projection of a [`TodoItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub done: bool,
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub name: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl CreateTodoRequest {
    /// Trim and check the request, returning the normalized form.
    pub fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            name: validate_name(&self.name)?,
            due_date: normalize_due_date(self.due_date),
        })
    }
}

/// Body of an update request; `name` and `done` are required
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    pub name: String,
    #[serde(default)]
    pub due_date: Option<String>,
    pub done: bool,
}

impl UpdateTodoRequest {
    pub fn validate(self) -> Result<TodoUpdate, DomainError> {
        Ok(TodoUpdate {
            name: validate_name(&self.name)?,
            due_date: normalize_due_date(self.due_date),
            done: self.done,
        })
    }
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::Validation(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

fn normalize_due_date(due_date: Option<String>) -> Option<String> {
    due_date
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Public object URL an attachment for `todo_id` will live at.
pub fn attachment_url(bucket: &str, todo_id: &TodoId) -> String {
    format!("https://{bucket}.s3.amazonaws.com/{}", todo_id.as_str())
}

/// `createdAt` format: RFC 3339, UTC, millisecond precision.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
