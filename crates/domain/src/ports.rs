//! Storage seams the business logic is written against.
//!
//! The AWS-backed implementations live in the `infrastructure` crate; tests
//! swap in in-memory versions.

use crate::errors::TodoError;
use crate::todo::{TodoId, TodoItem, TodoUpdate, UserId};
use async_trait::async_trait;

/// Key-value persistence for [`TodoItem`] records, keyed by `(user_id, todo_id)`.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Every item owned by `user_id`, in store order
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<TodoItem>, TodoError>;

    async fn get(&self, user_id: &UserId, todo_id: &TodoId)
        -> Result<Option<TodoItem>, TodoError>;

    /// Unconditional insert-or-overwrite of the full record
    async fn put(&self, item: &TodoItem) -> Result<(), TodoError>;

    /// Unconditional overwrite of name, due date and done flag
    async fn update(
        &self,
        user_id: &UserId,
        todo_id: &TodoId,
        update: &TodoUpdate,
    ) -> Result<(), TodoError>;

    async fn delete(&self, user_id: &UserId, todo_id: &TodoId) -> Result<(), TodoError>;

    async fn update_attachment_url(
        &self,
        user_id: &UserId,
        todo_id: &TodoId,
        attachment_url: &str,
    ) -> Result<(), TodoError>;
}

/// Object storage for attachments.
#[async_trait]
pub trait AttachmentStorage: Send + Sync {
    /// Time-limited URL authorizing a single upload to `key`
    async fn presigned_upload_url(&self, key: &str) -> Result<String, TodoError>;
}
