//! In-memory ports and token helpers for unit tests.

use crate::todos::TodoService;
use async_trait::async_trait;
use domain::{
    AttachmentStorage, TodoError, TodoId, TodoItem, TodoRepository, TodoUpdate, UserId,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use shared::Claims;
use std::sync::{Arc, Mutex};

pub const BUCKET: &str = "todo-attachments-test";

/// Vec-backed repository; keeps insertion order like a store scan would.
#[derive(Default)]
pub struct InMemoryTodoRepository {
    items: Mutex<Vec<TodoItem>>,
    failure: Option<String>,
}

impl InMemoryTodoRepository {
    /// Every call fails with a storage error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            items: Mutex::default(),
            failure: Some(message.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }

    pub fn clear_attachment_url(&self, todo_id: &TodoId) {
        for item in self.items.lock().unwrap().iter_mut() {
            if &item.todo_id == todo_id {
                item.attachment_url = None;
            }
        }
    }

    fn check(&self) -> Result<(), TodoError> {
        match &self.failure {
            Some(message) => Err(TodoError::Storage(message.clone())),
            None => Ok(()),
        }
    }
}

fn is_key(item: &TodoItem, user_id: &UserId, todo_id: &TodoId) -> bool {
    &item.user_id == user_id && &item.todo_id == todo_id
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<TodoItem>, TodoError> {
        self.check()?;
        let items = self.items.lock().unwrap();
        Ok(items
            .iter()
            .filter(|item| &item.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        user_id: &UserId,
        todo_id: &TodoId,
    ) -> Result<Option<TodoItem>, TodoError> {
        self.check()?;
        let items = self.items.lock().unwrap();
        Ok(items
            .iter()
            .find(|item| is_key(item, user_id, todo_id))
            .cloned())
    }

    async fn put(&self, item: &TodoItem) -> Result<(), TodoError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        items.retain(|existing| !is_key(existing, &item.user_id, &item.todo_id));
        items.push(item.clone());
        Ok(())
    }

    async fn update(
        &self,
        user_id: &UserId,
        todo_id: &TodoId,
        update: &TodoUpdate,
    ) -> Result<(), TodoError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|item| is_key(item, user_id, todo_id)) {
            Some(item) => item.apply_update(update),
            // UpdateItem on a missing key creates the record
            None => items.push(TodoItem {
                user_id: user_id.clone(),
                todo_id: todo_id.clone(),
                created_at: String::new(),
                name: update.name.clone(),
                due_date: update.due_date.clone(),
                done: update.done,
                attachment_url: None,
            }),
        }
        Ok(())
    }

    async fn delete(&self, user_id: &UserId, todo_id: &TodoId) -> Result<(), TodoError> {
        self.check()?;
        self.items
            .lock()
            .unwrap()
            .retain(|item| !is_key(item, user_id, todo_id));
        Ok(())
    }

    async fn update_attachment_url(
        &self,
        user_id: &UserId,
        todo_id: &TodoId,
        attachment_url: &str,
    ) -> Result<(), TodoError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        if let Some(item) = items.iter_mut().find(|item| is_key(item, user_id, todo_id)) {
            item.attachment_url = Some(attachment_url.to_string());
        }
        Ok(())
    }
}

/// Hands out fake signed URLs shaped like S3's.
pub struct InMemoryAttachmentStorage;

#[async_trait]
impl AttachmentStorage for InMemoryAttachmentStorage {
    async fn presigned_upload_url(&self, key: &str) -> Result<String, TodoError> {
        Ok(format!(
            "https://{BUCKET}.s3.amazonaws.com/{key}?X-Amz-Expires=300&X-Amz-Signature=test"
        ))
    }
}

pub fn service_with(repository: Arc<InMemoryTodoRepository>) -> TodoService {
    TodoService::new(repository, Arc::new(InMemoryAttachmentStorage), BUCKET)
}

pub fn service() -> (TodoService, Arc<InMemoryTodoRepository>) {
    let repository = Arc::new(InMemoryTodoRepository::default());
    (service_with(repository.clone()), repository)
}

/// HS256 token for `sub`; handlers only decode, so the key is arbitrary.
pub fn token_for(sub: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        iss: Some("https://test.auth0.com/".to_string()),
        exp: Some(4_102_444_800),
        iat: Some(1_700_000_000),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}
