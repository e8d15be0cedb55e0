//! Todo business logic.
//!
//! Resolves the caller from the bearer token, fills in server-side defaults
//! and delegates to the injected storage ports.

use chrono::Utc;
use domain::{
    attachment_url, AttachmentStorage, CreateTodoRequest, TodoId, TodoItem, TodoRepository,
    TodoUpdate, UpdateTodoRequest,
};
use shared::{parse_user_id, AppError};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct TodoService {
    repository: Arc<dyn TodoRepository>,
    storage: Arc<dyn AttachmentStorage>,
    bucket: String,
}

impl TodoService {
    pub fn new(
        repository: Arc<dyn TodoRepository>,
        storage: Arc<dyn AttachmentStorage>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            storage,
            bucket: bucket.into(),
        }
    }

    pub async fn list_todos(&self, token: &str) -> Result<Vec<TodoItem>, AppError> {
        let user_id = parse_user_id(token)?;
        Ok(self.repository.list_by_user(&user_id).await?)
    }

    /// `None` when the caller owns no item with this id.
    pub async fn get_todo(&self, todo_id: &str, token: &str) -> Result<Option<TodoItem>, AppError> {
        let user_id = parse_user_id(token)?;
        let todo_id = TodoId::from_string(todo_id.to_string())?;
        Ok(self.repository.get(&user_id, &todo_id).await?)
    }

    pub async fn create_todo(
        &self,
        request: CreateTodoRequest,
        token: &str,
    ) -> Result<TodoItem, AppError> {
        let user_id = parse_user_id(token)?;
        let request = request.validate()?;

        let todo = TodoItem::new(user_id, TodoId::new(), request, &self.bucket, Utc::now());
        self.repository.put(&todo).await?;

        info!(user_id = %todo.user_id, todo_id = %todo.todo_id, "Todo created");
        Ok(todo)
    }

    /// Overwrites name, due date and done. Does not check that the item exists.
    pub async fn update_todo(
        &self,
        todo_id: &str,
        request: UpdateTodoRequest,
        token: &str,
    ) -> Result<TodoUpdate, AppError> {
        let user_id = parse_user_id(token)?;
        let todo_id = TodoId::from_string(todo_id.to_string())?;
        let update = request.validate()?;

        self.repository.update(&user_id, &todo_id, &update).await?;
        Ok(update)
    }

    /// Returns the id of the user the item was deleted for.
    pub async fn delete_todo(&self, todo_id: &str, token: &str) -> Result<String, AppError> {
        let user_id = parse_user_id(token)?;
        let todo_id = TodoId::from_string(todo_id.to_string())?;

        self.repository.delete(&user_id, &todo_id).await?;
        Ok(user_id.as_str().to_string())
    }

    /// Signed upload URL for object key `todo_id`. Ownership is not checked here.
    pub async fn generate_upload_url(&self, todo_id: &str) -> Result<String, AppError> {
        let todo_id = TodoId::from_string(todo_id.to_string())?;
        Ok(self.storage.presigned_upload_url(todo_id.as_str()).await?)
    }

    /// Points the item's `attachmentUrl` at its object and returns that URL.
    pub async fn refresh_attachment_url(
        &self,
        todo_id: &str,
        token: &str,
    ) -> Result<String, AppError> {
        let user_id = parse_user_id(token)?;
        let todo_id = TodoId::from_string(todo_id.to_string())?;

        let url = attachment_url(&self.bucket, &todo_id);
        self.repository
            .update_attachment_url(&user_id, &todo_id, &url)
            .await?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{service, token_for, InMemoryTodoRepository, BUCKET};
    use chrono::DateTime;

    fn create_request(name: &str, due_date: Option<&str>) -> CreateTodoRequest {
        CreateTodoRequest {
            name: name.to_string(),
            due_date: due_date.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_todo_applies_defaults() {
        let (service, _) = service();
        let token = token_for("auth0|alice");

        let todo = service
            .create_todo(create_request("Buy milk", None), &token)
            .await
            .unwrap();

        assert_eq!(todo.user_id.as_str(), "auth0|alice");
        assert!(!todo.todo_id.as_str().is_empty());
        assert!(!todo.done);
        assert_eq!(todo.due_date, None);
        assert!(DateTime::parse_from_rfc3339(&todo.created_at).is_ok());
        assert!(todo.created_at.ends_with('Z'));

        let url = todo.attachment_url.as_deref().unwrap();
        assert_eq!(
            url,
            format!("https://{BUCKET}.s3.amazonaws.com/{}", todo.todo_id)
        );
    }

    #[tokio::test]
    async fn test_create_todo_generates_distinct_ids() {
        let (service, _) = service();
        let token = token_for("auth0|alice");

        let first = service
            .create_todo(create_request("A", None), &token)
            .await
            .unwrap();
        let second = service
            .create_todo(create_request("A", None), &token)
            .await
            .unwrap();

        assert_ne!(first.todo_id, second.todo_id);
    }

    #[tokio::test]
    async fn test_create_todo_rejects_blank_name() {
        let (service, repository) = service();
        let token = token_for("auth0|alice");

        let result = service.create_todo(create_request("   ", None), &token).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_token_is_authentication_failure() {
        let (service, _) = service();

        let result = service.list_todos("not-a-jwt").await;

        assert_eq!(result.unwrap_err().http_status_code(), 401);
    }

    #[tokio::test]
    async fn test_list_todos_is_scoped_to_caller() {
        let (service, _) = service();
        let alice = token_for("auth0|alice");
        let bob = token_for("auth0|bob");

        let todo = service
            .create_todo(create_request("Buy milk", None), &alice)
            .await
            .unwrap();

        assert_eq!(service.list_todos(&alice).await.unwrap(), vec![todo]);
        assert!(service.list_todos(&bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_todo_is_stable_and_owner_only() {
        let (service, _) = service();
        let alice = token_for("auth0|alice");
        let todo = service
            .create_todo(create_request("Buy milk", Some("2024-01-01")), &alice)
            .await
            .unwrap();
        let id = todo.todo_id.to_string();

        let first = service.get_todo(&id, &alice).await.unwrap();
        let second = service.get_todo(&id, &alice).await.unwrap();
        assert_eq!(first, Some(todo));
        assert_eq!(first, second);

        let other = service.get_todo(&id, &token_for("auth0|bob")).await.unwrap();
        assert_eq!(other, None);
    }

    #[tokio::test]
    async fn test_update_todo_replaces_mutable_fields_only() {
        let (service, _) = service();
        let alice = token_for("auth0|alice");
        let todo = service
            .create_todo(create_request("Buy milk", Some("2024-01-01")), &alice)
            .await
            .unwrap();
        let id = todo.todo_id.as_str();

        let update = service
            .update_todo(
                id,
                UpdateTodoRequest {
                    name: "Buy oat milk".to_string(),
                    due_date: None,
                    done: true,
                },
                &alice,
            )
            .await
            .unwrap();
        assert_eq!(
            update,
            TodoUpdate {
                name: "Buy oat milk".to_string(),
                due_date: None,
                done: true,
            }
        );

        let stored = service.get_todo(id, &alice).await.unwrap().unwrap();
        assert_eq!(stored.name, "Buy oat milk");
        assert_eq!(stored.due_date, None);
        assert!(stored.done);
        assert_eq!(stored.user_id, todo.user_id);
        assert_eq!(stored.todo_id, todo.todo_id);
        assert_eq!(stored.created_at, todo.created_at);
        assert_eq!(stored.attachment_url, todo.attachment_url);
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_is_still_readable() {
        let (service, _) = service();
        let alice = token_for("auth0|alice");

        service
            .update_todo(
                "todo-unknown",
                UpdateTodoRequest {
                    name: "Buy oat milk".to_string(),
                    due_date: None,
                    done: true,
                },
                &alice,
            )
            .await
            .unwrap();

        let stored = service
            .get_todo("todo-unknown", &alice)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.name, "Buy oat milk");
        assert!(stored.done);
        assert!(stored.created_at.is_empty());
        assert_eq!(service.list_todos(&alice).await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn test_delete_todo_returns_user_id() {
        let (service, _) = service();
        let alice = token_for("auth0|alice");
        let todo = service
            .create_todo(create_request("Buy milk", None), &alice)
            .await
            .unwrap();
        let id = todo.todo_id.as_str();

        let user_id = service.delete_todo(id, &alice).await.unwrap();

        assert_eq!(user_id, "auth0|alice");
        assert_eq!(service.get_todo(id, &alice).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_by_other_user_leaves_item() {
        let (service, _) = service();
        let alice = token_for("auth0|alice");
        let todo = service
            .create_todo(create_request("Buy milk", None), &alice)
            .await
            .unwrap();
        let id = todo.todo_id.as_str();

        service
            .delete_todo(id, &token_for("auth0|bob"))
            .await
            .unwrap();

        assert!(service.get_todo(id, &alice).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_generate_upload_url_uses_todo_id_as_key() {
        let (service, _) = service();

        let url = service.generate_upload_url("todo-123").await.unwrap();

        assert!(url.contains("/todo-123?"));
        assert!(url.contains("X-Amz-Expires=300"));
    }

    #[tokio::test]
    async fn test_refresh_attachment_url() {
        let (service, repository) = service();
        let alice = token_for("auth0|alice");
        let todo = service
            .create_todo(create_request("Photo", None), &alice)
            .await
            .unwrap();
        repository.clear_attachment_url(&todo.todo_id);

        let url = service
            .refresh_attachment_url(todo.todo_id.as_str(), &alice)
            .await
            .unwrap();

        assert!(url.ends_with(todo.todo_id.as_str()));
        let stored = service
            .get_todo(todo.todo_id.as_str(), &alice)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.attachment_url.as_deref(), Some(url.as_str()));
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_as_storage_error() {
        let repository = Arc::new(InMemoryTodoRepository::failing("table unavailable"));
        let service = crate::test_support::service_with(repository);

        let result = service.list_todos(&token_for("auth0|alice")).await;

        match result {
            Err(AppError::Storage(msg)) => assert!(msg.contains("table unavailable")),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_buy_milk_scenario() {
        let (service, _) = service();
        let token = token_for("auth0|alice");

        let todo = service
            .create_todo(create_request("Buy milk", Some("2024-01-01")), &token)
            .await
            .unwrap();
        let id = todo.todo_id.to_string();
        assert!(!todo.done);
        assert_eq!(service.list_todos(&token).await.unwrap(), vec![todo.clone()]);

        service
            .update_todo(
                &id,
                UpdateTodoRequest {
                    name: "Buy oat milk".to_string(),
                    due_date: Some("2024-01-02".to_string()),
                    done: true,
                },
                &token,
            )
            .await
            .unwrap();
        let updated = service.get_todo(&id, &token).await.unwrap().unwrap();
        assert_eq!(updated.name, "Buy oat milk");
        assert_eq!(updated.due_date.as_deref(), Some("2024-01-02"));
        assert!(updated.done);
        assert_eq!(updated.created_at, todo.created_at);

        service.delete_todo(&id, &token).await.unwrap();
        assert_eq!(service.get_todo(&id, &token).await.unwrap(), None);
    }
}
