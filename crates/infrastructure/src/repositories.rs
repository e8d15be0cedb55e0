use crate::errors::storage_error;
use crate::models::{attr, item_to_todo, todo_key, todo_to_item, UpdateExpression};
use crate::DynamoDbClient;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use domain::{TodoError, TodoId, TodoItem, TodoRepository, TodoUpdate, UserId};
use tracing::{debug, error, info};

/// [`TodoRepository`] over a DynamoDB table keyed by `(userId, todoId)`
/// with a `userId` secondary index projecting all attributes.
#[derive(Clone)]
pub struct DynamoTodoRepository {
    db: DynamoDbClient,
}

impl DynamoTodoRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoRepository for DynamoTodoRepository {
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<TodoItem>, TodoError> {
        info!(
            user_id = %user_id,
            table = self.db.table_name(),
            "Getting all todos for user"
        );

        let mut todos = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .db
                .client()
                .query()
                .table_name(self.db.table_name())
                .index_name(self.db.user_id_index())
                .key_condition_expression("#userId = :userId")
                .expression_attribute_names("#userId", attr::USER_ID)
                .expression_attribute_values(
                    ":userId",
                    AttributeValue::S(user_id.as_str().to_string()),
                )
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| storage_error("Query", e))?;

            for item in output.items() {
                match item_to_todo(item) {
                    Ok(todo) => todos.push(todo),
                    Err(e) => {
                        error!(user_id = %user_id, error = %e, "Skipping unreadable todo record");
                        continue;
                    }
                }
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        info!(user_id = %user_id, count = todos.len(), "Found todos for user");
        Ok(todos)
    }

    async fn get(
        &self,
        user_id: &UserId,
        todo_id: &TodoId,
    ) -> Result<Option<TodoItem>, TodoError> {
        info!(user_id = %user_id, todo_id = %todo_id, "Getting todo");

        let output = self
            .db
            .client()
            .get_item()
            .table_name(self.db.table_name())
            .set_key(Some(todo_key(user_id, todo_id)))
            .send()
            .await
            .map_err(|e| storage_error("GetItem", e))?;

        let todo = output.item.as_ref().map(item_to_todo).transpose()?;
        if todo.is_none() {
            debug!(user_id = %user_id, todo_id = %todo_id, "Todo not found");
        }
        Ok(todo)
    }

    async fn put(&self, todo: &TodoItem) -> Result<(), TodoError> {
        info!(
            user_id = %todo.user_id,
            todo_id = %todo.todo_id,
            table = self.db.table_name(),
            "Putting todo"
        );

        self.db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(todo_to_item(todo)))
            .send()
            .await
            .map_err(|e| storage_error("PutItem", e))?;

        Ok(())
    }

    async fn update(
        &self,
        user_id: &UserId,
        todo_id: &TodoId,
        update: &TodoUpdate,
    ) -> Result<(), TodoError> {
        info!(user_id = %user_id, todo_id = %todo_id, "Updating todo");

        let expr = UpdateExpression::from(update);
        self.db
            .client()
            .update_item()
            .table_name(self.db.table_name())
            .set_key(Some(todo_key(user_id, todo_id)))
            .update_expression(expr.expression)
            .set_expression_attribute_names(Some(expr.names))
            .set_expression_attribute_values(Some(expr.values))
            .send()
            .await
            .map_err(|e| storage_error("UpdateItem", e))?;

        debug!(todo_id = %todo_id, "Todo updated");
        Ok(())
    }

    async fn delete(&self, user_id: &UserId, todo_id: &TodoId) -> Result<(), TodoError> {
        info!(user_id = %user_id, todo_id = %todo_id, "Deleting todo");

        self.db
            .client()
            .delete_item()
            .table_name(self.db.table_name())
            .set_key(Some(todo_key(user_id, todo_id)))
            .send()
            .await
            .map_err(|e| storage_error("DeleteItem", e))?;

        Ok(())
    }

    async fn update_attachment_url(
        &self,
        user_id: &UserId,
        todo_id: &TodoId,
        attachment_url: &str,
    ) -> Result<(), TodoError> {
        info!(user_id = %user_id, todo_id = %todo_id, "Updating attachment URL");

        self.db
            .client()
            .update_item()
            .table_name(self.db.table_name())
            .set_key(Some(todo_key(user_id, todo_id)))
            .update_expression("SET #attachmentUrl = :attachmentUrl")
            .expression_attribute_names("#attachmentUrl", attr::ATTACHMENT_URL)
            .expression_attribute_values(
                ":attachmentUrl",
                AttributeValue::S(attachment_url.to_string()),
            )
            .send()
            .await
            .map_err(|e| storage_error("UpdateItem", e))?;

        Ok(())
    }
}
