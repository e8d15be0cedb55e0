use aws_sdk_dynamodb::types::AttributeValue;
use domain::{TodoError, TodoId, TodoItem, TodoUpdate, UserId};
use std::collections::HashMap;

/// Attribute names of a todo record; one top-level attribute per field.
pub mod attr {
    pub const USER_ID: &str = "userId";
    pub const TODO_ID: &str = "todoId";
    pub const CREATED_AT: &str = "createdAt";
    pub const NAME: &str = "name";
    pub const DUE_DATE: &str = "dueDate";
    pub const DONE: &str = "done";
    pub const ATTACHMENT_URL: &str = "attachmentUrl";
}

pub type Item = HashMap<String, AttributeValue>;

/// Primary key of a todo record
pub fn todo_key(user_id: &UserId, todo_id: &TodoId) -> Item {
    HashMap::from([
        (
            attr::USER_ID.to_string(),
            AttributeValue::S(user_id.as_str().to_string()),
        ),
        (
            attr::TODO_ID.to_string(),
            AttributeValue::S(todo_id.as_str().to_string()),
        ),
    ])
}

pub fn todo_to_item(todo: &TodoItem) -> Item {
    let mut item = todo_key(&todo.user_id, &todo.todo_id);
    if !todo.created_at.is_empty() {
        item.insert(
            attr::CREATED_AT.to_string(),
            AttributeValue::S(todo.created_at.clone()),
        );
    }
    item.insert(attr::NAME.to_string(), AttributeValue::S(todo.name.clone()));
    item.insert(attr::DONE.to_string(), AttributeValue::Bool(todo.done));

    if let Some(due_date) = &todo.due_date {
        item.insert(
            attr::DUE_DATE.to_string(),
            AttributeValue::S(due_date.clone()),
        );
    }
    if let Some(url) = &todo.attachment_url {
        item.insert(
            attr::ATTACHMENT_URL.to_string(),
            AttributeValue::S(url.clone()),
        );
    }

    item
}

/// `createdAt` may be missing: an `UpdateItem` on an absent key leaves a
/// record holding only the key, name, due date and done.
pub fn item_to_todo(item: &Item) -> Result<TodoItem, TodoError> {
    let user_id = UserId::from_string(required_s(item, attr::USER_ID)?)
        .map_err(|e| TodoError::Serialization(e.to_string()))?;
    let todo_id = TodoId::from_string(required_s(item, attr::TODO_ID)?)
        .map_err(|e| TodoError::Serialization(e.to_string()))?;

    let done = match item.get(attr::DONE) {
        Some(value) => *value.as_bool().map_err(|_| {
            TodoError::Serialization(format!("attribute '{}' is not a boolean", attr::DONE))
        })?,
        None => false,
    };

    Ok(TodoItem {
        user_id,
        todo_id,
        created_at: optional_s(item, attr::CREATED_AT).unwrap_or_default(),
        name: required_s(item, attr::NAME)?,
        due_date: optional_s(item, attr::DUE_DATE),
        done,
        attachment_url: optional_s(item, attr::ATTACHMENT_URL),
    })
}

fn required_s(item: &Item, name: &str) -> Result<String, TodoError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| TodoError::Serialization(format!("missing string attribute '{name}'")))
}

fn optional_s(item: &Item, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).cloned()
}

/// `UpdateItem` expression overwriting exactly name, due date and done.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: Item,
}

impl From<&TodoUpdate> for UpdateExpression {
    fn from(update: &TodoUpdate) -> Self {
        // name, dueDate and done need aliases; name is a reserved word
        let names = HashMap::from([
            ("#name".to_string(), attr::NAME.to_string()),
            ("#dueDate".to_string(), attr::DUE_DATE.to_string()),
            ("#done".to_string(), attr::DONE.to_string()),
        ]);
        let mut values = HashMap::from([
            (":name".to_string(), AttributeValue::S(update.name.clone())),
            (":done".to_string(), AttributeValue::Bool(update.done)),
        ]);

        let expression = match &update.due_date {
            Some(due_date) => {
                values.insert(":dueDate".to_string(), AttributeValue::S(due_date.clone()));
                "SET #name = :name, #dueDate = :dueDate, #done = :done".to_string()
            }
            None => "SET #name = :name, #done = :done REMOVE #dueDate".to_string(),
        };

        Self {
            expression,
            names,
            values,
        }
    }
}
