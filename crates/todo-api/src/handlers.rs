use lambda_http::http::StatusCode;
use lambda_http::{Body, Request, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use shared::AppError;
use tracing::info;

use crate::response::json_response;
use crate::todos::TodoService;

fn parse_body<T: DeserializeOwned>(req: &Request) -> Result<T, AppError> {
    let bytes: &[u8] = match req.body() {
        Body::Text(s) => s.as_bytes(),
        Body::Binary(b) => b.as_slice(),
        Body::Empty => {
            return Err(AppError::Deserialization("Request body is empty".to_string()))
        }
    };

    serde_json::from_slice(bytes).map_err(|e| AppError::Deserialization(e.to_string()))
}

pub async fn list_todos(service: &TodoService, token: &str) -> Result<Response<Body>, AppError> {
    let items = service.list_todos(token).await?;
    json_response(StatusCode::OK, &json!({ "items": items }))
}

pub async fn get_todo(
    service: &TodoService,
    token: &str,
    todo_id: &str,
) -> Result<Response<Body>, AppError> {
    let item = service
        .get_todo(todo_id, token)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("todo {todo_id}")))?;

    json_response(StatusCode::OK, &json!({ "items": item }))
}

pub async fn create_todo(
    req: &Request,
    service: &TodoService,
    token: &str,
) -> Result<Response<Body>, AppError> {
    let request = parse_body(req)?;
    let item = service.create_todo(request, token).await?;
    json_response(StatusCode::CREATED, &json!({ "item": item }))
}

pub async fn update_todo(
    req: &Request,
    service: &TodoService,
    token: &str,
    todo_id: &str,
) -> Result<Response<Body>, AppError> {
    let request = parse_body(req)?;
    let item = service.update_todo(todo_id, request, token).await?;
    json_response(StatusCode::OK, &json!({ "item": item }))
}

pub async fn delete_todo(
    service: &TodoService,
    token: &str,
    todo_id: &str,
) -> Result<Response<Body>, AppError> {
    let user_id = service.delete_todo(todo_id, token).await?;
    info!(user_id = %user_id, todo_id = todo_id, "Todo deleted");
    json_response(StatusCode::OK, &json!({}))
}

/// Signed upload URL for one of the caller's items. The item's
/// `attachmentUrl` is re-pointed at the upload target.
pub async fn generate_upload_url(
    service: &TodoService,
    token: &str,
    todo_id: &str,
) -> Result<Response<Body>, AppError> {
    if service.get_todo(todo_id, token).await?.is_none() {
        return Err(AppError::NotFound(format!("todo {todo_id}")));
    }

    let upload_url = service.generate_upload_url(todo_id).await?;
    service.refresh_attachment_url(todo_id, token).await?;

    json_response(StatusCode::OK, &json!({ "uploadUrl": upload_url }))
}
