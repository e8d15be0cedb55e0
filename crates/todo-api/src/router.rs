use lambda_http::http::header::AUTHORIZATION;
use lambda_http::http::{Method, StatusCode};
use lambda_http::{Body, Request, RequestExt, Response};
use shared::telemetry::{create_request_span, record_http_response, LambdaTraceContext};
use shared::{extract_bearer_token, AppError};
use std::time::Instant;
use tracing::Instrument;

use crate::handlers;
use crate::response::{add_cors_headers, empty_response, error_response};
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Preflight,
    ListTodos,
    CreateTodo,
    GetTodo(String),
    UpdateTodo(String),
    DeleteTodo(String),
    UploadUrl(String),
}

/// Match a request against the todo routes. Anything before the `todos`
/// segment (an API Gateway stage name) is ignored.
pub fn parse_route(method: &Method, path: &str) -> Option<Route> {
    if method == Method::OPTIONS {
        return Some(Route::Preflight);
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let start = segments.iter().position(|s| *s == "todos")?;

    let route = match (method.as_str(), &segments[start + 1..]) {
        ("GET", []) => Route::ListTodos,
        ("POST", []) => Route::CreateTodo,
        ("GET", [id]) => Route::GetTodo(id.to_string()),
        ("PATCH" | "PUT", [id]) => Route::UpdateTodo(id.to_string()),
        ("DELETE", [id]) => Route::DeleteTodo(id.to_string()),
        ("POST", [id, "attachment"]) => Route::UploadUrl(id.to_string()),
        _ => return None,
    };
    Some(route)
}

pub async fn route(req: Request, state: &AppState) -> Result<Response<Body>, lambda_http::Error> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let trace_context = req
        .lambda_context_ref()
        .map(LambdaTraceContext::from_lambda_context)
        .unwrap_or_else(LambdaTraceContext::unknown);
    let span = create_request_span(method.as_str(), &path, &trace_context);

    let result = route_inner(&req, state, &method, &path)
        .instrument(span.clone())
        .await;

    let mut response = match result {
        Ok(response) => response,
        Err(e) => {
            span.in_scope(|| e.log());
            error_response(
                &e,
                &trace_context.request_id,
                state.include_error_details,
            )
        }
    };
    add_cors_headers(&mut response);

    span.in_scope(|| {
        record_http_response(
            method.as_str(),
            &path,
            response.status().as_u16(),
            started.elapsed().as_millis(),
        )
    });
    Ok(response)
}

async fn route_inner(
    req: &Request,
    state: &AppState,
    method: &Method,
    path: &str,
) -> Result<Response<Body>, AppError> {
    let route =
        parse_route(method, path).ok_or_else(|| AppError::NotFound(format!("{method} {path}")))?;
    if route == Route::Preflight {
        return Ok(empty_response(StatusCode::NO_CONTENT));
    }

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = extract_bearer_token(header)?;
    let service = &state.service;

    match route {
        Route::ListTodos => handlers::list_todos(service, token).await,
        Route::CreateTodo => handlers::create_todo(req, service, token).await,
        Route::GetTodo(id) => handlers::get_todo(service, token, &id).await,
        Route::UpdateTodo(id) => handlers::update_todo(req, service, token, &id).await,
        Route::DeleteTodo(id) => handlers::delete_todo(service, token, &id).await,
        Route::UploadUrl(id) => handlers::generate_upload_url(service, token, &id).await,
        Route::Preflight => Ok(empty_response(StatusCode::NO_CONTENT)),
    }
}
