use lambda_runtime::Context;
use tracing::{info, warn};

/// Invocation identity attached to every request span
#[derive(Debug, Clone)]
pub struct LambdaTraceContext {
    pub function_name: String,
    pub request_id: String,
    pub trace_id: Option<String>,
}

impl LambdaTraceContext {
    pub fn from_lambda_context(context: &Context) -> Self {
        Self {
            function_name: context.env_config.function_name.clone(),
            request_id: context.request_id.clone(),
            trace_id: context.xray_trace_id.clone(),
        }
    }

    /// Used when the runtime context is unavailable (local invocations, tests)
    pub fn unknown() -> Self {
        Self {
            function_name: "unknown".to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
            trace_id: None,
        }
    }
}

/// Span wrapping one HTTP invocation
pub fn create_request_span(
    method: &str,
    path: &str,
    trace_context: &LambdaTraceContext,
) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = method,
        path = path,
        function_name = %trace_context.function_name,
        request_id = %trace_context.request_id,
        trace_id = %trace_context.trace_id.as_deref().unwrap_or("none"),
    )
}

/// Log the outcome of an HTTP invocation
pub fn record_http_response(method: &str, path: &str, status_code: u16, duration_ms: u128) {
    if status_code >= 500 {
        warn!(
            method = method,
            path = path,
            status_code = status_code,
            duration_ms = duration_ms,
            "HTTP request failed"
        );
    } else {
        info!(
            method = method,
            path = path,
            status_code = status_code,
            duration_ms = duration_ms,
            "HTTP request completed"
        );
    }
}
