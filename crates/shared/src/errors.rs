use domain::{DomainError, TodoError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type shared by every Lambda in the workspace
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid JWT token: {0}")]
    InvalidJwt(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// How loudly an error should be logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}

impl AppError {
    /// Stable machine-readable code for the error body
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Authentication(_) => "AUTHENTICATION_ERROR",
            AppError::InvalidJwt(_) => "INVALID_TOKEN",
            AppError::TokenExpired => "TOKEN_EXPIRED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Deserialization(_) => "INVALID_REQUEST_BODY",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::Authentication(_) | AppError::InvalidJwt(_) | AppError::TokenExpired => 401,
            AppError::Validation(_) | AppError::Deserialization(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Storage(_)
            | AppError::Serialization(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => 500,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.http_status_code() {
            401 => ErrorSeverity::Warning,
            400..=499 => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Message safe to show to the caller
    pub fn user_message(&self) -> String {
        match self {
            AppError::Authentication(_) | AppError::InvalidJwt(_) => {
                "Authentication failed".to_string()
            }
            AppError::TokenExpired => "Token expired".to_string(),
            // validation messages describe the caller's own input
            AppError::Validation(msg) => msg.clone(),
            AppError::Deserialization(_) => "Request body is not valid JSON".to_string(),
            AppError::NotFound(_) => "Resource not found".to_string(),
            _ => "An unexpected error occurred".to_string(),
        }
    }

    /// Log the error at its severity with structured fields.
    pub fn log(&self) {
        match self.severity() {
            ErrorSeverity::Error => {
                tracing::error!(error = %self, code = self.code(), "Request failed")
            }
            ErrorSeverity::Warning => {
                tracing::warn!(error = %self, code = self.code(), "Request rejected")
            }
            ErrorSeverity::Info => {
                tracing::info!(error = %self, code = self.code(), "Request rejected")
            }
        }
    }
}

impl From<TodoError> for AppError {
    fn from(error: TodoError) -> Self {
        match error {
            TodoError::Validation(msg) => AppError::Validation(msg),
            TodoError::NotFound(msg) => AppError::NotFound(msg),
            TodoError::Storage(msg) => AppError::Storage(msg),
            TodoError::Serialization(msg) => AppError::Serialization(msg),
            TodoError::Domain(e) => e.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidUserId(msg) => AppError::Authentication(msg),
            DomainError::InvalidTodoId(msg) | DomainError::Validation(msg) => {
                AppError::Validation(msg)
            }
        }
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    /// Internal error text, omitted in production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub request_id: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn from_app_error(error: &AppError, request_id: String, include_details: bool) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.user_message(),
            details: include_details.then(|| error.to_string()),
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(self).map_err(|e| AppError::Serialization(e.to_string()))
    }
}
