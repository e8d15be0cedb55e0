use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid TodoId: {0}")]
    InvalidTodoId(String),

    #[error("Invalid UserId: {0}")]
    InvalidUserId(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors surfaced by todo storage and the operations built on it
#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Todo not found: {0}")]
    NotFound(String),

    /// The key-value or object store rejected the request
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored record could not be read back
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}
