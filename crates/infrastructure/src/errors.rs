use aws_smithy_types::error::display::DisplayErrorContext;
use domain::TodoError;
use tracing::error;

/// Surface an AWS SDK failure unchanged (no retry) as a storage error.
pub(crate) fn storage_error<E>(operation: &'static str, err: E) -> TodoError
where
    E: std::error::Error,
{
    let message = format!("{operation} failed: {}", DisplayErrorContext(err));
    error!(operation = operation, error = %message, "AWS operation failed");
    TodoError::Storage(message)
}
