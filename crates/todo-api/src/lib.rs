//! Lambda HTTP API for per-user todo items.
//!
//! Routes are matched on the `todos` path segment, authenticated with the
//! caller's bearer token and served by [`TodoService`].

pub mod handlers;
pub mod response;
pub mod router;
pub mod todos;

#[cfg(test)]
mod test_support;

pub use router::route;
pub use todos::TodoService;

/// State shared by every invocation of a warm container
#[derive(Clone)]
pub struct AppState {
    pub service: TodoService,
    /// Include internal error text in error bodies
    pub include_error_details: bool,
}
