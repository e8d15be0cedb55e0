pub mod dynamodb;
mod errors;
pub mod models;
pub mod repositories;
pub mod storage;

pub use dynamodb::*;
pub use repositories::*;
pub use storage::*;
