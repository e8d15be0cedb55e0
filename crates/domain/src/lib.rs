pub mod errors;
pub mod ports;
pub mod todo;

pub use errors::*;
pub use ports::*;
pub use todo::*;
