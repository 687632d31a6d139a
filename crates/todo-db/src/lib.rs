pub mod models;
pub mod repository;
pub mod store;
pub mod error;

// Re-exports
pub use models::TaskRecord;
pub use repository::Database;
pub use error::{Error, Result};
