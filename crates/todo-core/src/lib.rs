pub mod task;
pub mod filter;
pub mod store;
pub mod memory;
pub mod error;

// Re-exports
pub use task::{normalize_title, next_timestamp, Task, TaskPatch, TaskStatus};
pub use filter::StatusFilter;
pub use store::TaskStore;
pub use memory::MemoryStore;
pub use error::{Error, Result};
