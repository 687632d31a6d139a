use async_trait::async_trait;

use crate::{Result, StatusFilter, Task, TaskPatch};

/// Persistence operations for tasks.
///
/// Each call is atomic on its own. Callers resolve an id with
/// [`TaskStore::get_task`] before mutating it; `update_task` and
/// `toggle_task` still return [`crate::Error::TaskNotFound`] if the row
/// disappeared in between.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new active task with a trimmed title.
    async fn create_task(&self, title: &str) -> Result<Task>;

    /// Tasks matching `filter`, newest (highest id) first.
    async fn list_tasks(&self, filter: StatusFilter) -> Result<Vec<Task>>;

    async fn get_task(&self, id: i64) -> Result<Option<Task>>;

    /// Apply a partial update. An empty patch still refreshes `updated_at`.
    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Task>;

    async fn toggle_task(&self, id: i64) -> Result<Task>;

    /// Remove a task permanently. Deleting an absent id is a no-op.
    async fn delete_task(&self, id: i64) -> Result<()>;

    /// Remove every completed task, returning how many were removed.
    async fn clear_completed(&self) -> Result<u64>;

    /// Remove every task, returning how many were removed.
    async fn clear_all(&self) -> Result<u64>;
}
