use async_trait::async_trait;
use todo_core::{StatusFilter, Task, TaskPatch, TaskStore};

use crate::Database;

#[async_trait]
impl TaskStore for Database {
    async fn create_task(&self, title: &str) -> todo_core::Result<Task> {
        Ok(Database::create_task(self, title).await?)
    }

    async fn list_tasks(&self, filter: StatusFilter) -> todo_core::Result<Vec<Task>> {
        Ok(Database::list_tasks(self, filter).await?)
    }

    async fn get_task(&self, id: i64) -> todo_core::Result<Option<Task>> {
        Ok(Database::get_task(self, id).await?)
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> todo_core::Result<Task> {
        Ok(Database::update_task(self, id, patch).await?)
    }

    async fn toggle_task(&self, id: i64) -> todo_core::Result<Task> {
        Ok(Database::toggle_task(self, id).await?)
    }

    async fn delete_task(&self, id: i64) -> todo_core::Result<()> {
        Ok(Database::delete_task(self, id).await?)
    }

    async fn clear_completed(&self) -> todo_core::Result<u64> {
        Ok(Database::clear_completed(self).await?)
    }

    async fn clear_all(&self) -> todo_core::Result<u64> {
        Ok(Database::clear_all(self).await?)
    }
}
