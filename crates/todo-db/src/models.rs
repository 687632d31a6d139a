use chrono::{DateTime, Utc};
use sqlx::FromRow;
use todo_core::Task;

/// Row of the `todos` table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRecord {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Task {
            id: record.id,
            title: record.title,
            completed: record.completed,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
