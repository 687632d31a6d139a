use crate::{Error, Result, StatusFilter, Task, TaskPatch, TaskStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    last_id: i64,
    tasks: BTreeMap<i64, Task>,
}

/// In-process task store. Ids are never reused, even after a clear.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.tasks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, title: &str) -> Result<Task> {
        let mut inner = self.inner.write().await;

        let task = Task::new(inner.last_id + 1, title, Utc::now())?;
        inner.last_id = task.id;
        inner.tasks.insert(task.id, task.clone());

        tracing::info!("Created todo: {} ({})", task.title, task.id);

        Ok(task)
    }

    async fn list_tasks(&self, filter: StatusFilter) -> Result<Vec<Task>> {
        let inner = self.inner.read().await;

        Ok(inner
            .tasks
            .values()
            .rev()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.get(&id).cloned())
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Task> {
        let mut inner = self.inner.write().await;
        let task = inner.tasks.get_mut(&id).ok_or(Error::TaskNotFound(id))?;

        task.apply(patch, Utc::now())?;

        Ok(task.clone())
    }

    async fn toggle_task(&self, id: i64) -> Result<Task> {
        let mut inner = self.inner.write().await;
        let task = inner.tasks.get_mut(&id).ok_or(Error::TaskNotFound(id))?;

        task.toggle(Utc::now());

        Ok(task.clone())
    }

    async fn delete_task(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;

        if let Some(task) = inner.tasks.remove(&id) {
            tracing::info!("Deleted todo: {} ({})", task.title, id);
        }

        Ok(())
    }

    async fn clear_completed(&self) -> Result<u64> {
        let mut inner = self.inner.write().await;

        let before = inner.tasks.len();
        inner.tasks.retain(|_, task| !task.completed);
        let removed = (before - inner.tasks.len()) as u64;

        tracing::info!("Cleared {} completed todos", removed);

        Ok(removed)
    }

    async fn clear_all(&self) -> Result<u64> {
        let mut inner = self.inner.write().await;

        let removed = inner.tasks.len() as u64;
        inner.tasks.clear();

        tracing::info!("Cleared all {} todos", removed);

        Ok(removed)
    }
}
