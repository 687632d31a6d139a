use crate::{models::TaskRecord, Error, Result};
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite, SqliteConnection, Transaction,
};
use std::str::FromStr;
use std::time::Duration;
use todo_core::{normalize_title, StatusFilter, Task, TaskPatch};

const TASK_COLUMNS: &str = "id, title, completed, created_at, updated_at";

#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create new database connection
    ///
    /// The database file is created if it does not exist yet. In-memory
    /// databases get a single long-lived connection, since every SQLite
    /// connection would otherwise see its own empty database.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        }
        .connect_with(options)
        .await
        .map_err(|e| Error::Connection(format!("{}: {}", database_url, e)))?;

        tracing::debug!("Connected to {}", database_url);

        Ok(Self { pool })
    }

    /// Fresh private in-memory database with the schema applied
    pub async fn in_memory() -> Result<Self> {
        let db = Self::new("sqlite::memory:").await?;
        db.init_schema().await?;
        Ok(db)
    }

    /// Initialize database schema
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_todos_completed ON todos(completed)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ========================================================================
    // Task Operations
    // ========================================================================

    /// Insert a new task
    pub async fn create_task(&self, title: &str) -> Result<Task> {
        let title = normalize_title(title)?;
        let now = Utc::now();

        let record = sqlx::query_as::<_, TaskRecord>(&format!(
            "INSERT INTO todos (title, completed, created_at, updated_at) \
             VALUES (?, ?, ?, ?) RETURNING {TASK_COLUMNS}"
        ))
        .bind(&title)
        .bind(false)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created todo: {} ({})", record.title, record.id);

        Ok(record.into())
    }

    /// List tasks, newest first
    pub async fn list_tasks(&self, filter: StatusFilter) -> Result<Vec<Task>> {
        let records = match filter.completed() {
            Some(completed) => {
                sqlx::query_as::<_, TaskRecord>(&format!(
                    "SELECT {TASK_COLUMNS} FROM todos WHERE completed = ? ORDER BY id DESC"
                ))
                .bind(completed)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TaskRecord>(&format!(
                    "SELECT {TASK_COLUMNS} FROM todos ORDER BY id DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        tracing::debug!("Listed {} todos (status={})", records.len(), filter);

        Ok(records.into_iter().map(Task::from).collect())
    }

    /// Get task by ID
    pub async fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        let mut conn = self.pool.acquire().await?;
        let record = fetch_task(&mut conn, task_id).await?;

        Ok(record)
    }

    /// Apply a partial update inside one transaction
    pub async fn update_task(&self, task_id: i64, patch: &TaskPatch) -> Result<Task> {
        let mut tx = self.begin_write(task_id).await?;

        let mut task = fetch_task(&mut tx, task_id)
            .await?
            .ok_or(Error::TaskNotFound(task_id))?;
        task.apply(patch, Utc::now())?;
        write_task(&mut tx, &task).await?;

        tx.commit().await?;

        tracing::info!("Updated todo: {} ({})", task.title, task.id);

        Ok(task)
    }

    /// Flip the completion flag inside one transaction
    pub async fn toggle_task(&self, task_id: i64) -> Result<Task> {
        let mut tx = self.begin_write(task_id).await?;

        let mut task = fetch_task(&mut tx, task_id)
            .await?
            .ok_or(Error::TaskNotFound(task_id))?;
        task.toggle(Utc::now());
        write_task(&mut tx, &task).await?;

        tx.commit().await?;

        tracing::info!("Toggled todo {} to {}", task.id, task.status());

        Ok(task)
    }

    /// Open a transaction that already holds the database write lock.
    ///
    /// A deferred transaction that reads before it writes has to upgrade
    /// its shared lock, and SQLite fails that upgrade with `SQLITE_BUSY`
    /// straight away when another writer is active. Writing first makes
    /// the lock request wait on the busy timeout instead, so concurrent
    /// mutations queue up and the last commit wins.
    async fn begin_write(&self, task_id: i64) -> Result<Transaction<'static, Sqlite>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE todos SET updated_at = updated_at WHERE id = ?")
            .bind(task_id)
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }

    /// Delete task by ID
    pub async fn delete_task(&self, task_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Deleted todo {}", task_id);
        }

        Ok(())
    }

    /// Delete every completed task
    pub async fn clear_completed(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM todos WHERE completed = ?")
            .bind(true)
            .execute(&self.pool)
            .await?;

        tracing::info!("Cleared {} completed todos", result.rows_affected());

        Ok(result.rows_affected())
    }

    /// Delete every task
    pub async fn clear_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM todos")
            .execute(&self.pool)
            .await?;

        tracing::info!("Cleared all {} todos", result.rows_affected());

        Ok(result.rows_affected())
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

async fn fetch_task(conn: &mut SqliteConnection, task_id: i64) -> Result<Option<Task>> {
    let record = sqlx::query_as::<_, TaskRecord>(&format!(
        "SELECT {TASK_COLUMNS} FROM todos WHERE id = ?"
    ))
    .bind(task_id)
    .fetch_optional(conn)
    .await?;

    Ok(record.map(Task::from))
}

async fn write_task(conn: &mut SqliteConnection, task: &Task) -> Result<()> {
    sqlx::query("UPDATE todos SET title = ?, completed = ?, updated_at = ? WHERE id = ?")
        .bind(&task.title)
        .bind(task.completed)
        .bind(task.updated_at)
        .bind(task.id)
        .execute(conn)
        .await?;

    Ok(())
}
