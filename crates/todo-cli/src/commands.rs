use anyhow::Result;
use std::io::Write;
use std::sync::Arc;

use crate::cli::Commands;
use todo_api::ApiState;
use todo_core::{StatusFilter, Task, TaskPatch, TaskStore};

pub async fn execute(
    command: Commands,
    store: Arc<dyn TaskStore>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Serve { host, port, .. } => {
            let addr = format!("{}:{}", host, port);
            writeln!(out, "Starting API server on http://{}", addr)?;

            todo_api::serve(&addr, ApiState { store }).await?;
        }

        Commands::Add { title } => {
            let task = store.create_task(&title).await?;

            writeln!(out, "✓ Todo created: {}", task.id)?;
            print_task(out, &task)?;
        }

        Commands::List { status } => {
            let tasks = store.list_tasks(status).await?;

            if tasks.is_empty() {
                match status {
                    StatusFilter::All => writeln!(out, "No todos")?,
                    other => writeln!(out, "No {} todos", other)?,
                }
            }
            for task in &tasks {
                let mark = if task.completed { "x" } else { " " };
                writeln!(out, "[{}] {:>4}  {}", mark, task.id, task.title)?;
            }
        }

        Commands::Show { id } => {
            let task = resolve(store.as_ref(), id).await?;
            writeln!(out, "Todo: {}", task.id)?;
            print_task(out, &task)?;
        }

        Commands::Update { id, title, completed } => {
            resolve(store.as_ref(), id).await?;

            let patch = TaskPatch { title, completed };
            let task = store.update_task(id, &patch).await?;

            writeln!(out, "✓ Todo updated: {}", task.id)?;
            print_task(out, &task)?;
        }

        Commands::Toggle { id } => {
            resolve(store.as_ref(), id).await?;

            let task = store.toggle_task(id).await?;

            writeln!(out, "✓ Todo {} is now {}", task.id, task.status())?;
        }

        Commands::Rm { id } => {
            resolve(store.as_ref(), id).await?;

            store.delete_task(id).await?;

            writeln!(out, "✓ Todo deleted: {}", id)?;
        }

        Commands::Clear { completed } => {
            let deleted = if completed {
                store.clear_completed().await?
            } else {
                store.clear_all().await?
            };

            writeln!(out, "✓ Deleted {} todos", deleted)?;
        }
    }

    Ok(())
}

async fn resolve(store: &dyn TaskStore, id: i64) -> Result<Task> {
    match store.get_task(id).await? {
        Some(task) => Ok(task),
        None => anyhow::bail!("Todo not found: {}", id),
    }
}

fn print_task(out: &mut impl Write, task: &Task) -> Result<()> {
    writeln!(out, "  Title: {}", task.title)?;
    writeln!(out, "  Status: {}", task.status())?;
    writeln!(out, "  Created: {}", task.created_at.to_rfc3339())?;
    writeln!(out, "  Updated: {}", task.updated_at.to_rfc3339())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_core::MemoryStore;

    async fn run(store: &Arc<dyn TaskStore>, command: Commands) -> Result<String> {
        let mut out = Vec::new();
        execute(command, store.clone(), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn store() -> Arc<dyn TaskStore> {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let store = store();

        let output = run(&store, Commands::Add { title: " Task A ".into() }).await.unwrap();
        assert!(output.contains("✓ Todo created: 1"));
        assert!(output.contains("Title: Task A"));

        run(&store, Commands::Add { title: "Task B".into() }).await.unwrap();

        let output = run(&store, Commands::List { status: StatusFilter::All }).await.unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Task B"));
        assert!(lines[1].ends_with("Task A"));
    }

    #[tokio::test]
    async fn test_toggle_update_and_filters() {
        let store = store();
        run(&store, Commands::Add { title: "Task A".into() }).await.unwrap();

        let output = run(&store, Commands::Toggle { id: 1 }).await.unwrap();
        assert!(output.contains("now completed"));

        let output = run(
            &store,
            Commands::Update {
                id: 1,
                title: Some("Task A+".into()),
                completed: None,
            },
        )
        .await
        .unwrap();
        assert!(output.contains("Title: Task A+"));
        assert!(output.contains("Status: completed"));

        let output = run(&store, Commands::List { status: StatusFilter::Active }).await.unwrap();
        assert_eq!(output.trim(), "No active todos");

        let output = run(&store, Commands::List { status: StatusFilter::Completed }).await.unwrap();
        assert!(output.starts_with("[x]"));
    }

    #[tokio::test]
    async fn test_missing_id_fails() {
        let store = store();

        let err = run(&store, Commands::Rm { id: 9 }).await.unwrap_err();
        assert_eq!(err.to_string(), "Todo not found: 9");
        assert!(run(&store, Commands::Toggle { id: 9 }).await.is_err());
        assert!(run(&store, Commands::Show { id: 9 }).await.is_err());
    }

    #[tokio::test]
    async fn test_clear() {
        let store = store();
        run(&store, Commands::Add { title: "a".into() }).await.unwrap();
        run(&store, Commands::Add { title: "b".into() }).await.unwrap();
        run(&store, Commands::Toggle { id: 1 }).await.unwrap();

        let output = run(&store, Commands::Clear { completed: true }).await.unwrap();
        assert_eq!(output.trim(), "✓ Deleted 1 todos");

        let output = run(&store, Commands::Clear { completed: false }).await.unwrap();
        assert_eq!(output.trim(), "✓ Deleted 1 todos");

        let output = run(&store, Commands::List { status: StatusFilter::All }).await.unwrap();
        assert_eq!(output.trim(), "No todos");
    }
}
