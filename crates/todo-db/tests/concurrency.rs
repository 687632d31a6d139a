use std::collections::HashSet;
use std::sync::Arc;

use todo_core::{TaskPatch, TaskStore};
use todo_db::Database;

const WRITERS: usize = 21;

async fn file_database(dir: &tempfile::TempDir) -> Database {
    let url = format!("sqlite://{}", dir.path().join("todo.db").display());
    let db = Database::new(&url).await.unwrap();
    db.init_schema().await.unwrap();
    db
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_toggles_all_commit() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_database(&dir).await;
    let task = db.create_task("Task A").await.unwrap();

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move { db.toggle_task(task.id).await })
        })
        .collect();

    let mut results = Vec::with_capacity(WRITERS);
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    let stored = db.get_task(task.id).await.unwrap().unwrap();
    assert_eq!(stored.completed, WRITERS % 2 == 1);

    // Toggles are serialized, so ordering by commit time alternates the flag.
    results.sort_by_key(|t| t.updated_at);
    for (i, toggled) in results.iter().enumerate() {
        assert_eq!(toggled.completed, i % 2 == 0);
    }
    assert_eq!(results.last().unwrap(), &stored);
    assert!(stored.updated_at > stored.created_at);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_updates_last_commit_wins() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_database(&dir).await;
    let task = db.create_task("Task A").await.unwrap();

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let db = db.clone();
            tokio::spawn(async move {
                let patch = TaskPatch::default().with_title(format!("Title {i}"));
                db.update_task(task.id, &patch).await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(WRITERS);
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    let titles: HashSet<_> = results.iter().map(|t| t.title.clone()).collect();
    assert_eq!(titles.len(), WRITERS);

    let stored = db.get_task(task.id).await.unwrap().unwrap();
    let last = results.iter().max_by_key(|t| t.updated_at).unwrap();
    assert_eq!(last, &stored);
    assert!(!stored.completed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_mixed_writes_through_store_trait() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn TaskStore> = Arc::new(file_database(&dir).await);
    let task = store.create_task("Task A").await.unwrap();

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                if i % 2 == 0 {
                    store.toggle_task(task.id).await.map(|_| ())
                } else {
                    let patch = TaskPatch::default().with_title(format!("Title {i}"));
                    store.update_task(task.id, &patch).await.map(|_| ())
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let toggles = (0..WRITERS).filter(|i| i % 2 == 0).count();
    let stored = store.get_task(task.id).await.unwrap().unwrap();
    assert_eq!(stored.completed, toggles % 2 == 1);
    assert!(stored.title.starts_with("Title "));
}
