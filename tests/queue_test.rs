mod common;

use content_search::search::{IdSource, IndexAction, IndexingQueue, QueueEntry, SqliteQueueStore};
use std::sync::Arc;
use tempfile::TempDir;

use common::FakeItem;

#[tokio::test]
async fn test_put_replaces_pending_entry_for_same_id() {
    let queue = IndexingQueue::in_memory();

    queue.put(QueueEntry::index("abc")).await.unwrap();
    queue.put(QueueEntry::index("def")).await.unwrap();
    queue.put(QueueEntry::delete("abc")).await.unwrap();

    assert_eq!(queue.len().await.unwrap(), 2);

    let first = queue.pull_one().await.unwrap().unwrap();
    assert_eq!(first, QueueEntry::delete("abc"));
    let second = queue.pull_one().await.unwrap().unwrap();
    assert_eq!(second, QueueEntry::index("def"));
    assert!(queue.pull_one().await.unwrap().is_none());
    assert!(queue.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_enqueue_sanitizes_raw_ids() {
    let queue = IndexingQueue::in_memory();

    queue.enqueue_index("My Noun #123!").await.unwrap();
    queue.enqueue_delete("mynoun123").await.unwrap();

    assert_eq!(queue.len().await.unwrap(), 1);
    let entry = queue.pull_one().await.unwrap().unwrap();
    assert_eq!(entry.item_id, "mynoun123");
    assert_eq!(entry.action, IndexAction::Delete);
}

#[tokio::test]
async fn test_enqueue_uses_item_id_verbatim() {
    let queue = IndexingQueue::in_memory();
    let item = FakeItem::new("Item42", "Title", "Body");

    queue
        .enqueue_index(IdSource::Item(&item))
        .await
        .unwrap();

    let entry = queue.pull_one().await.unwrap().unwrap();
    assert_eq!(entry.item_id, "Item42");
}

#[tokio::test]
async fn test_enqueue_drops_empty_ids() {
    let queue = IndexingQueue::in_memory();

    queue.enqueue_index(IdSource::None).await.unwrap();
    queue.enqueue_index("!!! ###").await.unwrap();
    queue.enqueue_delete("").await.unwrap();

    assert!(queue.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_sqlite_queue_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("queue").join("search_queue.sqlite");

    {
        let queue = IndexingQueue::open_sqlite(&db_path).await.unwrap();
        queue.enqueue_index("first").await.unwrap();
        queue.enqueue_index("second").await.unwrap();
        queue.enqueue_delete("first").await.unwrap();
        assert_eq!(queue.len().await.unwrap(), 2);
    }

    let queue = IndexingQueue::open_sqlite(&db_path).await.unwrap();
    assert_eq!(queue.len().await.unwrap(), 2);

    // Replacing "first" kept its place ahead of "second"
    let first = queue.pull_one().await.unwrap().unwrap();
    assert_eq!(first, QueueEntry::delete("first"));
    let second = queue.pull_one().await.unwrap().unwrap();
    assert_eq!(second, QueueEntry::index("second"));
    assert!(queue.pull_one().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sqlite_concurrent_pulls_never_duplicate() {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteQueueStore::open(&temp_dir.path().join("q.sqlite"))
        .await
        .unwrap();
    let queue = IndexingQueue::new(Arc::new(store));

    for i in 0..20 {
        queue.enqueue_index(format!("item{i}").as_str()).await.unwrap();
    }

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let queue = queue.clone();
        tasks.push(tokio::spawn(async move {
            let mut pulled = Vec::new();
            while let Some(entry) = queue.pull_one().await.unwrap() {
                pulled.push(entry.item_id);
            }
            pulled
        }));
    }

    let mut all = Vec::new();
    for task in tasks {
        all.extend(task.await.unwrap());
    }
    all.sort();
    let before = all.len();
    all.dedup();

    assert_eq!(before, 20);
    assert_eq!(all.len(), 20);
}
