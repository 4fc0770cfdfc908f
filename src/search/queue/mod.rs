//! Deduplicating queue of pending per-item index actions
//!
//! Content mutations land here instead of touching the index directly. The
//! queue holds at most one entry per item id: a later `put` for the same id
//! replaces the earlier action in place, so an item keeps its original FIFO
//! position no matter how often it is re-queued before the next drain.

mod memory;
mod sqlite;

pub use memory::MemoryQueueStore;
pub use sqlite::SqliteQueueStore;

use futures::future::BoxFuture;
use std::path::Path;
use std::sync::Arc;

use super::errors::SearchResult;
use super::manager::{IdSource, sanitize_id};
use super::types::{IndexAction, QueueEntry};

/// Backing store for the indexing queue.
///
/// `pull_one` must be atomic: an entry handed to one caller is removed and is
/// never returned again.
pub trait QueueStore: Send + Sync {
    /// Insert or replace the pending entry for `entry.item_id`
    fn put(&self, entry: QueueEntry) -> BoxFuture<'_, SearchResult<()>>;

    /// Remove and return the oldest pending entry
    fn pull_one(&self) -> BoxFuture<'_, SearchResult<Option<QueueEntry>>>;

    /// Number of pending entries
    fn len(&self) -> BoxFuture<'_, SearchResult<usize>>;
}

/// Work queue feeding the batch drainer
#[derive(Clone)]
pub struct IndexingQueue {
    store: Arc<dyn QueueStore>,
}

impl IndexingQueue {
    #[must_use]
    pub fn new(store: Arc<dyn QueueStore>) -> Self {
        Self { store }
    }

    /// Non-durable queue kept in process memory
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryQueueStore::new()))
    }

    /// Durable queue in the SQLite database at `path`
    pub async fn open_sqlite(path: &Path) -> SearchResult<Self> {
        let store = SqliteQueueStore::open(path).await?;
        Ok(Self::new(Arc::new(store)))
    }

    pub async fn put(&self, entry: QueueEntry) -> SearchResult<()> {
        self.store.put(entry).await
    }

    pub async fn pull_one(&self) -> SearchResult<Option<QueueEntry>> {
        self.store.pull_one().await
    }

    /// Queue an item for (re)indexing
    pub async fn enqueue_index<'a>(&self, id: impl Into<IdSource<'a>>) -> SearchResult<()> {
        self.enqueue(id.into(), IndexAction::Index).await
    }

    /// Queue an item for removal from the index
    pub async fn enqueue_delete<'a>(&self, id: impl Into<IdSource<'a>>) -> SearchResult<()> {
        self.enqueue(id.into(), IndexAction::Delete).await
    }

    async fn enqueue(&self, source: IdSource<'_>, action: IndexAction) -> SearchResult<()> {
        let item_id = sanitize_id(source);
        if item_id.is_empty() {
            tracing::debug!(action = %action, "Dropping queue entry with empty id");
            return Ok(());
        }
        tracing::debug!(item_id = %item_id, action = %action, "Queued search index action");
        self.put(QueueEntry { item_id, action }).await
    }

    pub async fn len(&self) -> SearchResult<usize> {
        self.store.len().await
    }

    pub async fn is_empty(&self) -> SearchResult<bool> {
        Ok(self.len().await? == 0)
    }
}
