//! Durable queue store on SQLite
//!
//! One row per pending item. `item_id` is unique, so re-queueing an item is an
//! upsert that keeps the row's `seq` and therefore its place in line. Pulling
//! is a single `DELETE ... RETURNING` on the lowest `seq`, which SQLite runs
//! atomically.

use futures::future::{BoxFuture, FutureExt};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

use super::QueueStore;
use crate::search::errors::{SearchError, SearchResult};
use crate::search::types::{IndexAction, QueueEntry};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS search_queue (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    item_id TEXT NOT NULL UNIQUE,
    action TEXT NOT NULL,
    queued_at INTEGER NOT NULL
);
"#;

/// Queue store persisted in a SQLite database file
#[derive(Clone)]
pub struct SqliteQueueStore {
    pool: SqlitePool,
}

impl SqliteQueueStore {
    /// Open the database at `path`, creating it and its schema if missing
    pub async fn open(path: &Path) -> SearchResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| SearchError::Queue(format!("Failed to open queue database {path:?}: {e}")))?;

        sqlx::query(SCHEMA_SQL).execute(&pool).await?;

        tracing::debug!(path = %path.display(), "Search queue database opened");
        Ok(Self { pool })
    }

    async fn put_entry(&self, entry: QueueEntry) -> SearchResult<()> {
        sqlx::query(
            r#"
            INSERT INTO search_queue (item_id, action, queued_at)
            VALUES (?, ?, ?)
            ON CONFLICT(item_id) DO UPDATE SET
                action = excluded.action,
                queued_at = excluded.queued_at
            "#,
        )
        .bind(&entry.item_id)
        .bind(entry.action.as_str())
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn pull_entry(&self) -> SearchResult<Option<QueueEntry>> {
        let row: Option<(String, String)> = sqlx::query_as(
            r#"
            DELETE FROM search_queue
            WHERE seq = (SELECT MIN(seq) FROM search_queue)
            RETURNING item_id, action
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(item_id, action)| -> SearchResult<QueueEntry> {
            let action: IndexAction = action.parse()?;
            Ok(QueueEntry { item_id, action })
        })
        .transpose()
    }

    async fn count(&self) -> SearchResult<usize> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM search_queue")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

impl QueueStore for SqliteQueueStore {
    fn put(&self, entry: QueueEntry) -> BoxFuture<'_, SearchResult<()>> {
        self.put_entry(entry).boxed()
    }

    fn pull_one(&self) -> BoxFuture<'_, SearchResult<Option<QueueEntry>>> {
        self.pull_entry().boxed()
    }

    fn len(&self) -> BoxFuture<'_, SearchResult<usize>> {
        self.count().boxed()
    }
}
