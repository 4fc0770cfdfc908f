//! Asynchronous full-text indexing and querying of content items
//!
//! Mutations are queued through [`LifecycleHooks`], drained in bounded batches
//! by the [`BatchDrainer`] into a Tantivy index via the [`IndexManager`], and
//! answered by the [`QueryEngine`] with highlight snippets from the
//! [`HighlightExtractor`].

pub mod assembler;
pub mod errors;
pub mod hooks;
pub mod incremental;
pub mod manager;
pub mod query;
pub mod queue;
pub mod service;
pub mod store;
pub mod types;

pub use assembler::{ContentAssembler, collapse_repeats};
pub use errors::{SearchError, SearchResult};
pub use hooks::{LifecycleEvent, LifecycleHooks, Mutation, Relation};
pub use incremental::{BatchDrainer, DrainSchedule, DrainStats, DrainStatsSnapshot};
pub use manager::{IdSource, IndexManager, TransactionGuard, sanitize_id};
pub use query::{
    HighlightExtractor, Highlighter, QueryEngine, SearchHit, SearchPage, select_windows,
    strip_tags,
};
pub use queue::{IndexingQueue, MemoryQueueStore, QueueStore, SqliteQueueStore};
pub use service::SearchService;
pub use store::{IndexSchema, IndexStore, SearchOptions, TantivyIndexStore};
pub use types::{DrainReport, IndexAction, IndexRecord, QueueEntry};

use std::sync::Arc;

use crate::config::SearchConfig;
use crate::content::ContentResolver;

/// Initialize the search core with a default assembler
pub async fn initialize_search(
    config: SearchConfig,
    resolver: Arc<dyn ContentResolver>,
) -> SearchResult<SearchService> {
    let assembler = ContentAssembler::new(&config);
    SearchService::open(config, resolver, assembler).await
}
