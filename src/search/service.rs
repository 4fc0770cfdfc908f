//! Wiring of the search core from a `SearchConfig`

use std::sync::Arc;

use super::assembler::ContentAssembler;
use super::errors::SearchResult;
use super::hooks::LifecycleHooks;
use super::incremental::{BatchDrainer, DrainSchedule};
use super::manager::IndexManager;
use super::query::QueryEngine;
use super::queue::IndexingQueue;
use super::store::{IndexStore, TantivyIndexStore};
use crate::config::SearchConfig;
use crate::content::ContentResolver;

/// File name of the durable queue inside `index_dir`
pub const QUEUE_DB_FILE: &str = "search_queue.sqlite";

/// Every search component, built from one configuration
pub struct SearchService {
    config: SearchConfig,
    manager: Arc<IndexManager>,
    drainer: Arc<BatchDrainer>,
    query: QueryEngine,
    hooks: LifecycleHooks,
}

impl SearchService {
    /// Build the core on Tantivy.
    ///
    /// With an `index_dir` the index and a SQLite queue live on disk; without
    /// one both are kept in memory.
    pub async fn open(
        config: SearchConfig,
        resolver: Arc<dyn ContentResolver>,
        assembler: ContentAssembler,
    ) -> SearchResult<Self> {
        config.validate()?;

        let (store, queue): (Arc<dyn IndexStore>, IndexingQueue) = match config.index_dir() {
            Some(dir) => {
                tokio::fs::create_dir_all(dir).await?;
                let store = TantivyIndexStore::in_dir(dir, config.writer_memory_bytes());
                let queue = IndexingQueue::open_sqlite(&dir.join(QUEUE_DB_FILE)).await?;
                (Arc::new(store), queue)
            }
            None => (
                Arc::new(TantivyIndexStore::in_memory(config.writer_memory_bytes())),
                IndexingQueue::in_memory(),
            ),
        };

        Ok(Self::from_parts(config, store, queue, resolver, assembler))
    }

    /// Build the core on caller-supplied stores
    #[must_use]
    pub fn from_parts(
        config: SearchConfig,
        store: Arc<dyn IndexStore>,
        queue: IndexingQueue,
        resolver: Arc<dyn ContentResolver>,
        assembler: ContentAssembler,
    ) -> Self {
        let manager = Arc::new(IndexManager::new(
            store,
            Arc::new(assembler),
            config.index_name(),
        ));
        let drainer = Arc::new(BatchDrainer::new(
            queue.clone(),
            manager.clone(),
            resolver.clone(),
            config.batch_size(),
        ));
        let query = QueryEngine::new(manager.clone(), resolver, &config);
        let hooks = LifecycleHooks::new(queue);

        tracing::info!(
            index = %config.index_name(),
            on_disk = config.index_dir().is_some(),
            "Search core initialized"
        );

        Self {
            config,
            manager,
            drainer,
            query,
            hooks,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn manager(&self) -> &Arc<IndexManager> {
        &self.manager
    }

    #[must_use]
    pub fn queue(&self) -> &IndexingQueue {
        self.drainer.queue()
    }

    #[must_use]
    pub fn drainer(&self) -> &Arc<BatchDrainer> {
        &self.drainer
    }

    #[must_use]
    pub fn query(&self) -> &QueryEngine {
        &self.query
    }

    #[must_use]
    pub fn hooks(&self) -> &LifecycleHooks {
        &self.hooks
    }

    /// Start draining on the configured interval
    pub fn spawn_drain(&self) -> DrainSchedule {
        self.drainer.clone().spawn(self.config.drain_interval())
    }
}
