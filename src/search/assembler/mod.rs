//! Canonical searchable text for content items
//!
//! The article for an item is every piece of text that should make it findable,
//! joined into one string: URL nouns, name, title, body, extra text the item
//! offers, attached-file text and whatever registered contributors add. Adjacent
//! repeats are collapsed at the end. Articles are cached per item id in a
//! bounded LRU.

mod dedup;
mod files;

pub use dedup::collapse_repeats;

use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use crate::config::SearchConfig;
use crate::content::{ContentItem, FileStore, MemoryCeiling, PdfTextExtractor, SearchContributor};

/// Builds and caches item articles
pub struct ContentAssembler {
    cache: Mutex<LruCache<String, String>>,
    file_store: Option<Arc<dyn FileStore>>,
    pdf_extractor: Option<Arc<dyn PdfTextExtractor>>,
    contributors: RwLock<Vec<Arc<dyn SearchContributor>>>,
    memory_ceiling: MemoryCeiling,
    memory_ceiling_floor: MemoryCeiling,
}

impl ContentAssembler {
    #[must_use]
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(config.article_cache_capacity())),
            file_store: None,
            pdf_extractor: None,
            contributors: RwLock::new(Vec::new()),
            memory_ceiling: config.effective_memory_ceiling(),
            memory_ceiling_floor: config.memory_ceiling_floor(),
        }
    }

    #[must_use]
    pub fn with_file_store(mut self, file_store: Arc<dyn FileStore>) -> Self {
        self.file_store = Some(file_store);
        self
    }

    #[must_use]
    pub fn with_pdf_extractor(mut self, extractor: Arc<dyn PdfTextExtractor>) -> Self {
        self.pdf_extractor = Some(extractor);
        self
    }

    #[must_use]
    pub fn with_contributor(self, contributor: Arc<dyn SearchContributor>) -> Self {
        self.register_contributor(contributor);
        self
    }

    /// Add a contributor; contributions are appended in registration order
    pub fn register_contributor(&self, contributor: Arc<dyn SearchContributor>) {
        tracing::debug!(contributor = %contributor.name(), "Search contributor registered");
        self.contributors.write().push(contributor);
    }

    /// Cached article for `item`, assembling it on a miss
    pub fn article(&self, item: &dyn ContentItem) -> String {
        if let Some(article) = self.cache.lock().get(item.id()) {
            return article.clone();
        }

        // Assembled outside the lock; concurrent misses race and the last store wins
        let article = self.build_article(item);
        self.cache.lock().put(item.id().to_string(), article.clone());
        article
    }

    /// Drop the cached article for `id`
    pub fn invalidate(&self, id: &str) {
        self.cache.lock().pop(id);
    }

    /// Assemble the article for `item` without consulting the cache
    pub fn build_article(&self, item: &dyn ContentItem) -> String {
        let url = item.url();
        let mut parts = vec![url.noun, url.canonical_noun, item.name(), item.title(), item.body()];

        if let Some(extra) = item.additional_search_text() {
            parts.push(extra);
        }
        parts.push(self.extract_file_text(item, self.memory_ceiling));

        let contributors = self.contributors.read().clone();
        for contributor in contributors {
            if let Some(text) = contributor.contribution(item) {
                parts.push(text);
            }
        }

        collapse_repeats(&parts.join(" "))
    }

    /// Number of cached articles
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}
