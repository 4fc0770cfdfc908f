//! Setters, loading and validation for `SearchConfig`

use std::path::{Path, PathBuf};

use super::types::SearchConfig;
use crate::content::MemoryCeiling;
use crate::search::errors::{SearchError, SearchResult};

impl SearchConfig {
    /// Parse a JSON document; missing keys take their defaults
    pub fn from_json_str(json: &str) -> SearchResult<Self> {
        let config: SearchConfig = serde_json::from_str(json)
            .map_err(|e| SearchError::Config(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> SearchResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values the core cannot operate with
    pub fn validate(&self) -> SearchResult<()> {
        if self.index_name.trim().is_empty() {
            return Err(SearchError::Config("index_name must not be empty".into()));
        }
        if self.batch_size == 0 {
            return Err(SearchError::Config("batch_size must be at least 1".into()));
        }
        if self.highlight_length == 0 {
            return Err(SearchError::Config(
                "highlight_length must be at least 1".into(),
            ));
        }
        if self.results_per_page == 0 {
            return Err(SearchError::Config(
                "results_per_page must be at least 1".into(),
            ));
        }
        if self.article_cache_capacity == 0 {
            return Err(SearchError::Config(
                "article_cache_capacity must be at least 1".into(),
            ));
        }
        // Tantivy only ships Levenshtein automata up to distance 2
        if self.fuzzy_distance > 2 {
            return Err(SearchError::Config(format!(
                "fuzzy_distance {} exceeds the supported maximum of 2",
                self.fuzzy_distance
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_index_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.index_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = name.into();
        self
    }

    #[must_use]
    pub fn with_results_per_page(mut self, per_page: usize) -> Self {
        self.results_per_page = per_page;
        self
    }

    #[must_use]
    pub fn with_highlight_length(mut self, length: usize) -> Self {
        self.highlight_length = length;
        self
    }

    #[must_use]
    pub fn with_highlight_count(mut self, count: usize) -> Self {
        self.highlight_count = count;
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn with_memory_ceiling(mut self, ceiling: MemoryCeiling) -> Self {
        self.memory_ceiling = Some(ceiling);
        self
    }

    #[must_use]
    pub fn with_memory_ceiling_floor(mut self, floor: MemoryCeiling) -> Self {
        self.memory_ceiling_floor = floor;
        self
    }

    #[must_use]
    pub fn with_fuzzy_distance(mut self, distance: u8) -> Self {
        self.fuzzy_distance = distance;
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub fn with_article_cache_capacity(mut self, capacity: usize) -> Self {
        self.article_cache_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_writer_memory_bytes(mut self, bytes: usize) -> Self {
        self.writer_memory_bytes = bytes;
        self
    }

    #[must_use]
    pub fn with_drain_interval_secs(mut self, secs: u64) -> Self {
        self.drain_interval_secs = secs;
        self
    }
}
