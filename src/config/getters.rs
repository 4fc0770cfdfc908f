//! Getter methods for `SearchConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from a `SearchConfig` instance.

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use super::types::SearchConfig;
use crate::content::MemoryCeiling;
use crate::search::store::SearchOptions;

impl SearchConfig {
    #[must_use]
    pub fn index_dir(&self) -> Option<&Path> {
        self.index_dir.as_deref()
    }

    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    #[must_use]
    pub fn results_per_page(&self) -> usize {
        self.results_per_page
    }

    #[must_use]
    pub fn highlight_length(&self) -> usize {
        self.highlight_length
    }

    #[must_use]
    pub fn highlight_count(&self) -> usize {
        self.highlight_count
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[must_use]
    pub fn fuzzy_distance(&self) -> u8 {
        self.fuzzy_distance
    }

    #[must_use]
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    #[must_use]
    pub fn writer_memory_bytes(&self) -> usize {
        self.writer_memory_bytes
    }

    /// Cache capacity, never zero
    #[must_use]
    pub fn article_cache_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.article_cache_capacity).unwrap_or(NonZeroUsize::MIN)
    }

    #[must_use]
    pub fn memory_ceiling(&self) -> Option<MemoryCeiling> {
        self.memory_ceiling
    }

    #[must_use]
    pub fn memory_ceiling_floor(&self) -> MemoryCeiling {
        self.memory_ceiling_floor
    }

    /// Ceiling used for extraction: the configured value raised to the floor
    #[must_use]
    pub fn effective_memory_ceiling(&self) -> MemoryCeiling {
        self.memory_ceiling
            .unwrap_or(self.memory_ceiling_floor)
            .raised_to(self.memory_ceiling_floor)
    }

    #[must_use]
    pub fn drain_interval(&self) -> Duration {
        Duration::from_secs(self.drain_interval_secs)
    }

    /// Options passed to the index store on every full-text search
    #[must_use]
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            fuzzy_distance: self.fuzzy_distance,
            limit: self.max_results,
        }
    }
}
