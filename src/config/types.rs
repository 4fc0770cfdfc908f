//! Core configuration types for search indexing
//!
//! This module contains the main `SearchConfig` struct and the defaults for
//! every key the search core consumes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::content::MemoryCeiling;

/// Well-known name of the single index per deployment
pub const DEFAULT_INDEX_NAME: &str = "content.index";

/// Main configuration struct for the search core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Directory holding the on-disk index.
    ///
    /// `None` keeps the index in RAM, which is what tests and short-lived
    /// tools want.
    pub(crate) index_dir: Option<PathBuf>,
    pub(crate) index_name: String,

    /// Results per page for the presentation layer
    pub(crate) results_per_page: usize,

    /// Characters (bytes of UTF-8 text, rounded up to a char boundary) per
    /// highlight window
    pub(crate) highlight_length: usize,

    /// Maximum highlight windows returned per item
    pub(crate) highlight_count: usize,

    /// Maximum entries applied per drain cycle
    pub(crate) batch_size: usize,

    /// Memory ceiling for attached-file extraction, before the floor is applied
    pub(crate) memory_ceiling: Option<MemoryCeiling>,

    /// Floor the ceiling is raised to before extraction begins
    pub(crate) memory_ceiling_floor: MemoryCeiling,

    /// Levenshtein distance for fuzzy matching; 0 disables fuzziness
    pub(crate) fuzzy_distance: u8,

    /// Upper bound on ids returned by one full-text search
    pub(crate) max_results: usize,

    /// Number of assembled articles kept in the LRU cache
    pub(crate) article_cache_capacity: usize,

    /// Memory budget handed to the index writer
    pub(crate) writer_memory_bytes: usize,

    /// Seconds between scheduled drain cycles
    pub(crate) drain_interval_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_dir: None,
            index_name: DEFAULT_INDEX_NAME.to_string(),
            results_per_page: 20,
            highlight_length: 200,
            highlight_count: 3,
            batch_size: 10,
            memory_ceiling: None,
            memory_ceiling_floor: MemoryCeiling::DEFAULT_FLOOR,
            fuzzy_distance: 2,
            max_results: 500,
            article_cache_capacity: 1024,
            writer_memory_bytes: 50_000_000,
            drain_interval_secs: 60,
        }
    }
}
