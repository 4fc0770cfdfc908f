//! Search query execution and highlighting
//!
//! A query is answered from two sources: fuzzy full-text matches from the
//! index, and exact direct-reference lookups through the content resolver.
//! Both are merged into one deduplicated id set.

mod highlight;
mod markup;

pub use highlight::{HighlightExtractor, select_windows};
pub use markup::{Highlighter, MARK_CLOSE, MARK_OPEN, strip_tags};

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::SearchConfig;
use crate::content::ContentResolver;
use crate::log_search_operation;
use crate::search::manager::IndexManager;
use crate::search::store::SearchOptions;

/// One page of result ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPage {
    /// 1-based page number, clamped to the last page
    pub page: usize,
    pub per_page: usize,
    /// Number of ids across all pages
    pub total: usize,
    pub ids: Vec<String>,
}

impl SearchPage {
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page.max(1))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A resolved result with its highlight windows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub highlights: Vec<String>,
}

/// Answers queries by merging index matches with direct references
pub struct QueryEngine {
    manager: Arc<IndexManager>,
    resolver: Arc<dyn ContentResolver>,
    highlighter: HighlightExtractor,
    options: SearchOptions,
    results_per_page: usize,
}

impl QueryEngine {
    #[must_use]
    pub fn new(
        manager: Arc<IndexManager>,
        resolver: Arc<dyn ContentResolver>,
        config: &SearchConfig,
    ) -> Self {
        let highlighter = HighlightExtractor::new(
            manager.assembler().clone(),
            config.highlight_length(),
            config.highlight_count(),
        );
        Self {
            manager,
            resolver,
            highlighter,
            options: config.search_options(),
            results_per_page: config.results_per_page().max(1),
        }
    }

    #[must_use]
    pub fn highlighter(&self) -> &HighlightExtractor {
        &self.highlighter
    }

    /// Ids of every item matching `query`.
    ///
    /// Index failures are logged and leave only the direct-reference matches.
    pub fn search(&self, query: &str) -> HashSet<String> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return HashSet::new();
        }

        let mut ids: HashSet<String> =
            match log_search_operation!(self.manager.search(query, &self.options), trimmed) {
                Ok(hits) => hits.into_iter().collect(),
                Err(_) => HashSet::new(),
            };

        ids.extend(self.resolver.locate(trimmed));
        ids.retain(|id| !id.is_empty());
        ids
    }

    /// The `page`th page (1-based) of sorted result ids
    pub fn search_page(&self, query: &str, page: usize) -> SearchPage {
        let mut ids: Vec<String> = self.search(query).into_iter().collect();
        ids.sort_unstable();

        let per_page = self.results_per_page;
        let total = ids.len();
        let last_page = total.div_ceil(per_page).max(1);
        let page = page.clamp(1, last_page);

        let ids = ids
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        SearchPage {
            page,
            per_page,
            total,
            ids,
        }
    }

    /// Resolve a page of ids into hits; ids that no longer resolve are skipped
    pub fn hits(&self, query: &str, page: &SearchPage) -> Vec<SearchHit> {
        page.ids
            .iter()
            .filter_map(|id| self.resolver.read(id))
            .map(|item| SearchHit {
                id: item.id().to_string(),
                title: item.search_result_title().unwrap_or_else(|| item.title()),
                highlights: self.highlighter.highlights(query, item.as_ref()),
            })
            .collect()
    }
}
