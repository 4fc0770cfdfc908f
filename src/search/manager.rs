//! Transactional index mutations
//!
//! `IndexManager` is the only component that writes to the index store. It
//! selects the index lazily (creating it on first use), keeps a reentrant
//! transaction counter so nested begin/end pairs collapse into one store
//! transaction, and turns content items into index records.

use parking_lot::Mutex;
use std::sync::Arc;

use super::assembler::ContentAssembler;
use super::errors::{SearchError, SearchResult};
use super::store::{IndexStore, SearchOptions};
use super::types::IndexRecord;
use crate::content::ContentItem;

/// Anything an index id can be derived from
#[derive(Clone, Copy)]
pub enum IdSource<'a> {
    /// A live item; its id is used as is
    Item(&'a dyn ContentItem),
    /// A raw reference string, normalized to `[a-z0-9]`
    Raw(&'a str),
    None,
}

impl<'a> From<&'a dyn ContentItem> for IdSource<'a> {
    fn from(item: &'a dyn ContentItem) -> Self {
        IdSource::Item(item)
    }
}

impl<'a> From<&'a Arc<dyn ContentItem>> for IdSource<'a> {
    fn from(item: &'a Arc<dyn ContentItem>) -> Self {
        IdSource::Item(item.as_ref())
    }
}

impl<'a> From<&'a str> for IdSource<'a> {
    fn from(raw: &'a str) -> Self {
        IdSource::Raw(raw)
    }
}

impl<'a> From<&'a String> for IdSource<'a> {
    fn from(raw: &'a String) -> Self {
        IdSource::Raw(raw.as_str())
    }
}

impl<'a> From<Option<&'a str>> for IdSource<'a> {
    fn from(raw: Option<&'a str>) -> Self {
        raw.map_or(IdSource::None, IdSource::Raw)
    }
}

/// Normalize an id source into an index key.
///
/// Items yield their own id. Raw strings are lower-cased and stripped of every
/// character outside `[a-z0-9]`. `None` yields the empty string.
///
/// ```
/// use content_search::search::{IdSource, sanitize_id};
///
/// assert_eq!(sanitize_id("My Noun #123!"), "mynoun123");
/// assert_eq!(sanitize_id(IdSource::None), "");
/// ```
#[must_use]
pub fn sanitize_id<'a>(source: impl Into<IdSource<'a>>) -> String {
    match source.into() {
        IdSource::Item(item) => item.id().to_string(),
        IdSource::Raw(raw) => raw
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .collect(),
        IdSource::None => String::new(),
    }
}

#[derive(Debug, Default)]
struct TransactionState {
    depth: usize,
    selected: bool,
}

/// Applies index and delete mutations under reentrant transactions
pub struct IndexManager {
    store: Arc<dyn IndexStore>,
    assembler: Arc<ContentAssembler>,
    index_name: String,
    state: Mutex<TransactionState>,
}

impl IndexManager {
    #[must_use]
    pub fn new(
        store: Arc<dyn IndexStore>,
        assembler: Arc<ContentAssembler>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            assembler,
            index_name: index_name.into(),
            state: Mutex::new(TransactionState::default()),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn IndexStore> {
        &self.store
    }

    #[must_use]
    pub fn assembler(&self) -> &Arc<ContentAssembler> {
        &self.assembler
    }

    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Current transaction nesting depth
    #[must_use]
    pub fn depth(&self) -> usize {
        self.state.lock().depth
    }

    /// Select the index, creating it first if it does not exist yet
    pub fn ensure_index(&self) -> SearchResult<()> {
        let mut state = self.state.lock();
        self.select_locked(&mut state)
    }

    fn select_locked(&self, state: &mut TransactionState) -> SearchResult<()> {
        if state.selected {
            return Ok(());
        }
        match self.store.select_index(&self.index_name) {
            Ok(()) => {}
            Err(e) if e.is_missing_index() => {
                tracing::info!(index = %self.index_name, "Search index missing, creating it");
                self.store.create_index(&self.index_name)?;
                self.store.select_index(&self.index_name)?;
            }
            Err(e) => return Err(e),
        }
        state.selected = true;
        Ok(())
    }

    /// Enter a transaction; only the outermost call opens one on the store
    pub fn begin(&self) -> SearchResult<()> {
        let mut state = self.state.lock();
        if state.depth == 0 {
            self.select_locked(&mut state)?;
            self.store.begin_transaction()?;
        }
        state.depth += 1;
        Ok(())
    }

    /// Leave a transaction; only the outermost call commits.
    ///
    /// An `end` without a matching `begin` is ignored with a warning.
    pub fn end(&self) -> SearchResult<()> {
        let mut state = self.state.lock();
        if state.depth == 0 {
            tracing::warn!(index = %self.index_name, "Unmatched end of index transaction ignored");
            return Ok(());
        }
        state.depth -= 1;
        if state.depth > 0 {
            return Ok(());
        }
        self.store.commit().inspect_err(|e| {
            tracing::error!(index = %self.index_name, error = %e, "Index commit failed");
        })
    }

    /// Begin a transaction that ends when the guard is finished or dropped
    pub fn transaction(&self) -> SearchResult<TransactionGuard<'_>> {
        self.begin()?;
        Ok(TransactionGuard {
            manager: self,
            finished: false,
        })
    }

    /// Write `item` into the index, or remove it if it is deleted or opted out
    pub fn index(&self, item: &dyn ContentItem) -> SearchResult<()> {
        if item.is_deleted() || !item.search_indexed() {
            return self.delete(item);
        }

        // Always reflect current content, never a stale cached article
        self.assembler.invalidate(item.id());

        let record = IndexRecord {
            id: sanitize_id(item),
            title: item.search_result_title().unwrap_or_else(|| item.title()),
            article: self.assembler.article(item),
        };
        if record.id.is_empty() {
            return Err(SearchError::IndexingFailed {
                doc_id: String::new(),
                message: "item has an empty id".to_string(),
            });
        }

        let guard = self.transaction()?;
        self.store.update(&record)?;
        tracing::debug!(item_id = %record.id, "Item indexed");
        guard.finish()
    }

    /// Remove an item from the index; absent ids are not an error
    pub fn delete<'a>(&self, source: impl Into<IdSource<'a>>) -> SearchResult<()> {
        let id = sanitize_id(source);
        if id.is_empty() {
            tracing::debug!("Ignoring delete for empty id");
            return Ok(());
        }

        let guard = self.transaction()?;
        self.store.delete(&id)?;
        tracing::debug!(item_id = %id, "Item removed from index");
        guard.finish()
    }

    /// Full-text search against the selected index
    pub fn search(&self, query: &str, options: &SearchOptions) -> SearchResult<Vec<String>> {
        self.ensure_index()?;
        self.store.search(query, options)
    }
}

/// Scoped transaction; ends on `finish` or on drop, whichever comes first
#[must_use = "dropping the guard ends the transaction immediately"]
pub struct TransactionGuard<'a> {
    manager: &'a IndexManager,
    finished: bool,
}

impl TransactionGuard<'_> {
    /// End the transaction, surfacing a commit failure
    pub fn finish(mut self) -> SearchResult<()> {
        self.finished = true;
        self.manager.end()
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.manager.end() {
            tracing::error!(error = %e, "Failed to end index transaction on drop");
        }
    }
}
