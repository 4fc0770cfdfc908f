//! Index storage engine seam
//!
//! The search core drives an existing full-text engine through [`IndexStore`].
//! [`TantivyIndexStore`] is the production implementation.

mod schema;
mod tantivy_store;

pub use schema::{IndexSchema, SchemaError};
pub use tantivy_store::TantivyIndexStore;

use super::errors::SearchResult;
use super::types::IndexRecord;

/// Per-search options handed to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Levenshtein distance per term; 0 means exact term matching
    pub fuzzy_distance: u8,
    /// Upper bound on returned ids
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fuzzy_distance: 2,
            limit: 500,
        }
    }
}

/// Operations the core needs from the underlying index engine.
///
/// Implementations use interior mutability; the
/// [`IndexManager`](crate::search::IndexManager) serializes transaction
/// boundaries on top of them.
pub trait IndexStore: Send + Sync {
    /// Select an existing index, failing with `SearchError::IndexNotFound` if absent
    fn select_index(&self, name: &str) -> SearchResult<()>;

    /// Create an empty index under `name`
    fn create_index(&self, name: &str) -> SearchResult<()>;

    /// Open a write transaction on the selected index
    fn begin_transaction(&self) -> SearchResult<()>;

    /// Commit the open transaction and make its writes visible to searches
    fn commit(&self) -> SearchResult<()>;

    /// Insert or replace the document with `record.id`
    fn update(&self, record: &IndexRecord) -> SearchResult<()>;

    /// Remove the document with `id`; absent ids are not an error
    fn delete(&self, id: &str) -> SearchResult<()>;

    /// Full-text search returning matching document ids
    fn search(&self, query: &str, options: &SearchOptions) -> SearchResult<Vec<String>>;
}
