//! Content-side collaborators consumed by the search core
//!
//! The search core never owns or mutates content. It reads items through the
//! [`ContentItem`] trait, resolves ids through a [`ContentResolver`], and
//! collects extra searchable text from registered [`SearchContributor`]s.

pub mod files;

pub use files::{AttachedFile, FileStore, MemoryCeiling, PDF_MIME_TYPE, PdfTextExtractor};

use std::sync::Arc;

/// URL components of a content item that are folded into its article
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUrl {
    /// Noun segment of the item's own URL
    pub noun: String,
    /// Noun segment of the item's canonical URL
    pub canonical_noun: String,
}

/// A unit of content identified by a stable id.
///
/// The three capability methods have defaults, so an implementation only
/// overrides the ones it supports:
/// - `search_indexed` defaults to `true`
/// - `search_result_title` defaults to `None`, meaning `title()` is used
/// - `additional_search_text` defaults to `None`
pub trait ContentItem: Send + Sync {
    fn id(&self) -> &str;
    fn is_deleted(&self) -> bool;
    fn title(&self) -> String;
    fn body(&self) -> String;
    fn name(&self) -> String;
    fn url(&self) -> ItemUrl;

    /// Whether this item belongs in the search index at all
    fn search_indexed(&self) -> bool {
        true
    }

    /// Title to store in the index instead of `title()`
    fn search_result_title(&self) -> Option<String> {
        None
    }

    /// Extra text appended to the article after the body
    fn additional_search_text(&self) -> Option<String> {
        None
    }
}

/// Resolves ids and direct references to live content items
pub trait ContentResolver: Send + Sync {
    /// Load a live item by id, `None` if it no longer exists
    fn read(&self, id: &str) -> Option<Arc<dyn ContentItem>>;

    /// Exact, non-fuzzy lookup of a reference string (an id, slug or locator)
    fn locate(&self, reference: &str) -> Vec<String>;
}

/// A component that contributes searchable text for items it knows about.
///
/// Contributors are registered explicitly on the
/// [`ContentAssembler`](crate::search::ContentAssembler) and queried in
/// registration order.
pub trait SearchContributor: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Text to append to the item's article, if any
    fn contribution(&self, item: &dyn ContentItem) -> Option<String>;
}
