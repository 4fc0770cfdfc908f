pub mod config;
pub mod content;
pub mod search;

pub use config::SearchConfig;
pub use content::{
    AttachedFile, ContentItem, ContentResolver, FileStore, ItemUrl, MemoryCeiling,
    PdfTextExtractor, SearchContributor,
};
pub use search::{
    BatchDrainer, ContentAssembler, DrainReport, IndexManager, IndexingQueue, LifecycleHooks,
    QueryEngine, SearchError, SearchResult, SearchService, initialize_search,
};
