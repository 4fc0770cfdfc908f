//! Error types for search operations
//!
//! Every failure the indexing core can observe is expressed here. Callers on the
//! batch and query paths degrade most of these to partial output; only
//! configuration and store-initialization errors are normally surfaced.

use tantivy::TantivyError;
use thiserror::Error;

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Error types for search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// The named index has not been created yet
    #[error("Search index '{0}' does not exist")]
    IndexNotFound(String),

    /// Index creation or opening failed
    #[error("Failed to initialize search index: {0}")]
    IndexInitialization(String),

    /// Transaction begin/commit failed or was used out of order
    #[error("Index transaction failed: {0}")]
    Transaction(String),

    /// Indexing operation failed
    #[error("Indexing failed for document {doc_id}: {message}")]
    IndexingFailed { doc_id: String, message: String },

    /// Search execution failed
    #[error("Search execution failed: {0}")]
    SearchExecution(String),

    /// Queue store failure or malformed queue row
    #[error("Indexing queue error: {0}")]
    Queue(String),

    /// Attached-file text extraction failed
    #[error("Text extraction failed for {file}: {message}")]
    Extraction { file: String, message: String },

    /// Lifecycle event name with no queue mapping
    #[error("Unknown content lifecycle event: {0}")]
    UnknownEvent(String),

    /// Invalid configuration value
    #[error("Invalid search configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tantivy error wrapper
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] TantivyError),

    /// SQLite error wrapper
    #[error("SQLite error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for SearchError {
    fn from(error: anyhow::Error) -> Self {
        SearchError::Other(error.to_string())
    }
}

impl SearchError {
    /// Check if the error only means the index has not been created yet
    #[must_use]
    pub fn is_missing_index(&self) -> bool {
        matches!(self, SearchError::IndexNotFound(_))
    }
}

/// Helper macro for logging search operations with performance metrics
#[macro_export]
macro_rules! log_search_operation {
    ($op:expr, $query:expr) => {{
        let start = std::time::Instant::now();
        let result = $op;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::debug!(
                    query = %$query,
                    duration_ms = duration.as_millis(),
                    "Search operation completed successfully"
                );
            }
            Err(e) => {
                tracing::warn!(
                    query = %$query,
                    duration_ms = duration.as_millis(),
                    error = %e,
                    "Search operation failed"
                );
            }
        }

        result
    }};
}
