//! Tantivy-backed index store
//!
//! Manages one selected index at a time. A transaction is the lifetime of a
//! held `IndexWriter`: `begin_transaction` acquires it, writes buffer into it,
//! and `commit` commits, reloads the reader and releases the writer lock.
//! Writes issued outside a transaction are committed immediately.

use ahash::AHashMap;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::time::Instant;
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::{BooleanQuery, FuzzyTermQuery, Occur, Query, QueryParser};
use tantivy::schema::Value;
use tantivy::tokenizer::TokenStream;
use tantivy::{Index, IndexReader, IndexSettings, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use super::schema::IndexSchema;
use super::{IndexStore, SearchOptions};
use crate::search::errors::{SearchError, SearchResult};
use crate::search::types::IndexRecord;

/// Where indexes live
#[derive(Debug, Clone)]
enum IndexLocation {
    Directory(PathBuf),
    Memory,
}

/// The currently selected index with its reader and optional open writer
struct OpenIndex {
    name: String,
    index: Index,
    schema: IndexSchema,
    reader: IndexReader,
    writer: Option<IndexWriter>,
}

#[derive(Default)]
struct StoreState {
    ram_indexes: AHashMap<String, Index>,
    open: Option<OpenIndex>,
}

/// Index store managing Tantivy indexes on disk or in RAM
pub struct TantivyIndexStore {
    location: IndexLocation,
    writer_memory: usize,
    state: Mutex<StoreState>,
}

impl TantivyIndexStore {
    /// Store whose indexes are directories under `root`
    #[must_use]
    pub fn in_dir(root: impl Into<PathBuf>, writer_memory: usize) -> Self {
        Self {
            location: IndexLocation::Directory(root.into()),
            writer_memory,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Store whose indexes live in RAM for the lifetime of the store
    #[must_use]
    pub fn in_memory(writer_memory: usize) -> Self {
        Self {
            location: IndexLocation::Memory,
            writer_memory,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Name of the selected index, if any
    #[must_use]
    pub fn selected(&self) -> Option<String> {
        self.state.lock().open.as_ref().map(|open| open.name.clone())
    }

    /// Number of committed documents in the selected index
    pub fn num_docs(&self) -> SearchResult<u64> {
        let state = self.state.lock();
        let open = Self::require_open(&state)?;
        Ok(open.reader.searcher().num_docs())
    }

    fn require_open(state: &StoreState) -> SearchResult<&OpenIndex> {
        state
            .open
            .as_ref()
            .ok_or_else(|| SearchError::Transaction("no index selected".to_string()))
    }

    fn open_index(&self, name: &str, index: Index) -> SearchResult<OpenIndex> {
        let schema = IndexSchema::from_existing(&index.schema()).map_err(|e| {
            SearchError::IndexInitialization(format!("index '{name}' has an incompatible schema: {e}"))
        })?;

        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(OpenIndex {
            name: name.to_string(),
            index,
            schema,
            reader,
            writer: None,
        })
    }

    /// Apply one write, inside the open transaction if there is one
    fn write_with<F>(&self, op: F) -> SearchResult<()>
    where
        F: FnOnce(&IndexSchema, &mut IndexWriter) -> SearchResult<()>,
    {
        let mut state = self.state.lock();
        let open = state
            .open
            .as_mut()
            .ok_or_else(|| SearchError::Transaction("no index selected".to_string()))?;

        if let Some(writer) = open.writer.as_mut() {
            return op(&open.schema, writer);
        }

        // Autocommit: the writer lock is held only for this write
        let mut writer: IndexWriter = open.index.writer(self.writer_memory)?;
        op(&open.schema, &mut writer)?;
        writer
            .commit()
            .map_err(|e| SearchError::Transaction(format!("Index commit failed: {e}")))?;
        open.reader.reload()?;
        Ok(())
    }

    fn build_query(open: &OpenIndex, query: &str, options: &SearchOptions) -> SearchResult<Box<dyn Query>> {
        let fields = open.schema.searchable_fields();

        if options.fuzzy_distance == 0 {
            let parser = QueryParser::for_index(&open.index, fields.to_vec());
            let (parsed, errors) = parser.parse_query_lenient(query);
            if !errors.is_empty() {
                tracing::debug!(
                    query = %query,
                    errors = errors.len(),
                    "Query parsed leniently"
                );
            }
            return Ok(parsed);
        }

        // FuzzyTermQuery bypasses the QueryParser, so terms are run through each
        // field's analyzer by hand to match what was indexed
        let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for field in fields {
            let mut analyzer = open.index.tokenizer_for_field(field)?;
            let mut token_stream = analyzer.token_stream(query);
            token_stream.process(&mut |token| {
                let term = Term::from_field_text(field, &token.text);
                let fuzzy = FuzzyTermQuery::new(term, options.fuzzy_distance, true);
                subqueries.push((Occur::Should, Box::new(fuzzy) as Box<dyn Query>));
            });
        }

        Ok(Box::new(BooleanQuery::new(subqueries)))
    }
}

impl IndexStore for TantivyIndexStore {
    fn select_index(&self, name: &str) -> SearchResult<()> {
        let index = match &self.location {
            IndexLocation::Directory(root) => {
                let path = root.join(name);
                if !path.join("meta.json").exists() {
                    return Err(SearchError::IndexNotFound(name.to_string()));
                }
                Index::open_in_dir(&path).map_err(|e| {
                    SearchError::IndexInitialization(format!(
                        "Failed to open existing index at {path:?}: {e}"
                    ))
                })?
            }
            IndexLocation::Memory => self
                .state
                .lock()
                .ram_indexes
                .get(name)
                .cloned()
                .ok_or_else(|| SearchError::IndexNotFound(name.to_string()))?,
        };

        let open = self.open_index(name, index)?;
        self.state.lock().open = Some(open);
        tracing::debug!(index = %name, "Search index selected");
        Ok(())
    }

    fn create_index(&self, name: &str) -> SearchResult<()> {
        let schema = IndexSchema::build();
        match &self.location {
            IndexLocation::Directory(root) => {
                let path = root.join(name);
                std::fs::create_dir_all(&path)?;
                let mmap_directory = MmapDirectory::open(&path).map_err(|e| {
                    SearchError::IndexInitialization(format!(
                        "Failed to open index directory {path:?}: {e}"
                    ))
                })?;
                Index::create(mmap_directory, schema.schema, IndexSettings::default())?;
            }
            IndexLocation::Memory => {
                let index = Index::create_in_ram(schema.schema);
                self.state.lock().ram_indexes.insert(name.to_string(), index);
            }
        }
        tracing::info!(index = %name, "Search index created");
        Ok(())
    }

    fn begin_transaction(&self) -> SearchResult<()> {
        let mut state = self.state.lock();
        let open = state
            .open
            .as_mut()
            .ok_or_else(|| SearchError::Transaction("no index selected".to_string()))?;
        if open.writer.is_none() {
            let writer: IndexWriter = open.index.writer(self.writer_memory).map_err(|e| {
                SearchError::Transaction(format!(
                    "Failed to acquire index writer with {}MB limit: {e}",
                    self.writer_memory / 1_000_000
                ))
            })?;
            open.writer = Some(writer);
        }
        Ok(())
    }

    fn commit(&self) -> SearchResult<()> {
        let start = Instant::now();
        let mut state = self.state.lock();
        let open = state
            .open
            .as_mut()
            .ok_or_else(|| SearchError::Transaction("no index selected".to_string()))?;

        // Taking the writer out releases its lock even if the commit fails
        let Some(mut writer) = open.writer.take() else {
            return Ok(());
        };
        writer
            .commit()
            .map_err(|e| SearchError::Transaction(format!("Index commit failed: {e}")))?;
        open.reader.reload()?;

        tracing::debug!(
            index = %open.name,
            duration_ms = start.elapsed().as_millis(),
            "Index commit and reload completed"
        );
        Ok(())
    }

    fn update(&self, record: &IndexRecord) -> SearchResult<()> {
        self.write_with(|schema, writer| {
            writer.delete_term(Term::from_field_text(schema.id, &record.id));

            let mut doc = TantivyDocument::default();
            doc.add_text(schema.id, &record.id);
            doc.add_text(schema.title, &record.title);
            doc.add_text(schema.article, &record.article);
            writer
                .add_document(doc)
                .map_err(|e| SearchError::IndexingFailed {
                    doc_id: record.id.clone(),
                    message: e.to_string(),
                })?;
            Ok(())
        })
    }

    fn delete(&self, id: &str) -> SearchResult<()> {
        self.write_with(|schema, writer| {
            writer.delete_term(Term::from_field_text(schema.id, id));
            Ok(())
        })
    }

    fn search(&self, query: &str, options: &SearchOptions) -> SearchResult<Vec<String>> {
        let state = self.state.lock();
        let open = Self::require_open(&state)?;
        let searcher = open.reader.searcher();

        let parsed = Self::build_query(open, query, options)?;
        let top_docs = searcher
            .search(&*parsed, &TopDocs::with_limit(options.limit.max(1)))
            .map_err(|e| SearchError::SearchExecution(format!("Failed to execute search query: {e}")))?;

        let mut ids = Vec::with_capacity(top_docs.len());
        for (_score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| {
                SearchError::SearchExecution(format!("Failed to retrieve document: {e}"))
            })?;
            if let Some(id) = doc.get_first(open.schema.id).and_then(|v| v.as_str()) {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }
}
