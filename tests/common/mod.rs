//! Fakes shared by the search integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content_search::search::store::{IndexStore, SearchOptions};
use content_search::search::{IndexRecord, SearchError, SearchResult};
use content_search::{
    AttachedFile, ContentItem, ContentResolver, FileStore, ItemUrl, PdfTextExtractor,
    SearchContributor,
};

/// Route `tracing` output to the test harness; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Content item with every field settable
#[derive(Debug, Clone, Default)]
pub struct FakeItem {
    pub id: String,
    pub title: String,
    pub body: String,
    pub name: String,
    pub noun: String,
    pub canonical_noun: String,
    pub deleted: bool,
    pub opted_out: bool,
    pub result_title: Option<String>,
    pub extra: Option<String>,
}

impl FakeItem {
    pub fn new(id: &str, title: &str, body: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            ..Self::default()
        }
    }

    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    pub fn opted_out(mut self) -> Self {
        self.opted_out = true;
        self
    }

    pub fn with_result_title(mut self, title: &str) -> Self {
        self.result_title = Some(title.to_string());
        self
    }

    pub fn with_extra(mut self, extra: &str) -> Self {
        self.extra = Some(extra.to_string());
        self
    }

    pub fn with_url(mut self, noun: &str, canonical_noun: &str) -> Self {
        self.noun = noun.to_string();
        self.canonical_noun = canonical_noun.to_string();
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl ContentItem for FakeItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn body(&self) -> String {
        self.body.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn url(&self) -> ItemUrl {
        ItemUrl {
            noun: self.noun.clone(),
            canonical_noun: self.canonical_noun.clone(),
        }
    }

    fn search_indexed(&self) -> bool {
        !self.opted_out
    }

    fn search_result_title(&self) -> Option<String> {
        self.result_title.clone()
    }

    fn additional_search_text(&self) -> Option<String> {
        self.extra.clone()
    }
}

/// Resolver over an in-memory item map
#[derive(Default)]
pub struct StaticResolver {
    items: Mutex<HashMap<String, Arc<dyn ContentItem>>>,
    references: Mutex<HashMap<String, Vec<String>>>,
}

impl StaticResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, item: FakeItem) {
        self.items.lock().insert(item.id.clone(), Arc::new(item));
    }

    pub fn remove(&self, id: &str) {
        self.items.lock().remove(id);
    }

    pub fn add_reference(&self, reference: &str, ids: &[&str]) {
        self.references.lock().insert(
            reference.to_string(),
            ids.iter().map(|id| id.to_string()).collect(),
        );
    }
}

impl ContentResolver for StaticResolver {
    fn read(&self, id: &str) -> Option<Arc<dyn ContentItem>> {
        self.items.lock().get(id).cloned()
    }

    fn locate(&self, reference: &str) -> Vec<String> {
        self.references
            .lock()
            .get(reference)
            .cloned()
            .unwrap_or_default()
    }
}

/// One call observed by the recording store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Select,
    Create,
    Begin,
    Commit,
    Update(String),
    Delete(String),
    Search(String),
}

/// Index store that records every call and keeps documents in a map
#[derive(Default)]
pub struct RecordingStore {
    pub calls: Mutex<Vec<StoreCall>>,
    pub docs: Mutex<HashMap<String, IndexRecord>>,
    pub exists: Mutex<bool>,
    pub search_hits: Mutex<Vec<String>>,
    pub fail_search: Mutex<bool>,
    pub fail_update_for: Mutex<Option<String>>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: &StoreCall) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    pub fn doc(&self, id: &str) -> Option<IndexRecord> {
        self.docs.lock().get(id).cloned()
    }

    pub fn set_search_hits(&self, hits: &[&str]) {
        *self.search_hits.lock() = hits.iter().map(|h| h.to_string()).collect();
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().push(call);
    }
}

impl IndexStore for RecordingStore {
    fn select_index(&self, name: &str) -> SearchResult<()> {
        self.record(StoreCall::Select);
        if *self.exists.lock() {
            Ok(())
        } else {
            Err(SearchError::IndexNotFound(name.to_string()))
        }
    }

    fn create_index(&self, _name: &str) -> SearchResult<()> {
        self.record(StoreCall::Create);
        *self.exists.lock() = true;
        Ok(())
    }

    fn begin_transaction(&self) -> SearchResult<()> {
        self.record(StoreCall::Begin);
        Ok(())
    }

    fn commit(&self) -> SearchResult<()> {
        self.record(StoreCall::Commit);
        Ok(())
    }

    fn update(&self, record: &IndexRecord) -> SearchResult<()> {
        self.record(StoreCall::Update(record.id.clone()));
        if self.fail_update_for.lock().as_deref() == Some(record.id.as_str()) {
            return Err(SearchError::IndexingFailed {
                doc_id: record.id.clone(),
                message: "disk full".to_string(),
            });
        }
        self.docs.lock().insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> SearchResult<()> {
        self.record(StoreCall::Delete(id.to_string()));
        self.docs.lock().remove(id);
        Ok(())
    }

    fn search(&self, query: &str, _options: &SearchOptions) -> SearchResult<Vec<String>> {
        self.record(StoreCall::Search(query.to_string()));
        if *self.fail_search.lock() {
            return Err(SearchError::SearchExecution("index unavailable".to_string()));
        }
        Ok(self.search_hits.lock().clone())
    }
}

/// File store returning a fixed file list per item id
#[derive(Default)]
pub struct FakeFileStore {
    files: Mutex<HashMap<String, Vec<AttachedFile>>>,
}

impl FakeFileStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attach(&self, item_id: &str, file: AttachedFile) {
        self.files
            .lock()
            .entry(item_id.to_string())
            .or_default()
            .push(file);
    }
}

impl FileStore for FakeFileStore {
    fn files(&self, item: &dyn ContentItem) -> Vec<AttachedFile> {
        self.files.lock().get(item.id()).cloned().unwrap_or_default()
    }
}

pub fn pdf(name: &str, size: u64) -> AttachedFile {
    AttachedFile {
        name: name.to_string(),
        mime_type: "application/pdf".to_string(),
        size,
        path: PathBuf::from(format!("/files/{name}")),
        meta_card: format!("{name} PDF document"),
    }
}

pub fn image(name: &str) -> AttachedFile {
    AttachedFile {
        name: name.to_string(),
        mime_type: "image/png".to_string(),
        size: 1024,
        path: PathBuf::from(format!("/files/{name}")),
        meta_card: format!("{name} image"),
    }
}

/// How the fake extractor responds for one file
#[derive(Debug, Clone)]
pub enum PdfBehavior {
    Text(String),
    Fail,
    Panic,
}

/// PDF extractor keyed by file path; records every path it is asked about
#[derive(Default)]
pub struct FakePdfExtractor {
    behaviors: Mutex<HashMap<PathBuf, PdfBehavior>>,
    pub requested: Mutex<Vec<PathBuf>>,
}

impl FakePdfExtractor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, file: &AttachedFile, behavior: PdfBehavior) {
        self.behaviors.lock().insert(file.path.clone(), behavior);
    }

    pub fn was_asked(&self, file: &AttachedFile) -> bool {
        self.requested.lock().contains(&file.path)
    }
}

impl PdfTextExtractor for FakePdfExtractor {
    fn extract_text(&self, path: &Path) -> anyhow::Result<String> {
        self.requested.lock().push(path.to_path_buf());
        let behavior = self.behaviors.lock().get(path).cloned();
        match behavior {
            Some(PdfBehavior::Text(text)) => Ok(text),
            Some(PdfBehavior::Fail) => anyhow::bail!("corrupt xref table"),
            Some(PdfBehavior::Panic) => panic!("parser blew up"),
            None => Ok(String::new()),
        }
    }
}

/// Contributor appending a fixed string for every item
pub struct FixedContributor {
    pub name: String,
    pub text: String,
}

impl FixedContributor {
    pub fn new(name: &str, text: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            text: text.to_string(),
        })
    }
}

impl SearchContributor for FixedContributor {
    fn name(&self) -> &str {
        &self.name
    }

    fn contribution(&self, _item: &dyn ContentItem) -> Option<String> {
        Some(self.text.clone())
    }
}
