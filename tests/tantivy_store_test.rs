mod common;

use content_search::search::store::{IndexStore, SearchOptions, TantivyIndexStore};
use content_search::search::{IndexRecord, SearchError, initialize_search};
use content_search::SearchConfig;
use tempfile::TempDir;

use common::{FakeItem, StaticResolver};

const WRITER_MEMORY: usize = 15_000_000;

fn record(id: &str, title: &str, article: &str) -> IndexRecord {
    IndexRecord {
        id: id.to_string(),
        title: title.to_string(),
        article: article.to_string(),
    }
}

fn exact() -> SearchOptions {
    SearchOptions {
        fuzzy_distance: 0,
        limit: 100,
    }
}

#[test]
fn test_select_missing_index_fails() {
    let store = TantivyIndexStore::in_memory(WRITER_MEMORY);
    let result = store.select_index("content.index");
    assert!(matches!(result, Err(SearchError::IndexNotFound(_))));
}

#[test]
fn test_transaction_writes_visible_after_commit() {
    let store = TantivyIndexStore::in_memory(WRITER_MEMORY);
    store.create_index("content.index").unwrap();
    store.select_index("content.index").unwrap();

    store.begin_transaction().unwrap();
    store
        .update(&record("doc1", "Gardening", "tomatoes need full sun"))
        .unwrap();
    assert!(store.search("tomatoes", &exact()).unwrap().is_empty());

    store.commit().unwrap();
    assert_eq!(store.search("tomatoes", &exact()).unwrap(), vec!["doc1"]);
    assert_eq!(store.num_docs().unwrap(), 1);
}

#[test]
fn test_update_replaces_and_delete_removes() {
    let store = TantivyIndexStore::in_memory(WRITER_MEMORY);
    store.create_index("content.index").unwrap();
    store.select_index("content.index").unwrap();

    store.update(&record("doc1", "Old", "apples")).unwrap();
    store.update(&record("doc1", "New", "oranges")).unwrap();
    assert!(store.search("apples", &exact()).unwrap().is_empty());
    assert_eq!(store.search("oranges", &exact()).unwrap(), vec!["doc1"]);
    assert_eq!(store.num_docs().unwrap(), 1);

    store.delete("doc1").unwrap();
    store.delete("never-existed").unwrap();
    assert!(store.search("oranges", &exact()).unwrap().is_empty());
}

#[test]
fn test_fuzzy_search_tolerates_typos() {
    let store = TantivyIndexStore::in_memory(WRITER_MEMORY);
    store.create_index("content.index").unwrap();
    store.select_index("content.index").unwrap();
    store
        .update(&record("doc1", "Astronomy", "observing distant galaxies"))
        .unwrap();
    store.update(&record("doc2", "Cooking", "bread recipes")).unwrap();

    let fuzzy = SearchOptions::default();
    assert_eq!(store.search("galaxeis", &fuzzy).unwrap(), vec!["doc1"]);
    assert_eq!(store.search("Astronmy", &fuzzy).unwrap(), vec!["doc1"]);
    assert!(store.search("galaxeis", &exact()).unwrap().is_empty());
}

#[test]
fn test_on_disk_index_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = TantivyIndexStore::in_dir(temp_dir.path(), WRITER_MEMORY);
        store.create_index("content.index").unwrap();
        store.select_index("content.index").unwrap();
        store
            .update(&record("persist", "Durable", "written to disk"))
            .unwrap();
    }

    let store = TantivyIndexStore::in_dir(temp_dir.path(), WRITER_MEMORY);
    store.select_index("content.index").unwrap();
    assert_eq!(store.search("disk", &exact()).unwrap(), vec!["persist"]);
}

#[tokio::test]
async fn test_end_to_end_queue_drain_and_query() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = StaticResolver::new();
    resolver.insert(FakeItem::new("p1", "Volcanoes", "<p>Lava flows from <b>volcanoes</b>.</p>"));
    resolver.insert(FakeItem::new("p2", "Glaciers", "Ice sheets move slowly."));

    let config = SearchConfig::default()
        .with_index_dir(temp_dir.path())
        .with_writer_memory_bytes(WRITER_MEMORY);
    let service = initialize_search(config, resolver).await.unwrap();

    service.hooks().dispatch_named("insert", "p1").await.unwrap();
    service.hooks().dispatch_named("update", "p2").await.unwrap();
    service.hooks().dispatch_named("child:delete", "p2").await.unwrap();
    assert_eq!(service.queue().len().await.unwrap(), 2);

    let report = service.drainer().drain_default().await;
    assert_eq!(report.processed, 2);
    assert!(report.errors.is_empty(), "{:?}", report.errors);

    let ids = service.query().search("lava");
    assert!(ids.contains("p1"));
    assert!(!ids.contains("p2"));

    let item = FakeItem::new("p1", "Volcanoes", "<p>Lava flows from <b>volcanoes</b>.</p>");
    let highlights = service.query().highlighter().highlights("lava", &item);
    assert_eq!(highlights.len(), 1);
    assert!(highlights[0].contains("<em>Lava</em>"));

    service.hooks().dispatch_named("delete", "p1").await.unwrap();
    service.drainer().drain_default().await;
    assert!(!service.query().search("lava").contains("p1"));
}
