//! End-to-end tests of the selection engine against an in-process source.
//!
//! Storage is a SQLite file in a temp directory, so "restart" means dropping
//! the session and opening a new one on the same file.

use std::sync::Arc;

use artifex_lib::api::MemorySource;
use artifex_lib::api::PageSource;
use artifex_lib::error::BulkSelectError;
use artifex_lib::model::Row;
use artifex_lib::store::SelectionStore;
use artifex_lib::store::SqliteStorage;
use artifex_lib::store::StorageBackend;
use artifex_lib::table::TableSession;

const KEY: &str = "artifex.selection";

async fn open(
    source: Arc<MemorySource>,
    storage: Arc<SqliteStorage>,
) -> TableSession {
    let store = SelectionStore::new(storage, KEY);
    TableSession::open(source, Some(store)).await
}

#[tokio::test]
async fn test_selection_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selection.db");
    let source = Arc::new(MemorySource::generated(40, 7));

    {
        let storage = Arc::new(SqliteStorage::open(&path).await.unwrap());
        let mut session = open(source.clone(), storage).await;
        session.toggle("3").await;
        session.go_to(4).await;
        session.toggle("23").await;
    }

    let storage = Arc::new(SqliteStorage::open(&path).await.unwrap());
    let mut session = open(source.clone(), storage).await;
    assert_eq!(session.selection().len(), 2);
    assert!(session.view().displayed_selection.contains("3"));

    session.go_to(4).await;
    assert!(session.view().displayed_selection.contains("23"));
}

#[tokio::test]
async fn test_malformed_store_starts_empty_and_recovers() {
    let storage = Arc::new(SqliteStorage::open_in_memory().await.unwrap());
    storage.set(KEY, "][".to_string()).await.unwrap();
    let source = Arc::new(MemorySource::generated(10, 7));

    let mut session = open(source, storage.clone()).await;
    assert!(session.selection().is_empty());

    session.toggle("1").await;
    let stored = storage.get(KEY).await.unwrap().unwrap();
    assert!(stored.contains("\"1\""));
}

#[tokio::test]
async fn test_bulk_select_boundaries() {
    let source = Arc::new(MemorySource::generated(10, 7));

    let mut session = TableSession::open(source.clone(), None).await;
    assert!(matches!(
        session.select_first(0).await,
        Err(BulkSelectError::InvalidInput(_))
    ));
    session.set_bulk_input("-1");
    assert!(session.submit_bulk_input().await.is_err());
    assert!(session.selection().is_empty());

    let exact = session.select_first(10).await.unwrap();
    let everything: Vec<String> = session.selection().ids().map(|id| id.to_string()).collect();
    session.clear().await;

    let over = session.select_first(25).await.unwrap();
    let again: Vec<String> = session.selection().ids().map(|id| id.to_string()).collect();

    assert_eq!(exact.selected, 10);
    assert_eq!(over.selected, 10);
    assert_eq!(everything, again);
}

#[tokio::test]
async fn test_bulk_select_from_later_page_spans_forward_only() {
    let source = Arc::new(MemorySource::generated(10, 7));
    let mut session = TableSession::open(source.clone(), None).await;

    session.go_to(2).await;
    let outcome = session.select_first(8).await.unwrap();

    assert_eq!(outcome.selected, 3);
    assert!(outcome.exhausted);
    assert!(!session.selection().is_selected("7"));
    assert!(session.selection().is_selected("10"));
}

#[tokio::test]
async fn test_failed_bulk_fetch_is_partial_and_retryable() {
    let source = Arc::new(MemorySource::generated(21, 7));
    let mut session = TableSession::open(source.clone(), None).await;
    source.fail_page(3);

    let err = session.select_first(21).await.unwrap_err();
    assert_eq!(err.partial_outcome().map(|o| o.selected), Some(14));
    assert_eq!(session.selection().len(), 14);
    assert!(!session.is_busy());

    source.heal_page(3);
    let outcome = session.select_first(21).await.unwrap();
    assert_eq!(outcome.selected, 21);
    assert_eq!(outcome.newly_selected, 7);
}

#[tokio::test]
async fn test_page_order_is_stable_around_bulk_select() {
    let source = Arc::new(MemorySource::generated(30, 7));
    let before = source.fetch_page(2).await.unwrap();

    let mut session = TableSession::open(source.clone(), None).await;
    session.select_first(12).await.unwrap();

    let after = source.fetch_page(2).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_displayed_selection_never_leaks_other_pages() {
    let source = Arc::new(MemorySource::generated(30, 7));
    let mut session = TableSession::open(source.clone(), None).await;
    session.select_first(30).await.unwrap();

    for page in 1..=5 {
        session.go_to(page).await;
        let view = session.view();
        let on_page: Vec<&Row> = view.rows.iter().collect();
        assert!(
            view.displayed_selection
                .ids()
                .all(|id| on_page.iter().any(|row| &row.id == id))
        );
        assert_eq!(view.displayed_selection.len(), view.rows.len());
    }
}
