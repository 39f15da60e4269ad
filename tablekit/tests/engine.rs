//! End-to-end scenarios for the table engine against scripted data sources.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use tablekit::TableEngine;
use tablekit::column::ColumnDescriptor;
use tablekit::column::ColumnSet;
use tablekit::column::FilterKind;
use tablekit::error::FetchError;
use tablekit::model::RowId;
use tablekit::model::Value;
use tablekit::query::QueryState;
use tablekit::session::SessionGuard;
use tablekit::source::DataSource;
use tablekit::source::QueryResult;
use tablekit::store::PreferenceStore;

#[derive(Debug, Clone, PartialEq)]
struct Product {
    id: String,
    name: String,
}

fn product(i: usize) -> Product {
    Product {
        id: format!("p{i}"),
        name: format!("Product {i}"),
    }
}

fn products(range: std::ops::Range<usize>) -> Vec<Product> {
    range.map(product).collect()
}

fn identity(p: &Product) -> RowId {
    RowId::new(&p.id)
}

fn columns() -> ColumnSet {
    ColumnSet::new(vec![
        ColumnDescriptor::new("select", "").sticky(),
        ColumnDescriptor::new("name", "Name")
            .sortable()
            .filterable(FilterKind::Text),
        ColumnDescriptor::new("kategoriId", "Category").filterable(FilterKind::Number),
        ColumnDescriptor::new("price", "Price"),
    ])
    .unwrap()
}

type FetchOutcome = Result<QueryResult<Product>, FetchError>;

/// Source whose fetches block until the test resolves them, in any order.
#[derive(Clone)]
struct GatedSource {
    gates: Arc<Mutex<VecDeque<oneshot::Receiver<FetchOutcome>>>>,
    seen: Arc<Mutex<Vec<QueryState>>>,
}

impl GatedSource {
    fn new(gate_count: usize) -> (Self, Vec<oneshot::Sender<FetchOutcome>>) {
        let mut senders = Vec::new();
        let mut gates = VecDeque::new();
        for _ in 0..gate_count {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            gates.push_back(rx);
        }
        (
            Self {
                gates: Arc::new(Mutex::new(gates)),
                seen: Arc::new(Mutex::new(Vec::new())),
            },
            senders,
        )
    }

    fn fetch_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl DataSource<Product> for GatedSource {
    async fn fetch(
        &self,
        _table_id: &str,
        query: &QueryState,
        _params: &HashMap<String, Value>,
    ) -> FetchOutcome {
        self.seen.lock().unwrap().push(query.clone());
        let gate = self
            .gates
            .lock()
            .unwrap()
            .pop_front()
            .expect("more fetches than gates");
        gate.await
            .unwrap_or_else(|_| Err(FetchError::network("gate dropped")))
    }
}

/// Source that resolves immediately from a scripted outcome queue.
///
/// Once the script runs out it keeps returning empty successes.
#[derive(Clone)]
struct ScriptSource {
    script: Arc<Mutex<VecDeque<FetchOutcome>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptSource {
    fn new(script: Vec<FetchOutcome>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn empty() -> Self {
        Self::new(Vec::new())
    }

    fn fetch_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource<Product> for ScriptSource {
    async fn fetch(
        &self,
        _table_id: &str,
        _query: &QueryState,
        _params: &HashMap<String, Value>,
    ) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(QueryResult::empty()))
    }
}

/// Source serving pages of a fixed dataset.
#[derive(Clone)]
struct PagedSource {
    items: Arc<Vec<Product>>,
}

impl PagedSource {
    fn new(items: Vec<Product>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }
}

#[async_trait]
impl DataSource<Product> for PagedSource {
    async fn fetch(
        &self,
        _table_id: &str,
        query: &QueryState,
        _params: &HashMap<String, Value>,
    ) -> FetchOutcome {
        let offset = query.pagination.offset();
        let end = (offset + query.pagination.page_size).min(self.items.len());
        let rows = self.items.get(offset..end).unwrap_or(&[]).to_vec();
        Ok(QueryResult::new(rows, self.items.len()))
    }
}

#[derive(Clone, Default)]
struct CountingGuard {
    notified: Arc<AtomicUsize>,
}

impl SessionGuard for CountingGuard {
    fn notify_unauthorized(&self) {
        self.notified.fetch_add(1, Ordering::SeqCst);
    }
}

fn engine_with(source: impl DataSource<Product> + 'static) -> TableEngine<Product> {
    TableEngine::builder("products", columns(), source, identity)
        .build()
        .unwrap()
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never reached");
}

#[tokio::test]
async fn test_initial_mount_then_empty_result() {
    let (source, mut gates) = GatedSource::new(1);
    let engine = TableEngine::builder("products", columns(), source.clone(), identity)
        .initial_query(QueryState::with_page_size(10))
        .build()
        .unwrap();

    let init = tokio::spawn({
        let engine = engine.clone();
        async move { engine.init().await }
    });
    wait_until(|| source.fetch_count() == 1).await;

    let view = engine.snapshot();
    assert!(view.is_initial_loading);
    assert!(view.is_loading);
    assert!(!view.is_empty);
    assert_eq!(view.query.pagination.page_size, 10);

    gates.remove(0).send(Ok(QueryResult::empty())).unwrap();
    init.await.unwrap();

    let view = engine.snapshot();
    assert!(!view.is_initial_loading);
    assert!(!view.is_loading);
    assert!(view.is_empty);
    assert_eq!(view.total, 0);
    assert!(view.error.is_none());
}

#[tokio::test]
async fn test_superseded_fetch_never_wins() {
    let (source, mut gates) = GatedSource::new(2);
    let engine = engine_with(source.clone());

    // Commit query A (page 0).
    let first = tokio::spawn({
        let engine = engine.clone();
        async move { engine.init().await }
    });
    wait_until(|| source.fetch_count() == 1).await;

    // Commit query B (page 1) before A settles.
    let second = tokio::spawn({
        let engine = engine.clone();
        async move { engine.set_page(1).await }
    });
    wait_until(|| source.fetch_count() == 2).await;

    // B settles first.
    gates
        .pop()
        .unwrap()
        .send(Ok(QueryResult::new(products(25..50), 100)))
        .unwrap();
    second.await.unwrap();

    // A settles late; its result must be discarded.
    let _ = gates
        .pop()
        .unwrap()
        .send(Ok(QueryResult::new(products(0..25), 100)));
    first.await.unwrap();

    let view = engine.snapshot();
    assert_eq!(*view.rows, products(25..50));
    assert_eq!(view.query.pagination.page_index, 1);
    assert!(!view.is_loading);
}

#[tokio::test]
async fn test_selection_survives_pagination() {
    let engine = engine_with(PagedSource::new(products(0..30)));
    engine.init().await;

    engine.toggle_row(RowId::new("p3"));
    assert!(engine.is_some_page_selected());

    engine.set_page(1).await;
    assert!(!engine.is_some_page_selected());

    engine.set_page(0).await;
    assert!(engine.is_row_selected(&RowId::new("p3")));
    assert!(engine.is_some_page_selected());
}

#[tokio::test]
async fn test_page_selection_and_all_known() {
    let engine = engine_with(PagedSource::new(products(0..30)));
    engine.init().await;

    engine.toggle_page_selection(true);
    assert!(engine.is_all_page_selected());
    assert_eq!(engine.selection_len(), 25);

    // Other pages are untouched by a page toggle.
    engine.set_page(1).await;
    assert!(!engine.is_all_page_selected());
    engine.toggle_page_selection(true);
    assert_eq!(engine.selection_len(), 30);

    // All-known spans every visited page.
    engine.toggle_all_known(false);
    assert_eq!(engine.selection_len(), 0);
    engine.toggle_all_known(true);
    assert_eq!(engine.selection_len(), 30);

    engine.clear_selection();
    assert_eq!(engine.selection_len(), 0);
}

#[tokio::test]
async fn test_filter_then_page_then_clear_all() {
    let engine = engine_with(PagedSource::new(products(0..200)));
    engine.init().await;

    engine.set_filter("kategoriId", 5).await;
    engine.set_page(3).await;
    engine.clear_all_filters().await;

    let query = engine.query_state();
    assert!(query.filters.is_empty());
    assert_eq!(query.pagination.page_index, 0);
}

#[tokio::test]
async fn test_unauthorized_escalates_once_per_episode() {
    let guard = CountingGuard::default();
    let source = ScriptSource::new(vec![
        Err(FetchError::unauthorized("session expired")),
        Err(FetchError::unauthorized("session expired")),
        Ok(QueryResult::new(products(0..5), 5)),
        Err(FetchError::unauthorized("session expired")),
    ]);
    let engine = TableEngine::builder("products", columns(), source, identity)
        .session_guard(guard.clone())
        .build()
        .unwrap();

    engine.init().await;
    engine.refetch().await;
    assert_eq!(guard.notified.load(Ordering::SeqCst), 1);

    // Unauthorized is never rendered as a table error.
    assert!(engine.snapshot().error.is_none());

    // A successful fetch closes the episode; the next failure escalates
    // again.
    engine.refetch().await;
    engine.refetch().await;
    assert_eq!(guard.notified.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_error_retains_rows_and_refetch_recovers() {
    let source = ScriptSource::new(vec![
        Ok(QueryResult::new(products(0..25), 30)),
        Err(FetchError::server("boom")),
        Ok(QueryResult::new(products(25..30), 30)),
    ]);
    let engine = engine_with(source);
    engine.init().await;
    assert_eq!(engine.snapshot().rows.len(), 25);

    engine.set_page(1).await;
    let view = engine.snapshot();
    assert!(view.is_error());
    assert!(view.error.as_ref().unwrap().is_retryable());
    // The previously rendered rows are retained behind the error.
    assert_eq!(*view.rows, products(0..25));
    assert!(!view.is_empty);

    engine.refetch().await;
    let view = engine.snapshot();
    assert!(!view.is_error());
    assert_eq!(*view.rows, products(25..30));
}

#[tokio::test(start_paused = true)]
async fn test_search_is_debounced() {
    let source = ScriptSource::empty();
    let engine = TableEngine::builder("products", columns(), source.clone(), identity)
        .search_debounce(Duration::from_millis(300))
        .build()
        .unwrap();
    engine.init().await;
    assert_eq!(source.fetch_count(), 1);

    // Two keystrokes inside the debounce window commit once.
    let first = tokio::spawn({
        let engine = engine.clone();
        async move { engine.set_search("wid").await }
    });
    tokio::task::yield_now().await;
    let second = tokio::spawn({
        let engine = engine.clone();
        async move { engine.set_search("widget").await }
    });
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_millis(301)).await;
    first.await.unwrap();
    second.await.unwrap();

    assert_eq!(source.fetch_count(), 2);
    assert_eq!(engine.query_state().search.as_deref(), Some("widget"));
    assert_eq!(engine.query_state().pagination.page_index, 0);
}

#[tokio::test]
async fn test_redundant_intents_fetch_once() {
    let source = ScriptSource::empty();
    let engine = engine_with(source.clone());
    engine.init().await;
    assert_eq!(source.fetch_count(), 1);

    engine.set_filter("kategoriId", 5).await;
    assert_eq!(source.fetch_count(), 2);

    // Same filter value, same page: nothing new to fetch.
    engine.set_filter("kategoriId", 5).await;
    engine.set_page(0).await;
    assert_eq!(source.fetch_count(), 2);

    // refetch bypasses the dedup.
    engine.refetch().await;
    assert_eq!(source.fetch_count(), 3);
}

#[tokio::test]
async fn test_sort_and_filter_respect_column_capabilities() {
    let source = ScriptSource::empty();
    let engine = engine_with(source.clone());
    engine.init().await;

    // "price" is neither sortable nor filterable; "missing" doesn't exist.
    engine.toggle_sort("price").await;
    engine.toggle_sort("missing").await;
    engine.set_filter("price", 10).await;
    assert_eq!(source.fetch_count(), 1);
    assert!(engine.query_state().sort.is_none());

    engine.toggle_sort("name").await;
    assert_eq!(source.fetch_count(), 2);
}

#[tokio::test]
async fn test_column_configuration_persists_across_instances() {
    let store = PreferenceStore::in_memory();

    let first = TableEngine::builder("products", columns(), ScriptSource::empty(), identity)
        .store(store.clone())
        .build()
        .unwrap();
    first.init().await;
    first.set_column_visibility("price", false).await;
    first
        .pin_column("name", Some(tablekit::column::PinSide::Left))
        .await;

    let second = TableEngine::builder("products", columns(), ScriptSource::empty(), identity)
        .store(store)
        .build()
        .unwrap();
    second.init().await;

    let config = second.column_config();
    assert!(!config.is_visible("price"));
    assert!(config.pinning.left.iter().any(|c| c == "name"));

    let partitioned = second.visible_columns();
    assert_eq!(partitioned.left.len(), 1);
    assert!(!partitioned.iter().any(|c| c.id == "price"));
}

#[tokio::test]
async fn test_shutdown_discards_in_flight_fetch() {
    let (source, mut gates) = GatedSource::new(1);
    let engine = engine_with(source.clone());

    let init = tokio::spawn({
        let engine = engine.clone();
        async move { engine.init().await }
    });
    wait_until(|| source.fetch_count() == 1).await;

    engine.shutdown();
    let _ = gates
        .remove(0)
        .send(Ok(QueryResult::new(products(0..25), 25)));
    init.await.unwrap();

    // The stale result never wrote into the instance.
    let view = engine.snapshot();
    assert!(view.rows.is_empty());
    assert_eq!(view.total, 0);
    assert!(view.error.is_none());
}
