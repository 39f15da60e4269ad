//! Table engine facade.
//!
//! [`TableEngine`] composes the column layout, query controller, selection
//! model, remote source, and preference store into one handle. All
//! mutations are synchronous state transitions; remote fetches are driven
//! asynchronously and applied in commit order of their query state, never
//! in completion order, so a fetch that has been superseded can never
//! overwrite newer state.

mod view;

pub use view::TableView;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::column::ColumnConfiguration;
use crate::column::ColumnLayout;
use crate::column::ColumnSet;
use crate::column::PartitionedColumns;
use crate::column::PinSide;
use crate::column::SizeBounds;
use crate::error::FetchError;
use crate::error::ValidationError;
use crate::model::RowId;
use crate::model::RowIdentity;
use crate::model::Value;
use crate::query::QueryController;
use crate::query::QueryState;
use crate::selection::SelectionModel;
use crate::session::NullGuard;
use crate::session::SessionGuard;
use crate::source::DataSource;
use crate::source::QueryResult;
use crate::store::PreferenceStore;

/// Default debounce window for search-term changes.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Drives one server-backed table instance.
///
/// Cheap to clone (uses `Arc` internally); clones share the same state and
/// can be handed to event handlers freely.
///
/// # Example
///
/// ```ignore
/// let engine = TableEngine::builder("products", columns, source, |p: &Product| {
///     RowId::new(&p.sku)
/// })
/// .store(PreferenceStore::new(SqliteBackend::new(path).await?))
/// .build()?;
///
/// engine.init().await;
/// let view = engine.snapshot();
/// ```
pub struct TableEngine<R> {
    inner: Arc<EngineInner<R>>,
}

impl<R> Clone for TableEngine<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct EngineInner<R> {
    table_id: String,
    columns: Arc<ColumnSet>,
    source: Arc<dyn DataSource<R>>,
    identity: Arc<dyn RowIdentity<R>>,
    store: PreferenceStore,
    guard: Arc<dyn SessionGuard>,
    params: HashMap<String, Value>,
    debounce: Duration,
    state: Mutex<EngineState<R>>,
    /// Monotonic fetch generation; a result is applied only while its
    /// generation is still the latest.
    generation: AtomicU64,
    /// Coalesces rapid search-term changes.
    search_epoch: AtomicU64,
    /// Latched after an unauthorized escalation; re-armed by the next
    /// successful fetch.
    unauthorized: AtomicBool,
    /// Token of the fetch currently in flight; cancelled when superseded.
    fetch_token: Mutex<CancellationToken>,
    /// Root token for this table instance; cancelled on shutdown so a
    /// stale fetch can never write into another instance's state.
    shutdown: CancellationToken,
}

struct EngineState<R> {
    query: QueryController,
    layout: ColumnLayout,
    selection: SelectionModel,
    rows: Arc<Vec<R>>,
    total: usize,
    loading: bool,
    settled: bool,
    error: Option<FetchError>,
    last_key: Option<String>,
}

impl<R> TableEngine<R>
where
    R: Send + Sync + 'static,
{
    /// Creates a builder. `table_id` keys the persisted configuration;
    /// `identity` derives the stable [`RowId`] selection is keyed by.
    pub fn builder(
        table_id: impl Into<String>,
        columns: ColumnSet,
        source: impl DataSource<R> + 'static,
        identity: impl RowIdentity<R> + 'static,
    ) -> TableEngineBuilder<R> {
        TableEngineBuilder {
            table_id: table_id.into(),
            columns,
            source: Arc::new(source),
            identity: Arc::new(identity),
            store: None,
            guard: None,
            params: HashMap::new(),
            initial_query: None,
            bounds: SizeBounds::default(),
            debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }

    /// Loads the persisted column configuration and issues the first fetch.
    pub async fn init(&self) {
        match self.inner.store.load(&self.inner.table_id).await {
            Ok(Some(config)) => {
                let mut state = self.lock();
                state.layout.replace_config(config);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!(
                    "failed to load configuration for '{}': {e}",
                    self.inner.table_id
                );
            }
        }
        self.commit(true).await;
    }

    /// Cancels any in-flight fetch and detaches this instance.
    ///
    /// After shutdown no fetch result, current or stale, can write into
    /// this instance's state.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.inner.fetch_token.lock().unwrap().cancel();
    }

    // ------------------------------------------------------------------
    // Derived view
    // ------------------------------------------------------------------

    /// Takes a snapshot of the current view state.
    pub fn snapshot(&self) -> TableView<R> {
        let state = self.lock();
        TableView {
            rows: Arc::clone(&state.rows),
            total: state.total,
            query: state.query.state().clone(),
            is_loading: state.loading,
            is_initial_loading: state.loading && !state.settled,
            is_empty: state.settled && state.error.is_none() && state.total == 0,
            error: state.error.clone(),
        }
    }

    /// Returns the visible columns split into pin buckets.
    pub fn visible_columns(&self) -> PartitionedColumns {
        self.lock().layout.partition()
    }

    /// Returns the current column configuration.
    pub fn column_config(&self) -> ColumnConfiguration {
        self.lock().layout.config().clone()
    }

    /// Returns the current query state.
    pub fn query_state(&self) -> QueryState {
        self.lock().query.state().clone()
    }

    // ------------------------------------------------------------------
    // Query actions
    // ------------------------------------------------------------------

    /// Moves to a page. Leaves sort, filters, and search untouched.
    pub async fn set_page(&self, page_index: usize) {
        let changed = self.lock().query.set_page(page_index);
        if changed {
            self.commit(false).await;
        }
    }

    /// Changes the page size and resets to the first page.
    pub async fn set_page_size(&self, page_size: usize) -> Result<(), ValidationError> {
        let changed = self.lock().query.set_page_size(page_size)?;
        if changed {
            self.commit(false).await;
        }
        Ok(())
    }

    /// Advances the sort cycle for a column (none → asc → desc → none).
    ///
    /// No-op for unknown or non-sortable columns.
    pub async fn toggle_sort(&self, column_id: &str) {
        if !self
            .inner
            .columns
            .get(column_id)
            .is_some_and(|c| c.sortable)
        {
            return;
        }
        let changed = self.lock().query.toggle_sort(column_id);
        if changed {
            self.commit(false).await;
        }
    }

    /// Sets the filter for a column; a null value removes it.
    ///
    /// No-op for unknown or non-filterable columns.
    pub async fn set_filter(&self, column_id: &str, value: impl Into<Value>) {
        if !self
            .inner
            .columns
            .get(column_id)
            .is_some_and(|c| c.filterable)
        {
            return;
        }
        let changed = self.lock().query.set_filter(column_id, value);
        if changed {
            self.commit(false).await;
        }
    }

    /// Removes the filter for a column.
    pub async fn clear_filter(&self, column_id: &str) {
        let changed = self.lock().query.clear_filter(column_id);
        if changed {
            self.commit(false).await;
        }
    }

    /// Removes all filters.
    pub async fn clear_all_filters(&self) {
        let changed = self.lock().query.clear_all_filters();
        if changed {
            self.commit(false).await;
        }
    }

    /// Commits a search term after the debounce window.
    ///
    /// Rapid successive calls coalesce: only the newest term is committed,
    /// so one fetch is issued per settled term rather than per keystroke.
    /// An empty term clears the search.
    pub async fn set_search(&self, term: impl Into<String>) {
        let term = term.into();
        let epoch = self.inner.search_epoch.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::select! {
            _ = self.inner.shutdown.cancelled() => return,
            _ = tokio::time::sleep(self.inner.debounce) => {}
        }
        if self.inner.search_epoch.load(Ordering::SeqCst) != epoch {
            // A newer keystroke superseded this one.
            return;
        }

        let changed = self.lock().query.set_search(term);
        if changed {
            self.commit(false).await;
        }
    }

    /// Re-issues the current query state unconditionally, bypassing the
    /// fetch-key dedup. The recovery path after a failed fetch.
    pub async fn refetch(&self) {
        self.commit(true).await;
    }

    // ------------------------------------------------------------------
    // Column actions
    // ------------------------------------------------------------------

    /// Shows or hides a column. No-op for sticky or unknown ids.
    pub async fn set_column_visibility(&self, column_id: &str, visible: bool) {
        let changed = self.lock().layout.set_visibility(column_id, visible);
        if changed {
            self.persist_config().await;
        }
    }

    /// Applies a new column ordering; see [`ColumnLayout::reorder`].
    pub async fn reorder_columns(&self, new_order: &[&str]) {
        let changed = self.lock().layout.reorder(new_order);
        if changed {
            self.persist_config().await;
        }
    }

    /// Pins a column to one edge, or unpins it with `None`.
    pub async fn pin_column(&self, column_id: &str, side: Option<PinSide>) {
        let changed = self.lock().layout.set_pin(column_id, side);
        if changed {
            self.persist_config().await;
        }
    }

    /// Resizes a column, clamped to the configured bounds.
    pub async fn resize_column(&self, column_id: &str, px: f32) {
        let changed = self.lock().layout.set_size(column_id, px);
        if changed {
            self.persist_config().await;
        }
    }

    /// Restores the default column configuration and persists it.
    pub async fn reset_columns(&self) {
        let changed = self.lock().layout.reset();
        if changed {
            self.persist_config().await;
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Toggles one row's selection.
    pub fn toggle_row(&self, id: RowId) {
        self.lock().selection.toggle_row(id);
    }

    /// Selects or deselects every row of the current page.
    ///
    /// Selections made on other pages are left untouched.
    pub fn toggle_page_selection(&self, value: bool) {
        let mut state = self.lock();
        let ids = page_ids(&state, &*self.inner.identity);
        state.selection.toggle_page(&ids, value);
    }

    /// Selects or deselects every row observed so far across visited pages.
    pub fn toggle_all_known(&self, value: bool) {
        self.lock().selection.toggle_all_known(value);
    }

    /// Clears the selection.
    ///
    /// The only way selection is reset; no query transition clears it.
    pub fn clear_selection(&self) {
        self.lock().selection.clear();
    }

    /// Returns `true` if the row is selected.
    pub fn is_row_selected(&self, id: &RowId) -> bool {
        self.lock().selection.is_selected(id)
    }

    /// Returns `true` iff every row of the current page is selected.
    pub fn is_all_page_selected(&self) -> bool {
        let state = self.lock();
        let ids = page_ids(&state, &*self.inner.identity);
        state.selection.is_all_page_selected(&ids)
    }

    /// Returns `true` iff some but not all rows of the current page are
    /// selected (the indeterminate checkbox state).
    pub fn is_some_page_selected(&self) -> bool {
        let state = self.lock();
        let ids = page_ids(&state, &*self.inner.identity);
        state.selection.is_some_page_selected(&ids)
    }

    /// Returns the selected row ids in arbitrary order.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.lock().selection.selected_ids()
    }

    /// Number of selected rows.
    pub fn selection_len(&self) -> usize {
        self.lock().selection.len()
    }

    // ------------------------------------------------------------------
    // Commit pipeline
    // ------------------------------------------------------------------

    /// Commits the current query state and drives its fetch to settlement.
    ///
    /// Without `force`, a state whose fetch key matches the last committed
    /// one is deduplicated and no fetch is issued. The result is applied
    /// only if no newer commit happened in the meantime.
    async fn commit(&self, force: bool) {
        if self.inner.shutdown.is_cancelled() {
            return;
        }

        let (generation, query, token) = {
            let mut state = self.lock();
            let key = state.query.state().fetch_key(&self.inner.params);
            if !force && state.last_key.as_deref() == Some(key.as_str()) {
                return;
            }
            state.last_key = Some(key);
            state.loading = true;

            let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            let token = self.inner.shutdown.child_token();
            // Supersede the previous fetch.
            let previous = std::mem::replace(
                &mut *self.inner.fetch_token.lock().unwrap(),
                token.clone(),
            );
            previous.cancel();

            (generation, state.query.state().clone(), token)
        };

        log::debug!(
            "table '{}': fetch generation {generation} committed",
            self.inner.table_id
        );

        let fetch = self
            .inner
            .source
            .fetch(&self.inner.table_id, &query, &self.inner.params);
        let result = tokio::select! {
            _ = token.cancelled() => {
                log::debug!(
                    "table '{}': fetch generation {generation} cancelled",
                    self.inner.table_id
                );
                return;
            }
            result = fetch => result,
        };

        self.apply(generation, result);
    }

    /// Applies a settled fetch, discarding it if it has been superseded.
    fn apply(&self, generation: u64, result: Result<QueryResult<R>, FetchError>) {
        let mut state = self.lock();
        // The generation check and the write happen under the same lock a
        // commit bumps the generation under, so a stale result can never
        // slip past a newer commit.
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            log::debug!(
                "table '{}': discarding stale result for generation {generation}",
                self.inner.table_id
            );
            return;
        }

        state.loading = false;
        match result {
            Ok(result) => {
                state.total = result.total();
                let rows = result.into_rows();
                let ids: Vec<RowId> = rows.iter().map(|r| self.inner.identity.row_id(r)).collect();
                state.selection.observe_page(&ids);
                state.rows = Arc::new(rows);
                state.settled = true;
                state.error = None;
                // A successful fetch closes any unauthorized episode.
                self.inner.unauthorized.store(false, Ordering::SeqCst);
            }
            Err(e) if e.is_unauthorized() => {
                // Escalated to the session guard, never rendered inline.
                if !self.inner.unauthorized.swap(true, Ordering::SeqCst) {
                    self.inner.guard.notify_unauthorized();
                }
            }
            Err(e) => {
                log::warn!("table '{}': fetch failed: {e}", self.inner.table_id);
                // Rows and configuration are retained; only the error flips.
                state.error = Some(e);
            }
        }
    }

    async fn persist_config(&self) {
        let config = self.lock().layout.config().clone();
        if let Err(e) = self.inner.store.save(&self.inner.table_id, &config).await {
            log::warn!(
                "failed to save configuration for '{}': {e}",
                self.inner.table_id
            );
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EngineState<R>> {
        self.inner.state.lock().unwrap()
    }
}

fn page_ids<R>(state: &EngineState<R>, identity: &dyn RowIdentity<R>) -> Vec<RowId> {
    state.rows.iter().map(|r| identity.row_id(r)).collect()
}

/// Builder for [`TableEngine`].
///
/// Required collaborators are constructor arguments; everything else has a
/// default: an in-memory preference store, a guard that ignores
/// unauthorized failures, no custom parameters, and a 300ms search
/// debounce.
pub struct TableEngineBuilder<R> {
    table_id: String,
    columns: ColumnSet,
    source: Arc<dyn DataSource<R>>,
    identity: Arc<dyn RowIdentity<R>>,
    store: Option<PreferenceStore>,
    guard: Option<Arc<dyn SessionGuard>>,
    params: HashMap<String, Value>,
    initial_query: Option<QueryState>,
    bounds: SizeBounds,
    debounce: Duration,
}

impl<R> TableEngineBuilder<R>
where
    R: Send + Sync + 'static,
{
    /// Sets the durable preference store. Defaults to in-memory.
    pub fn store(mut self, store: PreferenceStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the session guard for unauthorized failures.
    pub fn session_guard(mut self, guard: impl SessionGuard + 'static) -> Self {
        self.guard = Some(Arc::new(guard));
        self
    }

    /// Adds an opaque extra parameter forwarded on every fetch.
    ///
    /// Custom parameters participate in the fetch key.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Seeds the initial query state (e.g. a default page size).
    pub fn initial_query(mut self, query: QueryState) -> Self {
        self.initial_query = Some(query);
        self
    }

    /// Overrides the column resize clamp range.
    pub fn size_bounds(mut self, bounds: SizeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Overrides the search debounce window.
    pub fn search_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Builds the engine. Call [`TableEngine::init`] to load persisted
    /// configuration and issue the first fetch.
    pub fn build(self) -> Result<TableEngine<R>, ValidationError> {
        if self.table_id.is_empty() {
            return Err(ValidationError::EmptyTableId);
        }
        if self
            .initial_query
            .as_ref()
            .is_some_and(|q| q.pagination.page_size == 0)
        {
            return Err(ValidationError::InvalidPageSize(0));
        }

        let columns = Arc::new(self.columns);
        let layout = ColumnLayout::new(Arc::clone(&columns)).with_bounds(self.bounds);
        let query = match self.initial_query {
            Some(initial) => QueryController::with_state(initial),
            None => QueryController::new(),
        };

        Ok(TableEngine {
            inner: Arc::new(EngineInner {
                table_id: self.table_id,
                columns,
                source: self.source,
                identity: self.identity,
                store: self.store.unwrap_or_else(PreferenceStore::in_memory),
                guard: self.guard.unwrap_or_else(|| Arc::new(NullGuard)),
                params: self.params,
                debounce: self.debounce,
                state: Mutex::new(EngineState {
                    query,
                    layout,
                    selection: SelectionModel::new(),
                    rows: Arc::new(Vec::new()),
                    total: 0,
                    loading: false,
                    settled: false,
                    error: None,
                    last_key: None,
                }),
                generation: AtomicU64::new(0),
                search_epoch: AtomicU64::new(0),
                unauthorized: AtomicBool::new(false),
                fetch_token: Mutex::new(CancellationToken::new()),
                shutdown: CancellationToken::new(),
            }),
        })
    }
}
