//! Paginated query controller.
//!
//! Keeps a paginated, filterable, sortable view of a remote resource
//! consistent with user input while minimizing redundant requests and
//! preserving transient view state (expanded row, current page) across both
//! user-initiated and timer-initiated refreshes.
//!
//! The state machine lives in [`PagerState`], which is synchronous and pure.
//! [`PagedQueryController`] wraps it with the IO concerns: a single-slot
//! debounce for filter edits, an auto-refresh interval, and a sequence
//! guard that discards responses superseded by a newer request.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use domain::{Identified, PageRequest, PageResult, QueryFilter, SortDir};

use crate::error::ClientError;

/// Quiet window after the last filter edit before a refetch fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Auto-refresh cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Remote page source. `ApiClient` implements this per resource; tests use
/// in-memory fakes.
#[async_trait]
pub trait PageFetcher<R, F>: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest<F>) -> Result<PageResult<R>, ClientError>;
}

/// Whether the last fetch settled, is in flight, or failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Error(String),
}

/// Immutable view of the current page for rendering.
#[derive(Debug, Clone)]
pub struct PageView<R> {
    pub rows: Vec<R>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub expanded: Option<String>,
    pub status: FetchStatus,
}

/// Pure pager state: filters, sort, pagination cursor, rows, expansion, and
/// the request sequence guard.
#[derive(Debug)]
pub struct PagerState<R, F, S> {
    filter: F,
    sort_field: S,
    sort_dir: SortDir,
    page: u32,
    size: u32,
    total_elements: u64,
    total_pages: u32,
    rows: Vec<R>,
    expanded: Option<String>,
    status: FetchStatus,
    latest_issued: u64,
}

impl<R, F, S> PagerState<R, F, S>
where
    R: Identified + Clone,
    F: QueryFilter + Clone,
    S: Copy + PartialEq + std::fmt::Display,
{
    pub fn new(filter: F, sort_field: S, sort_dir: SortDir, size: u32) -> Self {
        Self {
            filter,
            sort_field,
            sort_dir,
            page: 0,
            size,
            total_elements: 0,
            total_pages: 1,
            rows: Vec::new(),
            expanded: None,
            status: FetchStatus::Idle,
            latest_issued: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn sort(&self) -> (S, SortDir) {
        (self.sort_field, self.sort_dir)
    }

    pub fn edit_filter(&mut self, edit: impl FnOnce(&mut F)) {
        edit(&mut self.filter);
    }

    pub fn set_size(&mut self, size: u32) {
        self.size = size.max(1);
    }

    /// Same field flips direction; a new field sorts ascending.
    pub fn toggle_sort(&mut self, field: S) {
        if field == self.sort_field {
            self.sort_dir = self.sort_dir.flipped();
        } else {
            self.sort_field = field;
            self.sort_dir = SortDir::Asc;
        }
    }

    pub fn page_in_bounds(&self, page: u32) -> bool {
        page < self.total_pages
    }

    /// The immutable request for a target page under the current state.
    /// Equal state yields byte-identical query parameters.
    pub fn request_for(&self, target_page: u32) -> PageRequest<F> {
        PageRequest {
            page: target_page,
            size: self.size,
            sort: Some((self.sort_field.to_string(), self.sort_dir)),
            filter: self.filter.clone(),
        }
    }

    /// Marks a new in-flight request and returns its sequence number.
    /// Issuing a request supersedes every earlier one.
    pub fn begin_fetch(&mut self) -> u64 {
        self.latest_issued += 1;
        self.status = FetchStatus::Loading;
        self.latest_issued
    }

    /// Applies a fetched page. A response whose sequence number is not the
    /// latest issued is stale and is discarded; returns whether it applied.
    ///
    /// The expanded row survives a refresh only while its id is still
    /// present in the fresh content.
    pub fn apply(&mut self, seq: u64, result: PageResult<R>) -> bool {
        if seq != self.latest_issued {
            return false;
        }
        self.page = result.page;
        self.size = result.size.max(1);
        self.total_elements = result.total_elements;
        self.total_pages = result.total_pages;
        self.rows = result.content;
        if let Some(expanded) = &self.expanded {
            if !self.rows.iter().any(|row| row.row_id() == expanded) {
                self.expanded = None;
            }
        }
        self.status = FetchStatus::Idle;
        true
    }

    /// Records a fetch failure: previous rows stay visible, the status
    /// carries the error. Stale failures are ignored like stale successes.
    pub fn fail(&mut self, seq: u64, error: &ClientError) {
        if seq == self.latest_issued {
            self.status = FetchStatus::Error(error.to_string());
        }
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
    }

    pub fn view(&self) -> PageView<R> {
        PageView {
            rows: self.rows.clone(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            expanded: self.expanded.clone(),
            status: self.status.clone(),
        }
    }
}

/// Tuning knobs for a controller instance.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub debounce: Duration,
    pub poll_interval: Duration,
    pub auto_refresh: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            auto_refresh: false,
        }
    }
}

/// Async orchestrator over [`PagerState`] and a [`PageFetcher`].
pub struct PagedQueryController<R, F, S> {
    state: Arc<Mutex<PagerState<R, F, S>>>,
    fetcher: Arc<dyn PageFetcher<R, F>>,
    edits: mpsc::UnboundedSender<()>,
    auto_refresh: Arc<AtomicBool>,
    shutdown: watch::Sender<bool>,
    version: watch::Sender<u64>,
    tasks: Vec<JoinHandle<()>>,
}

impl<R, F, S> PagedQueryController<R, F, S>
where
    R: Identified + Clone + Send + 'static,
    F: QueryFilter + Clone + Send + 'static,
    S: Copy + PartialEq + std::fmt::Display + Send + 'static,
{
    /// Spawns the debounce and auto-refresh tasks. Both honor the shutdown
    /// signal sent by [`Self::close`].
    pub fn new(
        fetcher: Arc<dyn PageFetcher<R, F>>,
        initial: PagerState<R, F, S>,
        options: ControllerOptions,
    ) -> Self {
        let state = Arc::new(Mutex::new(initial));
        let (edits_tx, edits_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (version_tx, _) = watch::channel(0u64);
        let auto_refresh = Arc::new(AtomicBool::new(options.auto_refresh));

        let tasks = vec![
            tokio::spawn(debounce_loop(
                Arc::clone(&state),
                Arc::clone(&fetcher),
                version_tx.clone(),
                edits_rx,
                shutdown_rx.clone(),
                options.debounce,
            )),
            tokio::spawn(poll_loop(
                Arc::clone(&state),
                Arc::clone(&fetcher),
                version_tx.clone(),
                Arc::clone(&auto_refresh),
                shutdown_rx,
                options.poll_interval,
            )),
        ];

        Self {
            state,
            fetcher,
            edits: edits_tx,
            auto_refresh,
            shutdown: shutdown_tx,
            version: version_tx,
            tasks,
        }
    }

    /// Fetches an arbitrary page with the current filters and sort. This is
    /// the core operation; it does not bounds-check.
    pub async fn fetch_page(&self, target_page: u32) {
        run_fetch(&self.state, &self.fetcher, &self.version, target_page).await;
    }

    /// Refetches the current page.
    pub async fn refresh(&self) {
        let page = self.locked().page();
        self.fetch_page(page).await;
    }

    /// Bounds-checked navigation; out-of-range targets are silent no-ops.
    pub async fn go_to_page(&self, page: u32) {
        if !self.locked().page_in_bounds(page) {
            debug!(page, "ignoring out-of-range page request");
            return;
        }
        self.fetch_page(page).await;
    }

    pub async fn next_page(&self) {
        let target = self.locked().page() + 1;
        self.go_to_page(target).await;
    }

    pub async fn prev_page(&self) {
        let page = self.locked().page();
        if page > 0 {
            self.go_to_page(page - 1).await;
        }
    }

    /// Toggles or sets the sort column and refetches from page zero.
    pub async fn set_sort(&self, field: S) {
        self.locked().toggle_sort(field);
        self.fetch_page(0).await;
    }

    /// Applies a filter edit and (re)arms the debounce. Rapid consecutive
    /// edits coalesce into one page-zero refetch.
    pub fn edit_filter(&self, edit: impl FnOnce(&mut F)) {
        self.locked().edit_filter(edit);
        let _ = self.edits.send(());
    }

    /// Page-size changes behave like filter edits: debounced, back to page
    /// zero.
    pub fn set_size(&self, size: u32) {
        self.locked().set_size(size);
        let _ = self.edits.send(());
    }

    pub fn toggle_expanded(&self, id: &str) {
        self.locked().toggle_expanded(id);
        notify(&self.version);
    }

    pub fn set_auto_refresh(&self, enabled: bool) {
        self.auto_refresh.store(enabled, Ordering::Relaxed);
    }

    pub fn auto_refresh_enabled(&self) -> bool {
        self.auto_refresh.load(Ordering::Relaxed)
    }

    pub fn view(&self) -> PageView<R> {
        self.locked().view()
    }

    /// Change notifications: the value bumps after every applied fetch,
    /// failure, or expansion toggle.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Stops the debounce and auto-refresh tasks. The stop signal takes
    /// effect synchronously; requests already on the wire are left to
    /// resolve and their responses discarded by the sequence guard.
    pub fn close(&mut self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, PagerState<R, F, S>> {
        self.state.lock().expect("pager state lock poisoned")
    }
}

impl<R, F, S> Drop for PagedQueryController<R, F, S> {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

fn notify(version: &watch::Sender<u64>) {
    version.send_modify(|v| *v = v.wrapping_add(1));
}

async fn run_fetch<R, F, S>(
    state: &Arc<Mutex<PagerState<R, F, S>>>,
    fetcher: &Arc<dyn PageFetcher<R, F>>,
    version: &watch::Sender<u64>,
    target_page: u32,
) where
    R: Identified + Clone + Send + 'static,
    F: QueryFilter + Clone + Send + 'static,
    S: Copy + PartialEq + std::fmt::Display + Send + 'static,
{
    let (seq, request) = {
        let mut state = state.lock().expect("pager state lock poisoned");
        let request = state.request_for(target_page);
        (state.begin_fetch(), request)
    };
    notify(version);

    match fetcher.fetch_page(&request).await {
        Ok(result) => {
            let applied = state
                .lock()
                .expect("pager state lock poisoned")
                .apply(seq, result);
            if !applied {
                debug!(seq, page = target_page, "discarding stale page response");
            }
        }
        Err(err) => {
            warn!(error = %err, page = target_page, "page fetch failed");
            state
                .lock()
                .expect("pager state lock poisoned")
                .fail(seq, &err);
        }
    }
    notify(version);
}

/// Single-slot debounce: each edit re-arms the quiet window; when it elapses
/// undisturbed, one page-zero fetch fires.
async fn debounce_loop<R, F, S>(
    state: Arc<Mutex<PagerState<R, F, S>>>,
    fetcher: Arc<dyn PageFetcher<R, F>>,
    version: watch::Sender<u64>,
    mut edits: mpsc::UnboundedReceiver<()>,
    mut shutdown: watch::Receiver<bool>,
    debounce: Duration,
) where
    R: Identified + Clone + Send + 'static,
    F: QueryFilter + Clone + Send + 'static,
    S: Copy + PartialEq + std::fmt::Display + Send + 'static,
{
    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            edit = edits.recv() => {
                if edit.is_none() {
                    break;
                }
                'window: loop {
                    tokio::select! {
                        changed = shutdown.changed() => {
                            if changed.is_err() || *shutdown.borrow() {
                                return;
                            }
                        }
                        _ = tokio::time::sleep(debounce) => {
                            run_fetch(&state, &fetcher, &version, 0).await;
                            break 'window;
                        }
                        edit = edits.recv() => {
                            if edit.is_none() {
                                return;
                            }
                            // window re-arms
                        }
                    }
                }
            }
        }
    }
}

/// Auto-refresh: refetches the current page on a fixed cadence while the
/// toggle is on. Reads page and filters live at each tick, so navigation
/// and filter changes take effect on the next tick without rescheduling.
async fn poll_loop<R, F, S>(
    state: Arc<Mutex<PagerState<R, F, S>>>,
    fetcher: Arc<dyn PageFetcher<R, F>>,
    version: watch::Sender<u64>,
    auto_refresh: Arc<AtomicBool>,
    mut shutdown: watch::Receiver<bool>,
    poll_interval: Duration,
) where
    R: Identified + Clone + Send + 'static,
    F: QueryFilter + Clone + Send + 'static,
    S: Copy + PartialEq + std::fmt::Display + Send + 'static,
{
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // Skip the immediate first tick; the initial load is the caller's.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if auto_refresh.load(Ordering::Relaxed) {
                    let page = state.lock().expect("pager state lock poisoned").page();
                    run_fetch(&state, &fetcher, &version, page).await;
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}
