use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};
use tracing::{debug, info, warn};

use crate::{
    api::MovieApi,
    cache::ResultCache,
    error::{FlowError, Result},
    health::check_health,
    models::{ListState, PageResult, SearchQuery},
    navigation::{NavigationBridge, PendingScroll},
    routes::ListRoute,
};

/// Where the list view is in its search lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Searching { page: u32 },
    Ready { page: u32 },
    Failed { message: String },
}

/// Result of a "load more" request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    Loaded { added: usize },
    /// Nothing was requested: no further pages, a request already in flight,
    /// or the list changed underneath the request.
    Skipped,
}

/// How the list view got its rows when it mounted
#[derive(Debug, Clone, PartialEq)]
pub enum MountOutcome {
    /// From the navigation snapshot. Apply the scroll after rendering.
    Restored { pending_scroll: Option<PendingScroll> },
    /// From the result cache, without a network call.
    Cached { pages: u32 },
    /// From a fresh search.
    Fetched,
    /// No mood to search for.
    Idle { suggested_mood: Option<String> },
}

struct ListView {
    phase: ListPhase,
    state: ListState,
    route: ListRoute,
}

impl ListView {
    fn idle() -> Self {
        Self {
            phase: ListPhase::Idle,
            state: ListState::default(),
            route: ListRoute::home(),
        }
    }

    fn show(&mut self, state: ListState) {
        self.phase = if state.current_page == 0 {
            ListPhase::Idle
        } else {
            ListPhase::Ready {
                page: state.current_page,
            }
        };
        self.route = if state.mood.is_empty() {
            ListRoute::home()
        } else {
            ListRoute::for_mood(state.mood.clone())
        };
        self.state = state;
    }

    fn can_load_more(&self) -> bool {
        !matches!(self.phase, ListPhase::Searching { .. }) && self.state.has_more()
    }
}

/// Drives mood searches and pagination for one list view.
///
/// Transitions:
/// * `Idle → Searching → Ready(1)` on [`submit`](Self::submit), or `Failed` with results cleared
/// * `Ready(k) → Searching → Ready(k+1)` on [`load_more`](Self::load_more), or `Failed` with results kept
///
/// The first network search of a session is gated by the health probe.
/// Successful pages are written to the [`ResultCache`] and read back on
/// [`mount`](Self::mount) when no navigation snapshot is available.
pub struct SearchCoordinator {
    api: Arc<dyn MovieApi>,
    cache: ResultCache,
    navigation: NavigationBridge,
    view: Mutex<ListView>,
    session_healthy: AtomicBool,
    loading_more: AtomicBool,
}

impl SearchCoordinator {
    pub fn new(api: Arc<dyn MovieApi>, cache: ResultCache, navigation: NavigationBridge) -> Self {
        Self {
            api,
            cache,
            navigation,
            view: Mutex::new(ListView::idle()),
            session_healthy: AtomicBool::new(false),
            loading_more: AtomicBool::new(false),
        }
    }

    fn view(&self) -> MutexGuard<'_, ListView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> ListPhase {
        self.view().phase.clone()
    }

    /// Current accumulated list.
    pub fn state(&self) -> ListState {
        self.view().state.clone()
    }

    /// Address reflecting the last successful search.
    pub fn route(&self) -> ListRoute {
        self.view().route.clone()
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more.load(Ordering::Acquire)
    }

    pub fn can_load_more(&self) -> bool {
        !self.is_loading_more() && self.view().can_load_more()
    }

    /// Start a new search for `mood`, replacing whatever the list shows.
    pub async fn submit(&self, mood: &str) -> Result<()> {
        let query = SearchQuery::new(mood, 1)?;
        info!(mood = %query.mood, "Starting search");
        self.view().phase = ListPhase::Searching { page: 1 };

        let result = match self.fetch_page(&query).await.and_then(|r| require_results(&query, r)) {
            Ok(result) => result,
            Err(e) => {
                warn!(mood = %query.mood, "Search failed: {}", e);
                let mut view = self.view();
                view.state = ListState {
                    mood: query.mood.clone(),
                    ..ListState::default()
                };
                view.phase = ListPhase::Failed {
                    message: e.user_message(),
                };
                return Err(e);
            }
        };

        self.persist_page(&query, &result).await;
        if let Err(e) = self.cache.remember_mood(&query.mood).await {
            warn!("Failed to remember mood: {}", e);
        }

        let state = ListState {
            mood: query.mood,
            movies: result.recommendations,
            current_page: result.current_page,
            total_pages: result.total_pages,
        };
        info!(
            movies = state.movies.len(),
            total_pages = state.total_pages,
            "Search ready"
        );
        self.view().show(state);
        Ok(())
    }

    /// Fetch the next page and append it.
    ///
    /// A no-op when the last page is already shown or another load is in flight.
    pub async fn load_more(&self) -> Result<LoadMore> {
        let query = {
            let view = self.view();
            if !view.can_load_more() {
                debug!("No further pages to load");
                return Ok(LoadMore::Skipped);
            }
            SearchQuery::new(&view.state.mood, view.state.current_page + 1)?
        };

        let Some(_in_flight) = InFlight::acquire(&self.loading_more) else {
            debug!("Load more already in flight");
            return Ok(LoadMore::Skipped);
        };
        self.view().phase = ListPhase::Searching { page: query.page };

        let cached = self.cache.page(&query.mood, query.page).await.and_then(|cached| {
            require_page(&query, normalize(cached))
                .inspect_err(|e| warn!(mood = %query.mood, "Ignoring cached page: {}", e))
                .ok()
        });

        let result = match cached {
            Some(cached) => cached,
            None => match self.fetch_page(&query).await {
                Ok(result) => {
                    self.persist_page(&query, &result).await;
                    result
                }
                Err(e) => {
                    warn!(mood = %query.mood, page = query.page, "Load more failed: {}", e);
                    let mut view = self.view();
                    if view.state.mood == query.mood {
                        view.phase = ListPhase::Failed {
                            message: e.user_message(),
                        };
                    }
                    return Err(e);
                }
            },
        };

        let mut view = self.view();
        if view.state.mood != query.mood || view.state.current_page + 1 != query.page {
            debug!(page = query.page, "Discarding page for a replaced list");
            return Ok(LoadMore::Skipped);
        }

        let added = result.recommendations.len();
        append_page(&mut view.state, result);
        view.phase = ListPhase::Ready {
            page: view.state.current_page,
        };
        info!(
            added,
            page = view.state.current_page,
            total = view.state.movies.len(),
            "Loaded more results"
        );
        Ok(LoadMore::Loaded { added })
    }

    /// Bring the list view up for `route`.
    ///
    /// Order of preference: the one-shot navigation snapshot (when it belongs to
    /// the same mood), cached pages for the route's mood, then a fresh search.
    pub async fn mount(&self, route: &ListRoute) -> Result<MountOutcome> {
        let wanted = route
            .mood
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty());

        match self.navigation.restore().await {
            Ok(Some(restored)) if wanted.is_none_or(|m| m == restored.state.mood) => {
                self.view().show(restored.state);
                return Ok(MountOutcome::Restored {
                    pending_scroll: restored.pending_scroll,
                });
            }
            Ok(Some(restored)) => {
                debug!(snapshot_mood = %restored.state.mood, "Snapshot belongs to another mood");
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to restore list snapshot: {}", e),
        }

        let Some(mood) = wanted else {
            *self.view() = ListView::idle();
            return Ok(MountOutcome::Idle {
                suggested_mood: self.cache.last_mood().await,
            });
        };

        if let Some(pages) = self.replay_cached(mood).await {
            return Ok(MountOutcome::Cached { pages });
        }

        self.submit(mood).await?;
        Ok(MountOutcome::Fetched)
    }

    /// Save the list for a round trip to a detail view.
    pub async fn snapshot(&self, scroll_offset: u64) -> Result<ListState> {
        let state = self.state();
        self.navigation.snapshot(&state, scroll_offset).await?;
        Ok(state)
    }

    async fn ensure_healthy(&self) -> Result<()> {
        if self.session_healthy.load(Ordering::Acquire) {
            return Ok(());
        }
        if !check_health(self.api.as_ref()).await {
            return Err(FlowError::ServiceUnavailable);
        }
        self.session_healthy.store(true, Ordering::Release);
        Ok(())
    }

    async fn fetch_page(&self, query: &SearchQuery) -> Result<PageResult> {
        self.ensure_healthy().await?;
        let result = self.api.recommendations(query).await?;
        require_page(query, normalize(result))
    }

    async fn persist_page(&self, query: &SearchQuery, result: &PageResult) {
        if let Err(e) = self.cache.store_page(&query.mood, query.page, result).await {
            warn!(mood = %query.mood, page = query.page, "Failed to cache page: {}", e);
        }
    }

    /// Rebuild the list from consecutive cached pages starting at page 1.
    async fn replay_cached(&self, mood: &str) -> Option<u32> {
        let first = normalize(self.cache.page(mood, 1).await?);
        let mut state = ListState {
            mood: mood.to_string(),
            movies: first.recommendations,
            current_page: first.current_page,
            total_pages: first.total_pages,
        };
        let mut pages = 1;

        while state.has_more() {
            let Some(next) = self.cache.page(mood, state.current_page + 1).await else {
                break;
            };
            let next = normalize(next);
            if next.current_page <= state.current_page {
                warn!(%mood, "Cached page numbering is inconsistent, stopping replay");
                break;
            }
            append_page(&mut state, next);
            pages += 1;
        }

        info!(%mood, pages, movies = state.movies.len(), "Loaded list from cache");
        self.view().show(state);
        Some(pages)
    }
}

fn require_results(query: &SearchQuery, result: PageResult) -> Result<PageResult> {
    if result.recommendations.is_empty() {
        return Err(FlowError::NotFound(format!(
            "No movies found for \"{}\"",
            query.mood
        )));
    }
    Ok(result)
}

/// A page must be the one that was asked for, or appending it would repeat rows.
fn require_page(query: &SearchQuery, result: PageResult) -> Result<PageResult> {
    if result.current_page != query.page {
        return Err(FlowError::InvalidPayload(format!(
            "asked for page {} but got page {}",
            query.page, result.current_page
        )));
    }
    Ok(result)
}

/// Keep `current_page <= total_pages` whatever the server reports.
fn normalize(mut result: PageResult) -> PageResult {
    result.current_page = result.current_page.max(1);
    if result.current_page > result.total_pages {
        warn!(
            current_page = result.current_page,
            total_pages = result.total_pages,
            "Server reported a page past the end"
        );
        result.total_pages = result.current_page;
    }
    result
}

fn append_page(state: &mut ListState, page: PageResult) {
    state.movies.extend(page.recommendations);
    state.current_page = page.current_page;
    state.total_pages = page.total_pages;
}

/// Holds the load-more flag; clears it on drop.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
