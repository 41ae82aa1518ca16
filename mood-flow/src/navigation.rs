//! Navigation state bridge – keeps the list view intact across a detour to a detail view.
//!
//! Before leaving the list, the view calls [`NavigationBridge::snapshot`] with its
//! accumulated [`ListState`] and the current scroll offset. When the list mounts
//! again, [`NavigationBridge::restore`] hands the snapshot back **once** and deletes it,
//! so a later fresh visit starts from the URL instead of stale state.
//!
//! The scroll offset is not applied by the bridge. It is returned as a
//! [`PendingScroll`] that the view applies after it has rendered the restored
//! rows; applying it earlier would scroll an empty page.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    error::Result,
    models::ListState,
    storage::{StoragePort, read_json, write_json},
};

pub const LIST_STATE_KEY: &str = "movieListState";
pub const SCROLL_POSITION_KEY: &str = "scrollPosition";

/// Scroll offset waiting for the restored view to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "the scroll position is lost unless applied after render"]
pub struct PendingScroll {
    offset: u64,
}

impl PendingScroll {
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Apply the offset. Consumes the value so it can only happen once.
    pub fn apply<F: FnOnce(u64)>(self, scroll_to: F) {
        scroll_to(self.offset);
    }
}

/// A consumed snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Restored {
    pub state: ListState,
    pub pending_scroll: Option<PendingScroll>,
}

#[derive(Clone)]
pub struct NavigationBridge {
    session: Arc<dyn StoragePort>,
}

impl NavigationBridge {
    /// `session` should be scoped to one browsing session.
    pub fn new(session: Arc<dyn StoragePort>) -> Self {
        Self { session }
    }

    pub async fn snapshot(&self, state: &ListState, scroll_offset: u64) -> Result<()> {
        write_json(self.session.as_ref(), LIST_STATE_KEY, state).await?;
        self.session
            .set(SCROLL_POSITION_KEY, scroll_offset.to_string())
            .await?;
        info!(
            mood = %state.mood,
            movies = state.movies.len(),
            page = state.current_page,
            scroll_offset,
            "Saved list snapshot"
        );
        Ok(())
    }

    /// Take the snapshot if one exists. Both records are removed either way.
    pub async fn restore(&self) -> Result<Option<Restored>> {
        let state = read_json::<ListState>(self.session.as_ref(), LIST_STATE_KEY).await;
        let scroll = self.session.get(SCROLL_POSITION_KEY).await?;

        self.session.remove(LIST_STATE_KEY).await?;
        self.session.remove(SCROLL_POSITION_KEY).await?;

        let state = match state {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!("No list snapshot to restore");
                return Ok(None);
            }
            Err(e) => {
                warn!("Discarding unreadable list snapshot: {}", e);
                return Ok(None);
            }
        };

        let pending_scroll = scroll.and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(offset) => Some(PendingScroll { offset }),
            Err(e) => {
                warn!(%raw, "Ignoring unreadable scroll position: {}", e);
                None
            }
        });

        info!(
            mood = %state.mood,
            movies = state.movies.len(),
            "Restored list snapshot"
        );
        Ok(Some(Restored {
            state,
            pending_scroll,
        }))
    }
}
