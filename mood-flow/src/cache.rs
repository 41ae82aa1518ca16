use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    error::Result,
    models::PageResult,
    storage::{StoragePort, read_json, write_json},
};

pub const SELECTED_MOOD_KEY: &str = "selectedMood";

/// Storage key for one cached page.
pub fn page_key(mood: &str, page: u32) -> String {
    format!("movies_{}_{}", mood, page)
}

/// Read-through cache of raw recommendation pages keyed by `(mood, page)`.
///
/// Entries never expire: a page stays valid until the backing storage is
/// cleared from outside. The last searched mood is kept alongside.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn StoragePort>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn StoragePort>) -> Self {
        Self { store }
    }

    /// Cached page, if any. Unreadable entries count as a miss.
    pub async fn page(&self, mood: &str, page: u32) -> Option<PageResult> {
        let key = page_key(mood, page);
        match read_json::<PageResult>(self.store.as_ref(), &key).await {
            Ok(Some(result)) => {
                debug!(%key, "Cache hit");
                Some(result)
            }
            Ok(None) => {
                debug!(%key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(%key, "Ignoring unreadable cache entry: {}", e);
                None
            }
        }
    }

    pub async fn store_page(&self, mood: &str, page: u32, result: &PageResult) -> Result<()> {
        write_json(self.store.as_ref(), &page_key(mood, page), result).await
    }

    pub async fn remember_mood(&self, mood: &str) -> Result<()> {
        self.store.set(SELECTED_MOOD_KEY, mood.to_string()).await
    }

    pub async fn last_mood(&self) -> Option<String> {
        match self.store.get(SELECTED_MOOD_KEY).await {
            Ok(mood) => mood.filter(|m| !m.trim().is_empty()),
            Err(e) => {
                warn!("Failed to read last mood: {}", e);
                None
            }
        }
    }
}
