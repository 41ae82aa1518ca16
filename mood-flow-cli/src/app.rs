use std::{path::Path, sync::Arc};

use anyhow::Context;
use mood_flow::{
    ClientConfig, DetailLoader, HttpClient, InMemoryStore, JsonFileStore, NavigationBridge,
    ResultCache, SearchCoordinator,
};
use tracing::info;

/// Shared wiring for every command: one HTTP client, the on-disk result cache,
/// and a session store that lives as long as the process.
pub struct App {
    api: Arc<HttpClient>,
    cache: ResultCache,
    session: Arc<InMemoryStore>,
    image_base_url: String,
}

impl App {
    pub async fn new(config: &ClientConfig, cache_file: &Path) -> anyhow::Result<Self> {
        let api = HttpClient::new(config).context("Failed to create HTTP client")?;
        let store = JsonFileStore::open(cache_file)
            .await
            .with_context(|| format!("Failed to open cache at {}", cache_file.display()))?;

        info!(api = %config.base(), cache = %store.path().display(), "Client ready");
        Ok(Self {
            api: Arc::new(api),
            cache: ResultCache::new(Arc::new(store)),
            session: Arc::new(InMemoryStore::new()),
            image_base_url: config.image_base_url.clone(),
        })
    }

    pub fn api(&self) -> &HttpClient {
        &self.api
    }

    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// A fresh list view. Each call behaves like mounting the list page again.
    pub fn list_view(&self) -> SearchCoordinator {
        SearchCoordinator::new(
            self.api.clone(),
            self.cache.clone(),
            NavigationBridge::new(self.session.clone()),
        )
    }

    pub fn detail_loader(&self) -> DetailLoader {
        DetailLoader::new(self.api.clone())
            .with_image_base_url(self.image_base_url.clone())
            .with_preferences(self.cache.clone())
    }
}
