use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::info;

use crate::{
    error::Result,
    http::HttpClient,
    models::{PageResult, SearchQuery},
};

pub const HEALTH_PATH: &str = "/health";
pub const RECOMMENDATIONS_PATH: &str = "/recommendations/";
pub const MOVIE_PATH: &str = "/movie";

/// Operations offered by the recommendation service
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// Succeeds when the service answers its liveness endpoint with 2xx.
    async fn health(&self) -> Result<()>;

    async fn recommendations(&self, query: &SearchQuery) -> Result<PageResult>;

    /// Raw detail payload; validation happens in [`crate::details`].
    async fn movie(&self, id: &str) -> Result<Value>;
}

#[async_trait]
impl MovieApi for HttpClient {
    async fn health(&self) -> Result<()> {
        self.request(Method::GET, HEALTH_PATH, None).await?;
        Ok(())
    }

    async fn recommendations(&self, query: &SearchQuery) -> Result<PageResult> {
        info!(mood = %query.mood, page = query.page, "Requesting recommendations");
        let result: PageResult = self.post_json(RECOMMENDATIONS_PATH, query).await?;
        info!(
            "Received {} recommendations (page {} of {})",
            result.recommendations.len(),
            result.current_page,
            result.total_pages
        );
        Ok(result)
    }

    async fn movie(&self, id: &str) -> Result<Value> {
        info!("Fetching movie details for ID: {}", id);
        let path = format!("{}/{}", MOVIE_PATH, urlencoding::encode(id));
        self.get_json(&path).await
    }
}
