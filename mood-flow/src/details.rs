use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    api::MovieApi,
    cache::ResultCache,
    config::DEFAULT_IMAGE_BASE_URL,
    error::{FlowError, Result},
    health::check_health,
    models::{ImageSize, MovieDetails, image_url},
    routes::DetailRoute,
};

/// Loads and validates the payload behind the detail view
pub struct DetailLoader {
    api: Arc<dyn MovieApi>,
    preferences: Option<ResultCache>,
    image_base_url: String,
}

impl DetailLoader {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self {
            api,
            preferences: None,
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }

    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into();
        self
    }

    /// Remember the mood of every opened detail route in `cache`.
    pub fn with_preferences(mut self, cache: ResultCache) -> Self {
        self.preferences = Some(cache);
        self
    }

    /// Load the movie addressed by `route`, persisting its mood first.
    pub async fn open(&self, route: &DetailRoute) -> Result<MovieDetails> {
        if let Some(cache) = &self.preferences {
            if !route.mood.trim().is_empty() {
                if let Err(e) = cache.remember_mood(&route.mood).await {
                    warn!("Failed to remember mood: {}", e);
                }
            }
        }
        self.load(&route.id).await
    }

    pub async fn load(&self, movie_id: &str) -> Result<MovieDetails> {
        let movie_id = movie_id.trim();
        if movie_id.is_empty() {
            return Err(FlowError::MissingId);
        }

        if !check_health(self.api.as_ref()).await {
            return Err(FlowError::ServiceUnavailable);
        }

        let payload = self.api.movie(movie_id).await?;
        let details = decode_details(payload, &self.image_base_url).inspect_err(|e| {
            error!(%movie_id, "Rejected movie payload: {}", e);
        })?;

        info!(id = details.id, title = %details.title, "Movie details loaded");
        Ok(details)
    }
}

/// Validate a raw detail payload and qualify its image paths.
///
/// The payload must carry a non-zero `id` and a non-empty `title`; anything else
/// is rejected whole rather than returned half-populated.
pub fn decode_details(payload: Value, image_base_url: &str) -> Result<MovieDetails> {
    let has_id = match payload.get("id") {
        Some(Value::Number(n)) => n.as_i64().is_some_and(|id| id != 0),
        Some(Value::String(s)) => !s.trim().is_empty(),
        _ => false,
    };
    let has_title = payload
        .get("title")
        .and_then(Value::as_str)
        .is_some_and(|title| !title.trim().is_empty());

    if !has_id || !has_title {
        return Err(FlowError::InvalidPayload(
            "payload is missing id or title".to_string(),
        ));
    }

    let mut details: MovieDetails =
        serde_json::from_value(payload).map_err(|e| FlowError::InvalidPayload(e.to_string()))?;

    details.poster_path = details
        .poster_path
        .filter(|p| !p.is_empty())
        .map(|p| image_url(image_base_url, ImageSize::Poster, &p));
    details.backdrop_path = details
        .backdrop_path
        .filter(|p| !p.is_empty())
        .map(|p| image_url(image_base_url, ImageSize::Original, &p));

    Ok(details)
}

/// Profile image for a cast member, at the size used by cast cards.
pub fn profile_url(image_base_url: &str, profile_path: &str) -> String {
    image_url(image_base_url, ImageSize::Profile, profile_path)
}
