//! In-crate fake of the recommendation service for unit tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use crate::{
    api::MovieApi,
    error::{FlowError, Result},
    models::{MovieSummary, PageResult, SearchQuery},
};

pub fn movie(id: i64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        overview: "..".to_string(),
        rating: 7.5,
        poster: None,
    }
}

/// Page `current_page` of `total_pages`, holding `per_page` movies with ids unique across pages.
pub fn page(current_page: u32, total_pages: u32, per_page: usize) -> PageResult {
    let first = (current_page as i64 - 1) * per_page as i64 + 1;
    PageResult {
        recommendations: (first..first + per_page as i64)
            .map(|id| movie(id, &format!("Movie {}", id)))
            .collect(),
        total_pages,
        current_page,
    }
}

pub struct FakeApi {
    healthy: AtomicBool,
    health_calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
    pages: Mutex<HashMap<(String, u32), PageResult>>,
    failing: Mutex<HashMap<(String, u32), u16>>,
    movies: Mutex<HashMap<String, Value>>,
    recommendation_calls: Mutex<Vec<SearchQuery>>,
    movie_calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            healthy: AtomicBool::new(true),
            health_calls: AtomicUsize::new(0),
            delay: Mutex::new(None),
            pages: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashMap::new()),
            movies: Mutex::new(HashMap::new()),
            recommendation_calls: Mutex::new(Vec::new()),
            movie_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Delay every recommendations response.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn add_page(&self, mood: &str, result: PageResult) {
        self.add_page_at(mood, result.current_page, result);
    }

    /// Answer requests for `page` with `result`, whatever page it claims to be.
    pub fn add_page_at(&self, mood: &str, page: u32, result: PageResult) {
        self.pages
            .lock()
            .unwrap()
            .insert((mood.to_string(), page), result);
    }

    pub fn fail_page(&self, mood: &str, page: u32, status: u16) {
        self.failing
            .lock()
            .unwrap()
            .insert((mood.to_string(), page), status);
    }

    pub fn add_movie(&self, id: &str, payload: Value) {
        self.movies.lock().unwrap().insert(id.to_string(), payload);
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub fn recommendation_calls(&self) -> Vec<SearchQuery> {
        self.recommendation_calls.lock().unwrap().clone()
    }

    pub fn movie_calls(&self) -> Vec<String> {
        self.movie_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovieApi for FakeApi {
    async fn health(&self) -> Result<()> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(FlowError::Http(503))
        }
    }

    async fn recommendations(&self, query: &SearchQuery) -> Result<PageResult> {
        self.recommendation_calls.lock().unwrap().push(query.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let key = (query.mood.clone(), query.page);
        if let Some(status) = self.failing.lock().unwrap().get(&key) {
            return Err(FlowError::Api {
                status: *status,
                message: "Recommendation engine failed".to_string(),
                details: Some(json!({"error": "internal", "status": status})),
            });
        }

        self.pages
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| FlowError::Api {
                status: 404,
                message: "Page not found".to_string(),
                details: None,
            })
    }

    async fn movie(&self, id: &str) -> Result<Value> {
        self.movie_calls.lock().unwrap().push(id.to_string());
        self.movies
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| FlowError::Api {
                status: 404,
                message: "Movie not found".to_string(),
                details: Some(json!({"detail": "Movie not found"})),
            })
    }
}
