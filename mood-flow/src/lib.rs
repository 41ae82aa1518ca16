//! mood-flow – client core for a mood-based movie recommendation service.
//!
//! A user types a mood, the service answers with paginated recommendations, and
//! the user moves between the result list and movie detail pages. This crate owns
//! everything between the view and the wire:
//!
//! * [`http`] / [`api`] – bounded-timeout requests and the closed error taxonomy
//! * [`health`] – best-effort liveness gate run before dependent calls
//! * [`search`] – the search/pagination state machine
//! * [`cache`] / [`navigation`] – persisted page cache and the one-shot list snapshot
//! * [`details`] – validated movie detail loading
//!
//! Persistence goes through the [`StoragePort`] trait, so the same coordinator runs
//! against a file, browser-like storage, or memory in tests.

pub mod api;
pub mod cache;
pub mod config;
pub mod details;
pub mod error;
pub mod health;
pub mod http;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod search;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use api::MovieApi;
pub use cache::ResultCache;
pub use config::ClientConfig;
pub use details::DetailLoader;
pub use error::{FlowError, Recovery, Result};
pub use health::check_health;
pub use http::HttpClient;
pub use models::{
    CastMember, Director, ListState, MovieDetails, MovieSummary, NotableMovie, PageResult,
    SearchQuery, SimilarMovie, Video, Writer,
};
pub use navigation::{NavigationBridge, PendingScroll, Restored};
pub use routes::{DetailRoute, ListRoute};
pub use search::{ListPhase, LoadMore, MountOutcome, SearchCoordinator};
pub use storage::{InMemoryStore, JsonFileStore, StoragePort};
