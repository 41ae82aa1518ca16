use serde::{Deserialize, Serialize};

use crate::error::{FlowError, Result};

/// One request for a page of recommendations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub mood: String,
    pub page: u32,
}

impl SearchQuery {
    /// Build a query, trimming the mood. Empty moods and page 0 are rejected.
    pub fn new(mood: &str, page: u32) -> Result<Self> {
        let mood = mood.trim();
        if mood.is_empty() {
            return Err(FlowError::Validation("Please enter a mood".to_string()));
        }
        if page == 0 {
            return Err(FlowError::Validation("Pages start at 1".to_string()));
        }
        Ok(Self {
            mood: mood.to_string(),
            page,
        })
    }
}

/// One result row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub poster: Option<String>,
}

/// Raw page as returned by `POST /recommendations/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub recommendations: Vec<MovieSummary>,
    pub total_pages: u32,
    pub current_page: u32,
}

/// Accumulated list view state, persisted across navigation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListState {
    pub mood: String,
    pub movies: Vec<MovieSummary>,
    pub current_page: u32,
    pub total_pages: u32,
}

impl ListState {
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub runtime: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub content_rating: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub director: Option<Director>,
    #[serde(default)]
    pub writers: Vec<Writer>,
    #[serde(default)]
    pub trailer: Option<Video>,
    #[serde(default)]
    pub teaser: Option<Video>,
    #[serde(default)]
    pub similar_movies: Vec<SimilarMovie>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub known_for_department: String,
    #[serde(default)]
    pub notable_movies: Vec<NotableMovie>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotableMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub popularity: f64,
}

impl NotableMovie {
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .split('-')
            .next()
            .filter(|year| !year.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Director {
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Writer {
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub name: String,
    pub key: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Video {
    /// Videos are hosted on YouTube, keyed by `key`.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub rating: f64,
}

/// Size prefixes understood by the image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Profile,
    Poster,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Profile => "w185",
            ImageSize::Poster => "w500",
            ImageSize::Original => "original",
        }
    }
}

/// Qualify a relative image path against the CDN. Absolute URLs pass through.
pub fn image_url(base: &str, size: ImageSize, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let path = path.trim_start_matches('/');
    format!("{}/{}/{}", base.trim_end_matches('/'), size.as_str(), path)
}
