use std::time::Duration;

use crate::error::{FlowError, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

pub const API_URL_VAR: &str = "MOOD_FLOW_API_URL";
pub const TIMEOUT_VAR: &str = "MOOD_FLOW_TIMEOUT_MS";
pub const IMAGE_BASE_URL_VAR: &str = "MOOD_FLOW_IMAGE_BASE_URL";

/// Configuration for talking to the recommendation service
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub image_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into();
        self
    }

    /// Build a config from `MOOD_FLOW_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR) {
            if url.trim().is_empty() {
                return Err(FlowError::Config(format!("{} is empty", API_URL_VAR)));
            }
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let millis = raw.trim().parse::<u64>().map_err(|e| {
                FlowError::Config(format!("{} must be milliseconds: {}", TIMEOUT_VAR, e))
            })?;
            if millis == 0 {
                return Err(FlowError::Config(format!("{} must be positive", TIMEOUT_VAR)));
            }
            config.timeout = Duration::from_millis(millis);
        }

        if let Some(url) = lookup(IMAGE_BASE_URL_VAR) {
            config.image_base_url = url.trim().to_string();
        }

        Ok(config)
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
