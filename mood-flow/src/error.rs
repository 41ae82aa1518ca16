use serde_json::Value;
use thiserror::Error;

/// Errors produced by the mood-flow client.
///
/// Every failure the remote service can produce is normalized into one of these
/// variants at the HTTP boundary, so views only ever match on this enum.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Local input check failed; nothing was sent to the server.
    #[error("{0}")]
    Validation(String),

    #[error("No movie ID provided")]
    MissingId,

    /// The health probe reported the service as down.
    #[error("Backend service is unavailable. Please try again later.")]
    ServiceUnavailable,

    #[error("Request timed out")]
    TimedOut,

    /// The server answered non-2xx with a JSON error body.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// The server answered non-2xx and the body could not be decoded.
    #[error("HTTP Error {0}")]
    Http(u16),

    #[error("Failed to fetch data: {0}")]
    Network(String),

    #[error("Invalid movie data received from server: {0}")]
    InvalidPayload(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// What a view should offer the user after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Fix the input and submit again.
    EditInput,
    /// Transient failure, reloading may help.
    Reload,
    /// Nothing to show here; go back to the start page.
    GoHome,
}

impl FlowError {
    /// Single user-visible message for this error.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Api {
                message,
                details: Some(details),
                ..
            } => format!("{}: {}", message, details),
            other => other.to_string(),
        }
    }

    pub fn recovery(&self) -> Recovery {
        match self {
            FlowError::Validation(_) => Recovery::EditInput,
            FlowError::MissingId | FlowError::NotFound(_) | FlowError::InvalidPayload(_) => {
                Recovery::GoHome
            }
            _ => Recovery::Reload,
        }
    }

    /// HTTP status carried by the error, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FlowError::Api { status, .. } | FlowError::Http(status) => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
