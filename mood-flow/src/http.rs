//! Bounded-timeout HTTP wrapper around `reqwest`.
//!
//! All requests go through [`HttpClient::request`], which is the one place where
//! transport failures and non-2xx responses are turned into [`FlowError`]s:
//!
//! * a request that exceeds the configured timeout (connect, headers or body) → [`FlowError::TimedOut`]
//! * any other transport failure → [`FlowError::Network`]
//! * non-2xx with a JSON object body → [`FlowError::Api`]
//! * non-2xx with anything else → [`FlowError::Http`]
//!
//! The timeout timer belongs to the request future, so it is dropped together
//! with it on success, error and cancellation alike.

use reqwest::{Method, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    config::ClientConfig,
    error::{FlowError, Result},
};

const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FlowError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base().to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and return the response if it is 2xx.
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response> {
        let url = self.url(path);
        debug!(%method, %url, "Fetching");

        let mut builder = self.client.request(method, &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // An unreadable body is treated the same as an undecodable one.
        let body = response.bytes().await.unwrap_or_default();
        let err = decode_error_body(status.as_u16(), &body);
        error!(%url, status = status.as_u16(), "Request failed: {}", err);
        Err(err)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path, None).await?;
        read_json(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.request(Method::POST, path, Some(&body)).await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| FlowError::InvalidPayload(e.to_string()))
}

fn transport_error(err: reqwest::Error) -> FlowError {
    if err.is_timeout() {
        FlowError::TimedOut
    } else {
        FlowError::Network(err.to_string())
    }
}

/// Normalize a non-2xx body into the error taxonomy.
///
/// Accepts both `{error, message, status}` bodies and `{detail}` bodies. The
/// whole decoded body is kept as the error details.
pub fn decode_error_body(status: u16, body: &[u8]) -> FlowError {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            debug!(status, "Failed to parse error response: {}", e);
            return FlowError::Http(status);
        }
    };

    let Some(fields) = value.as_object() else {
        return FlowError::Http(status);
    };

    let string_field = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let detail = fields.get("detail").and_then(|detail| match detail {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    });

    let message = string_field("message")
        .or(detail)
        .or_else(|| string_field("error"))
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

    FlowError::Api {
        status,
        message,
        details: Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_error_body() {
        let body = json!({"error": "bad_request", "message": "Mood is too long", "status": 400});
        let err = decode_error_body(400, body.to_string().as_bytes());
        match err {
            FlowError::Api {
                status,
                message,
                details,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Mood is too long");
                assert_eq!(details, Some(body));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_http_status_wins_over_body_status() {
        let body = json!({"error": "teapot", "message": "Short and stout", "status": 418});
        let err = decode_error_body(400, body.to_string().as_bytes());
        assert_eq!(err.status(), Some(400));
        assert!(matches!(err, FlowError::Api { details: Some(ref d), .. } if d["status"] == 418));
    }

    #[test]
    fn test_detail_error_body() {
        let err = decode_error_body(404, br#"{"detail": "Movie not found"}"#);
        assert!(matches!(err, FlowError::Api { status: 404, ref message, .. } if message == "Movie not found"));

        let err = decode_error_body(422, br#"{"detail": [{"loc": ["body", "mood"]}]}"#);
        assert!(matches!(err, FlowError::Api { ref message, .. } if message.contains("loc")));
    }

    #[test]
    fn test_object_without_known_fields_gets_default_message() {
        let err = decode_error_body(500, br#"{"trace": "x"}"#);
        assert!(matches!(err, FlowError::Api { ref message, .. } if message == DEFAULT_ERROR_MESSAGE));
    }

    #[test]
    fn test_unparseable_body_is_http_error() {
        assert!(matches!(
            decode_error_body(502, b"<html>Bad Gateway</html>"),
            FlowError::Http(502)
        ));
        assert!(matches!(decode_error_body(500, b""), FlowError::Http(500)));
        assert!(matches!(
            decode_error_body(500, b"\"just a string\""),
            FlowError::Http(500)
        ));
    }

    #[test]
    fn test_url_joining() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:8000/")).unwrap();
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
        assert_eq!(
            client.url("recommendations/"),
            "http://localhost:8000/recommendations/"
        );
    }
}
