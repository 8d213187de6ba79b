//! Transport types
//!
//! Error type and transport trait shared by the real and fake transports.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// Adapter errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// Network error (connection refused, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP error (non-2xx status)
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Invalid response from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider refused to answer (safety filters and the like)
    #[error("Response blocked by provider: {0}")]
    Blocked(String),

    /// Provider-specific error (see response body)
    #[error("Provider error: {code} - {message}")]
    Provider { code: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Json(err.to_string())
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Network(format!("request timed out: {}", err))
        } else if let Some(status) = err.status() {
            AdapterError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            AdapterError::Network(err.to_string())
        }
    }
}

/// Longest error body excerpt carried in an error message
const MAX_ERROR_BODY: usize = 300;

/// Map an HTTP status and body to an error, or `Ok` for 2xx
pub fn check_status(status: u16, body: &str) -> Result<(), AdapterError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = error_message_from_body(body);
    match status {
        401 | 403 => Err(AdapterError::Authentication(message)),
        429 => Err(AdapterError::RateLimited(message)),
        _ => Err(AdapterError::Http { status, message }),
    }
}

/// Pull `error.message` out of a JSON error body, falling back to the raw text
fn error_message_from_body(body: &str) -> String {
    let from_json = serde_json::from_str::<JsonValue>(body).ok().and_then(|json| {
        json.get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    });
    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().chars().take(MAX_ERROR_BODY).collect(),
    }
}

/// Asynchronous HTTP transport
///
/// Abstraction over the HTTP client so adapters can be tested with `FakeTransport`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST JSON request and return the response body
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status_success() {
        assert!(check_status(200, "{}").is_ok());
        assert!(check_status(204, "").is_ok());
    }

    #[test]
    fn test_check_status_auth() {
        let body = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(
            check_status(403, body),
            Err(AdapterError::Authentication("API key not valid".to_string()))
        );
        assert!(matches!(
            check_status(401, ""),
            Err(AdapterError::Authentication(_))
        ));
    }

    #[test]
    fn test_check_status_rate_limited() {
        assert!(matches!(
            check_status(429, "slow down"),
            Err(AdapterError::RateLimited(msg)) if msg == "slow down"
        ));
    }

    #[test]
    fn test_check_status_other() {
        assert_eq!(
            check_status(500, ""),
            Err(AdapterError::Http {
                status: 500,
                message: "empty response body".to_string()
            })
        );
    }

    #[test]
    fn test_adapter_error_display() {
        let err = AdapterError::Network("test".to_string());
        assert_eq!(format!("{}", err), "Network error: test");

        let err = AdapterError::Http {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(format!("{}", err), "HTTP error 404: not found");
    }
}
