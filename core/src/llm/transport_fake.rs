//! Fake transport for testing
//!
//! Uses fixture strings instead of real HTTP calls and records what was sent.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::llm::transport_types::{check_status, AdapterError, HttpTransport};

/// A request captured by `FakeTransport`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[derive(Debug)]
pub struct FakeTransport {
    /// HTTP status to report
    pub status: u16,
    /// Response body to return
    pub response_body: String,
    /// Network error to return instead of a response (if set)
    pub error_message: Option<String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    /// Create fake transport with given 200 response
    pub fn new(response: &str) -> Self {
        Self::with_status(200, response)
    }

    /// Create fake transport answering with a specific status
    pub fn with_status(status: u16, response: &str) -> Self {
        Self {
            status,
            response_body: response.to_string(),
            error_message: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create fake transport that returns a network error
    pub fn with_error(msg: &str) -> Self {
        Self {
            status: 0,
            response_body: String::new(),
            error_message: Some(msg.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                url: url.to_string(),
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body: body.to_string(),
            });
        }
        if let Some(ref msg) = self.error_message {
            return Err(AdapterError::Network(msg.clone()));
        }
        check_status(self.status, &self.response_body)?;
        Ok(self.response_body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_transport_basic() {
        let transport = FakeTransport::new("test response");
        let result = transport.post_json("http://test", &[], "{}").await;
        assert_eq!(result.unwrap(), "test response");
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(transport.requests()[0].url, "http://test");
    }

    #[tokio::test]
    async fn test_fake_transport_with_error() {
        let transport = FakeTransport::with_error("connection refused");
        let result = transport.post_json("http://test", &[], "{}").await;
        assert_eq!(
            result,
            Err(AdapterError::Network("connection refused".to_string()))
        );
        // Failed attempts are still recorded
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_fake_transport_status_mapping() {
        let transport = FakeTransport::with_status(429, "quota exceeded");
        let result = transport.post_json("http://test", &[], "{}").await;
        assert!(matches!(result, Err(AdapterError::RateLimited(_))));
    }
}
