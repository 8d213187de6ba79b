//! Real HTTP transport using reqwest

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::llm::transport_types::{check_status, AdapterError, HttpTransport};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create transport with default timeout (30s)
    pub fn new() -> Result<Self, AdapterError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Create transport with custom timeout
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, AdapterError> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Configuration(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError> {
        debug!(url, body_len = body.len(), timeout = ?self.timeout, "POST");

        let mut request = self.client.post(url).body(body.to_string());
        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!(status, response_len = text.len(), "response received");

        check_status(status, &text)?;
        Ok(text)
    }
}
