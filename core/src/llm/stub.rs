//! Stub Adapter
//!
//! Offline adapter that answers without network calls. Used for tests and
//! for running the service without a credential.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::llm::{AdapterError, LlmAdapter};

#[derive(Debug)]
pub struct StubAdapter {
    response: String,
    failure: Option<AdapterError>,
    prompts: Mutex<Vec<String>>,
}

impl StubAdapter {
    /// Create new stub adapter with default canned response
    pub fn new() -> Self {
        Self::with_response(Self::default_response())
    }

    /// Create stub adapter with custom response
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            failure: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create stub adapter that fails every request
    pub fn failing(error: AdapterError) -> Self {
        Self {
            response: String::new(),
            failure: Some(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn default_response() -> String {
        "Thank you for taking a moment to reflect. What you wrote matters, and noticing \
         how you feel is already a caring step. Be gentle with yourself today."
            .to_string()
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for StubAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmAdapter for StubAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, AdapterError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.response.clone()),
        }
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_records_prompts() {
        let stub = StubAdapter::with_response("ok");
        assert_eq!(stub.generate("first").await.unwrap(), "ok");
        assert_eq!(stub.generate("second").await.unwrap(), "ok");
        assert_eq!(stub.prompts(), vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn test_stub_failing() {
        let stub = StubAdapter::failing(AdapterError::Network("down".to_string()));
        assert_eq!(
            stub.generate("x").await,
            Err(AdapterError::Network("down".to_string()))
        );
        assert_eq!(stub.prompts().len(), 1);
    }
}
