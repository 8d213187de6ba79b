//! Gemini Adapter
//!
//! Google Generative Language API (`models/{model}:generateContent`).

use async_trait::async_trait;
use tracing::debug;

use crate::llm::transport::{HttpTransport, ReqwestTransport, Transport};
use crate::llm::{AdapterError, LlmAdapter};

pub use crate::llm::gemini_parse::parse_generate_content;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model name
pub const DEFAULT_MODEL: &str = "gemini-pro";

#[derive(Debug)]
pub struct GeminiAdapter {
    /// Base URL (e.g., https://generativelanguage.googleapis.com/v1beta)
    base_url: String,
    /// Model name (e.g., gemini-pro)
    model: String,
    api_key: String,
    temperature: Option<f64>,
    transport: Transport,
}

impl GeminiAdapter {
    /// Create adapter backed by a real HTTP client
    pub fn new(
        base_url: String,
        model: String,
        api_key: String,
        timeout_secs: u64,
    ) -> Result<Self, AdapterError> {
        let transport = Transport::Real(ReqwestTransport::with_timeout(timeout_secs)?);
        Ok(Self::with_transport(base_url, model, api_key, transport))
    }

    /// Create adapter with custom transport (for testing)
    pub fn with_transport(
        base_url: String,
        model: String,
        api_key: String,
        transport: Transport,
    ) -> Self {
        Self {
            base_url,
            model,
            api_key,
            temperature: None,
            transport,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Build `generateContent` request body
    pub fn build_request(&self, prompt: &str) -> String {
        let mut request = serde_json::json!({
            "contents": [
                {"role": "user", "parts": [{"text": prompt}]}
            ]
        });
        if let Some(temperature) = self.temperature {
            request["generationConfig"] = serde_json::json!({ "temperature": temperature });
        }
        request.to_string()
    }
}

#[async_trait]
impl LlmAdapter for GeminiAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, AdapterError> {
        if self.api_key.trim().is_empty() {
            return Err(AdapterError::Configuration("Missing API key".to_string()));
        }
        let url = self.endpoint();
        let body = self.build_request(prompt);
        let headers = [
            ("Content-Type", "application/json"),
            ("x-goog-api-key", self.api_key.as_str()),
        ];

        debug!(model = %self.model, prompt_len = prompt.len(), "requesting Gemini completion");
        let response = self.transport.post_json(&url, &headers, &body).await?;
        parse_generate_content(&response)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}
