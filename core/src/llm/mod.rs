//! LLM Adapters
//!
//! Provider-agnostic interface to the external feedback service.
//! Supports Gemini and an offline stub.

pub mod factory;
pub mod gemini;
pub mod gemini_parse;
pub mod stub;
pub mod transport;
pub mod transport_fake;
pub mod transport_reqwest;
pub mod transport_types;

use async_trait::async_trait;

pub use factory::create_adapter;
pub use transport_types::{AdapterError, HttpTransport};

/// Feedback service interface
///
/// Prompt in, text out. The session manager calls the service through this trait.
#[async_trait]
pub trait LlmAdapter: Send + Sync {
    /// Generate a completion for `prompt`, returning the full response text
    async fn generate(&self, prompt: &str) -> Result<String, AdapterError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}

/// Concrete adapter over all providers
#[derive(Debug)]
pub enum Adapter {
    Gemini(gemini::GeminiAdapter),
    Stub(stub::StubAdapter),
}

#[async_trait]
impl LlmAdapter for Adapter {
    async fn generate(&self, prompt: &str) -> Result<String, AdapterError> {
        match self {
            Adapter::Gemini(a) => a.generate(prompt).await,
            Adapter::Stub(a) => a.generate(prompt).await,
        }
    }

    fn provider_name(&self) -> &str {
        match self {
            Adapter::Gemini(a) => a.provider_name(),
            Adapter::Stub(a) => a.provider_name(),
        }
    }
}
