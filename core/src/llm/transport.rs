//! HTTP Transport for LLM Adapters
//!
//! Concrete transport enum over the reqwest client and the test fake.

use async_trait::async_trait;

pub use crate::llm::transport_fake::{FakeTransport, RecordedRequest};
pub use crate::llm::transport_reqwest::ReqwestTransport;
pub use crate::llm::transport_types::{AdapterError, HttpTransport};

#[derive(Debug)]
pub enum Transport {
    Real(ReqwestTransport),
    Fake(FakeTransport),
}

#[async_trait]
impl HttpTransport for Transport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError> {
        match self {
            Transport::Real(t) => t.post_json(url, headers, body).await,
            Transport::Fake(t) => t.post_json(url, headers, body).await,
        }
    }
}
