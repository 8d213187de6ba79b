//! Adapter Factory
//!
//! Creates the feedback adapter from configuration.

use tracing::info;

use crate::config::{FeedbackConfig, FeedbackProvider};
use crate::llm::gemini::GeminiAdapter;
use crate::llm::stub::StubAdapter;
use crate::llm::{Adapter, AdapterError};

/// Create adapter from the `[feedback]` configuration section
pub fn create_adapter(config: &FeedbackConfig) -> Result<Adapter, AdapterError> {
    match config.provider {
        FeedbackProvider::Gemini => {
            let api_key = config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| AdapterError::Configuration("Missing 'api_key' for gemini".to_string()))?;
            let adapter = GeminiAdapter::new(
                config.base_url.clone(),
                config.model.clone(),
                api_key,
                config.timeout_seconds,
            )?
            .with_temperature(config.temperature);
            info!(model = %config.model, base_url = %config.base_url, "using Gemini feedback service");
            Ok(Adapter::Gemini(adapter))
        }
        FeedbackProvider::Stub => {
            info!("using offline stub feedback service");
            let stub = match &config.stub_response {
                Some(response) => StubAdapter::with_response(response.clone()),
                None => StubAdapter::new(),
            };
            Ok(Adapter::Stub(stub))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmAdapter;

    #[test]
    fn test_create_stub_adapter() {
        let config = FeedbackConfig {
            provider: FeedbackProvider::Stub,
            stub_response: Some("canned".to_string()),
            ..FeedbackConfig::default()
        };
        let adapter = create_adapter(&config).unwrap();
        assert_eq!(adapter.provider_name(), "stub");
    }

    #[test]
    fn test_create_gemini_requires_key() {
        let config = FeedbackConfig::default();
        assert!(matches!(
            create_adapter(&config),
            Err(AdapterError::Configuration(_))
        ));
    }

    #[test]
    fn test_create_gemini_adapter() {
        let config = FeedbackConfig {
            api_key: Some("abc".to_string()),
            ..FeedbackConfig::default()
        };
        let adapter = create_adapter(&config).unwrap();
        assert_eq!(adapter.provider_name(), "gemini");
    }
}
