use crate::llm_provider::LLMProvider;
use crate::openai_provider::{OpenAIConfig, OpenAIProvider};
use portfolio_core::AiConfig;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info};

/// Factory for creating LLM providers based on configuration
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// `None` when no API key is configured; the advisors then serve their
    /// static payloads.
    pub fn create_from_config(config: &AiConfig, client: Client) -> Option<Arc<dyn LLMProvider>> {
        let Some(api_key) = config.api_key.clone() else {
            debug!("No AI API key configured, advisors will use static responses");
            return None;
        };

        info!("Using chat-completions model {} at {}", config.model, config.base_url);
        Some(Arc::new(OpenAIProvider::new(
            OpenAIConfig {
                base_url: config.base_url.clone(),
                model: config.model.clone(),
                api_key,
            },
            client,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn no_key_means_no_provider() {
        let provider = LLMProviderFactory::create_from_config(&AiConfig::default(), Client::new());
        assert!(provider.is_none());
    }

    #[test]
    fn key_yields_openai_provider() {
        let config = AiConfig {
            api_key: Some(SecretString::from("sk-test".to_string())),
            model: "gpt-test".to_string(),
            ..AiConfig::default()
        };
        let provider = LLMProviderFactory::create_from_config(&config, Client::new()).unwrap();
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model_name(), "gpt-test");
    }
}
