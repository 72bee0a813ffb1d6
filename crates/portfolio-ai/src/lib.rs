//! Chat-completion access and the advisors built on top of it.
//!
//! Model output is treated exactly like a third-party API response: it is
//! parsed and validated before use, and anything else yields the advisor's
//! static payload.

pub mod advisor;
pub mod companion;
pub mod learning_suggestions;
pub mod llm_factory;
pub mod llm_provider;
pub mod openai_provider;
pub mod progress_analysis;

pub use llm_factory::LLMProviderFactory;
pub use llm_provider::*;
pub use openai_provider::{OpenAIConfig, OpenAIProvider};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::llm_provider::*;
    use anyhow::anyhow;
    use async_trait::async_trait;

    /// Answers every request with the same text.
    pub struct StaticProvider {
        reply: String,
    }

    impl StaticProvider {
        pub fn new(reply: impl Into<String>) -> Self {
            Self {
                reply: reply.into(),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for StaticProvider {
        async fn generate_chat(
            &self,
            _messages: &[Message],
            _config: &GenerationConfig,
        ) -> LLMResult<LLMResponse> {
            Ok(LLMResponse {
                content: self.reply.clone(),
                model: "static".to_string(),
                finish_reason: Some("stop".to_string()),
                total_tokens: None,
            })
        }

        fn provider_name(&self) -> &str {
            "static"
        }

        fn model_name(&self) -> &str {
            "static"
        }
    }

    pub struct FailingProvider;

    #[async_trait]
    impl LLMProvider for FailingProvider {
        async fn generate_chat(
            &self,
            _messages: &[Message],
            _config: &GenerationConfig,
        ) -> LLMResult<LLMResponse> {
            Err(anyhow!("connection refused"))
        }

        fn provider_name(&self) -> &str {
            "failing"
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }
}
