use async_trait::async_trait;
use tracing::debug;

use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMProvider, LLMRequest, LLMResponse};

/// A chat-completion capability: ordered messages in, one message out.
#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for LLM provider (renamed to avoid conflict with LLMProvider enum in types.rs)
#[derive(Debug, Clone)]
pub struct LLMProviderConfig {
    pub provider: LLMProvider,
    pub api_key: String,
    pub api_base: Option<String>,
}

impl LLMProviderConfig {
    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        let api_key = config.active_api_key().ok_or_else(|| {
            AppError::Config(format!("No API key configured for provider {}", config.provider))
        })?;

        Ok(Self {
            provider: config.provider,
            api_key,
            api_base: config.api_base.clone(),
        })
    }
}

pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
    provider: LLMProvider,
}

impl LLM {
    pub fn new(config: LLMProviderConfig) -> Self {
        let adapter: Box<dyn LLMAdapter> = match (config.provider, config.api_base.as_deref()) {
            (_, Some(base)) => Box::new(crate::llm::openai::OpenAIAdapter::new_with_api_base(
                &config.api_key,
                base,
            )),
            (LLMProvider::OpenAI, None) => Box::new(crate::llm::openai::OpenAIAdapter::new(&config.api_key)),
            (LLMProvider::Groq, None) => Box::new(crate::llm::groq::GroqAdapter::new(&config.api_key)),
            (LLMProvider::OpenRouter, None) => {
                Box::new(crate::llm::openrouter::OpenRouterAdapter::new(&config.api_key))
            }
        };

        debug!(provider = %config.provider, "LLM adapter created");

        Self {
            adapter,
            provider: config.provider,
        }
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }
}

#[async_trait]
impl LLMAdapter for LLM {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_provider_config_requires_key() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert!(matches!(
            LLMProviderConfig::from_config(&config.llm),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_llm_keeps_provider() {
        let llm = LLM::new(LLMProviderConfig {
            provider: LLMProvider::Groq,
            api_key: "test-key".to_string(),
            api_base: None,
        });
        assert_eq!(llm.provider(), LLMProvider::Groq);
    }
}
