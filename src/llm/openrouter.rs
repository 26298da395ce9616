// OpenRouter speaks the OpenAI chat-completions protocol.

use crate::llm::provider::LLMAdapter;
use crate::types::{AppResult, LLMRequest, LLMResponse};
use async_trait::async_trait;

pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

pub struct OpenRouterAdapter {
    inner: crate::llm::openai::OpenAIAdapter,
}

impl OpenRouterAdapter {
    pub fn new(api_key: &str) -> Self {
        Self {
            inner: crate::llm::openai::OpenAIAdapter::new_with_api_base(api_key, OPENROUTER_API_BASE),
        }
    }
}

#[async_trait]
impl LLMAdapter for OpenRouterAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.inner.create_chat_completion(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base() {
        assert_eq!(OPENROUTER_API_BASE, "https://openrouter.ai/api/v1");
        assert_eq!(crate::llm::groq::GROQ_API_BASE, "https://api.groq.com/openai/v1");
    }
}
