//! Tavily Client
//!
//! Thin wrapper over the Tavily `/search` endpoint. The response body is
//! returned as-is; nothing here interprets individual results.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use super::SearchProvider;
use crate::types::{AppError, AppResult};

pub const TAVILY_API_BASE: &str = "https://api.tavily.com";

#[derive(Debug, Serialize)]
struct TavilySearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    topic: &'a str,
    include_answer: bool,
    include_raw_content: bool,
}

/// Tavily client for web search
pub struct TavilyClient {
    client: Client,
    api_key: String,
    api_base: String,
    max_results: usize,
    topic: String,
    include_answer: bool,
    include_raw_content: bool,
}

impl TavilyClient {
    /// Create a new Tavily client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: TAVILY_API_BASE.to_string(),
            max_results: 5,
            topic: "general".to_string(),
            include_answer: true,
            include_raw_content: false,
        }
    }

    /// Configure client from config
    pub fn from_config(config: &crate::config::SearchConfig) -> AppResult<Self> {
        if config.tavily_api_key.is_empty() {
            return Err(AppError::Config("TAVILY_API_KEY not configured".to_string()));
        }

        let mut client = Self::new(config.tavily_api_key.clone())
            .with_topic(config.topic.clone())
            .with_answer(config.include_answer)
            .with_raw_content(config.include_raw_content);

        if let Some(base) = &config.api_base {
            client = client.with_api_base(base);
        }

        Ok(client)
    }

    /// Set maximum results per search
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Ask Tavily for a generated short answer alongside results
    pub fn with_answer(mut self, enabled: bool) -> Self {
        self.include_answer = enabled;
        self
    }

    /// Include the cleaned page content of each result
    pub fn with_raw_content(mut self, enabled: bool) -> Self {
        self.include_raw_content = enabled;
        self
    }

    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str) -> AppResult<serde_json::Value> {
        info!(query = %query, "Searching via Tavily");

        let body = TavilySearchRequest {
            query,
            max_results: self.max_results,
            topic: &self.topic,
            include_answer: self.include_answer,
            include_raw_content: self.include_raw_content,
        };

        let response = self
            .client
            .post(format!("{}/search", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Search(format!("Tavily error ({}): {}", status, error_text)));
        }

        let results: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse search results: {}", e)))?;

        debug!(
            count = results.get("results").and_then(|r| r.as_array()).map(|r| r.len()),
            "Tavily search completed"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use mockito::Matcher;

    #[test]
    fn test_from_config_requires_key() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert!(matches!(
            TavilyClient::from_config(&config.search),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_from_config_applies_flags() {
        let config = Config::from_lookup(|key| match key {
            "TAVILY_API_KEY" => Some("tvly-test".to_string()),
            "SEARCH_TOPIC" => Some("news".to_string()),
            "SEARCH_INCLUDE_RAW_CONTENT" => Some("true".to_string()),
            _ => None,
        })
        .unwrap();

        let client = TavilyClient::from_config(&config.search).unwrap().with_max_results(4);
        assert_eq!(client.max_results(), 4);
        assert_eq!(client.topic, "news");
        assert!(client.include_answer);
        assert!(client.include_raw_content);
        assert_eq!(client.api_base, TAVILY_API_BASE);
    }

    #[tokio::test]
    async fn test_search_returns_raw_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .match_header("authorization", "Bearer tvly-test")
            .match_body(Matcher::Json(serde_json::json!({
                "query": "rust async runtimes",
                "max_results": 3,
                "topic": "general",
                "include_answer": true,
                "include_raw_content": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"answer": "tokio", "results": [{"title": "Tokio", "url": "https://tokio.rs", "content": "runtime"}]}"#)
            .create_async()
            .await;

        let client = TavilyClient::new("tvly-test")
            .with_api_base(&server.url())
            .with_max_results(3);
        let results = client.search("rust async runtimes").await.unwrap();

        mock.assert_async().await;
        assert_eq!(results["answer"], "tokio");
        assert_eq!(results["results"][0]["url"], "https://tokio.rs");
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/search")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = TavilyClient::new("tvly-test").with_api_base(&server.url());
        let err = client.search("anything").await.unwrap_err();
        assert!(matches!(err, AppError::Search(ref m) if m.contains("429")));
    }
}
