// Scripted service fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::llm::LLMAdapter;
use crate::search::SearchProvider;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, TokenUsage};

/// Replays canned completions in order and records every request.
pub struct ScriptedLLM {
    responses: Mutex<VecDeque<AppResult<String>>>,
    requests: Mutex<Vec<LLMRequest>>,
}

impl ScriptedLLM {
    pub fn new<'a>(responses: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.to_string())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(AppError::LLMApi(message.to_string()))])),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMAdapter for ScriptedLLM {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::LLMApi("no scripted response left".to_string())));

        next.map(|content| LLMResponse {
            content,
            finish_reason: "stop".to_string(),
            usage: TokenUsage::default(),
        })
    }
}

/// Answers every query with a small deterministic payload, optionally
/// failing on the nth call (0-based).
pub struct ScriptedSearch {
    queries: Mutex<Vec<String>>,
    fail_on: Option<usize>,
}

impl ScriptedSearch {
    pub fn new() -> Self {
        Self {
            queries: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            queries: Mutex::new(Vec::new()),
            fail_on: Some(call),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for ScriptedSearch {
    async fn search(&self, query: &str) -> AppResult<serde_json::Value> {
        let call = {
            let mut queries = self.queries.lock().unwrap();
            queries.push(query.to_string());
            queries.len() - 1
        };

        if self.fail_on == Some(call) {
            return Err(AppError::Search(format!("scripted failure for {:?}", query)));
        }

        Ok(json!({
            "query": query,
            "results": [{
                "title": format!("About {}", query),
                "url": format!("https://example.com/{}", call + 1),
                "content": format!("Findings on {}", query),
            }]
        }))
    }
}
