//! Run State
//!
//! The accumulating record of one pipeline execution. Stages take the state
//! by value and hand back a state whose log is the old log plus whatever they
//! appended; there is no way to remove or rewrite a message.

use std::sync::Arc;

use crate::config::AgentConfig;
use crate::types::LLMMessage;

#[derive(Debug, Clone)]
pub struct RunState {
    messages: Vec<LLMMessage>,
    query: String,
    config: Arc<AgentConfig>,
}

impl RunState {
    /// Seed a run with the query as its only user message.
    pub fn new(query: impl Into<String>, config: Arc<AgentConfig>) -> Self {
        let query = query.into();
        Self {
            messages: vec![LLMMessage::user(query.clone())],
            query,
            config,
        }
    }

    pub fn messages(&self) -> &[LLMMessage] {
        &self.messages
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn with_message(mut self, message: LLMMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_messages(mut self, messages: impl IntoIterator<Item = LLMMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Most recently appended assistant message, if any.
    pub fn last_assistant(&self) -> Option<&LLMMessage> {
        self.messages.iter().rev().find(|m| m.is_assistant())
    }
}
