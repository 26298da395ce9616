//! Writer Agent
//!
//! Synthesizes the final report from the whole run log. This is the last
//! step in the pipeline.

use tracing::info;

use crate::agents::state::RunState;
use crate::config::DEFAULT_SYSTEM_PROMPT;
use crate::llm::LLMAdapter;
use crate::types::{AppResult, LLMMessage, LLMRequest};

pub const WRITER_TEMPERATURE: f32 = 0.2;

pub struct WriterAgent;

impl WriterAgent {
    /// Append the report to the run log.
    pub async fn run(state: RunState, llm: &dyn LLMAdapter) -> AppResult<RunState> {
        info!(
            context_messages = state.messages().len(),
            "Writing final report"
        );

        let request = Self::build_request(&state);
        let response = llm.create_chat_completion(&request).await?;

        info!(report_len = response.content.len(), "Report written");
        Ok(state.with_message(response.into_message()))
    }

    /// System instructions, the full log in order, then the closing request.
    fn build_request(state: &RunState) -> LLMRequest {
        let mut messages = Vec::with_capacity(state.messages().len() + 2);
        messages.push(LLMMessage::system(Self::system_prompt(state)));
        messages.extend(state.messages().iter().cloned());
        messages.push(LLMMessage::user(Self::final_prompt(state.query())));

        LLMRequest::new(state.config().model.clone(), messages).with_temperature(WRITER_TEMPERATURE)
    }

    fn system_prompt(state: &RunState) -> &str {
        let prompt = state.config().system_prompt.as_str();
        if prompt.trim().is_empty() {
            DEFAULT_SYSTEM_PROMPT
        } else {
            prompt
        }
    }

    fn final_prompt(query: &str) -> String {
        format!("Original user query:\n{}\n\nWrite the final report now.", query)
    }
}
