//! Planning Agent
//!
//! Asks the model to decompose the user query into a numbered list of
//! focused web search questions.

use tracing::info;

use crate::agents::state::RunState;
use crate::llm::LLMAdapter;
use crate::types::{AppResult, LLMMessage, LLMRequest};

pub const PLANNER_PROMPT: &str = "You are a research planner. Given a user query, break it into 3–6 \
specific web search questions. Return them as a numbered list.";

pub const PLANNER_TEMPERATURE: f32 = 0.2;

pub struct PlanningAgent;

impl PlanningAgent {
    /// Append the model's numbered plan to the run log.
    pub async fn run(state: RunState, llm: &dyn LLMAdapter) -> AppResult<RunState> {
        info!(query_len = state.query().len(), "Planning sub-questions");

        let request = Self::build_request(&state);
        let response = llm.create_chat_completion(&request).await?;

        info!(response_len = response.content.len(), "Plan generated");
        Ok(state.with_message(response.into_message()))
    }

    fn build_request(state: &RunState) -> LLMRequest {
        LLMRequest::new(
            state.config().model.clone(),
            vec![
                LLMMessage::system(PLANNER_PROMPT),
                LLMMessage::user(state.query()),
            ],
        )
        .with_temperature(PLANNER_TEMPERATURE)
    }
}
