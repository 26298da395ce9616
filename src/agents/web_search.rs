//! Web Search Agent
//!
//! Turns the planner's numbered list into sub-questions and runs one search
//! per sub-question, strictly in order. Each result payload is appended to
//! the run log verbatim for the writer to interpret.

use tracing::{debug, info};

use crate::agents::state::RunState;
use crate::search::SearchProvider;
use crate::types::{AppError, AppResult, LLMMessage};

pub struct WebSearchAgent;

impl WebSearchAgent {
    /// Search each planned sub-question, up to `num_searches` of them.
    pub async fn run(state: RunState, search: &dyn SearchProvider) -> AppResult<RunState> {
        let plan = state.last_assistant().ok_or_else(|| {
            AppError::Precondition("search stage needs a planner message in the run log".to_string())
        })?;

        let subquestions = extract_subquestions(&plan.content);
        let limit = state.config().num_searches;

        info!(
            extracted = subquestions.len(),
            limit,
            "Running web searches"
        );

        let mut results = Vec::with_capacity(subquestions.len().min(limit));
        for (i, question) in subquestions.iter().take(limit).enumerate() {
            debug!(index = i + 1, question = %question, "Searching sub-question");
            let payload = search.search(question).await?;
            results.push(LLMMessage::assistant(format_search_result(i + 1, question, &payload)));
        }

        info!(results_count = results.len(), "Web searches complete");
        Ok(state.with_messages(results))
    }
}

/// Parse a numbered list into sub-questions.
///
/// Keeps every line whose first non-space character is a digit and that
/// contains a `.`, taking the trimmed text after the first `.`. When nothing
/// matches, the whole trimmed text becomes the single sub-question.
pub fn extract_subquestions(text: &str) -> Vec<String> {
    let questions: Vec<String> = text
        .lines()
        .filter(|line| {
            line.trim_start()
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        })
        .filter_map(|line| line.split_once('.'))
        .map(|(_, rest)| rest.trim().to_string())
        .collect();

    if questions.is_empty() {
        vec![text.trim().to_string()]
    } else {
        questions
    }
}

/// Labeled block the writer cites from. `index` is 1-based.
pub fn format_search_result(index: usize, question: &str, payload: &serde_json::Value) -> String {
    format!("[Search Result {}]\nQuery: {}\nResults:\n{}", index, question, payload)
}
