//! Agent System
//!
//! The research pipeline is three stages over a shared, append-only run log:
//!
//! - **Planning Agent**: decomposes the query into numbered search questions
//! - **Web Search Agent**: runs one search per question, in order
//! - **Writer Agent**: synthesizes a cited five-section report
//!
//! ## Pipeline Overview
//!
//! ```text
//! User Query
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Planning   │  → Appends numbered sub-questions
//! │   Agent     │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │ Web Search  │  → Appends one [Search Result i] block per question
//! │   Agent     │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Writer    │  → Appends the report
//! │   Agent     │
//! └─────────────┘
//!      │
//!      ▼
//!   Report
//! ```

pub mod planning;
pub mod state;
pub mod web_search;
pub mod writer;

pub use planning::PlanningAgent;
pub use state::RunState;
pub use web_search::{extract_subquestions, WebSearchAgent};
pub use writer::WriterAgent;

use std::sync::Arc;
use tracing::info;

use crate::config::AgentConfig;
use crate::llm::LLMAdapter;
use crate::search::SearchProvider;
use crate::types::AppResult;

/// Returned by [`extract_report`] when the run log holds no assistant message.
pub const NO_REPORT: &str = "No report generated.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Planning,
    Searching,
    Writing,
}

impl PipelineStage {
    /// Fixed execution order.
    pub const SCHEDULE: [PipelineStage; 3] = [
        PipelineStage::Planning,
        PipelineStage::Searching,
        PipelineStage::Writing,
    ];
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Planning => write!(f, "planning"),
            PipelineStage::Searching => write!(f, "searching"),
            PipelineStage::Writing => write!(f, "writing"),
        }
    }
}

/// Caller-owned service handles for running the pipeline.
#[derive(Clone)]
pub struct ResearchPipeline {
    llm: Arc<dyn LLMAdapter>,
    search: Arc<dyn SearchProvider>,
}

impl ResearchPipeline {
    pub fn new(llm: Arc<dyn LLMAdapter>, search: Arc<dyn SearchProvider>) -> Self {
        Self { llm, search }
    }

    /// Execute planning, search and writing and return the final state.
    /// The first failing external call aborts the run.
    pub async fn run(&self, query: &str, config: Arc<AgentConfig>) -> AppResult<RunState> {
        info!(
            query_len = query.len(),
            model = %config.model,
            num_searches = config.num_searches,
            "Starting research pipeline"
        );

        let mut state = RunState::new(query, config);
        for stage in PipelineStage::SCHEDULE {
            let before = state.messages().len();
            state = match stage {
                PipelineStage::Planning => PlanningAgent::run(state, self.llm.as_ref()).await?,
                PipelineStage::Searching => WebSearchAgent::run(state, self.search.as_ref()).await?,
                PipelineStage::Writing => WriterAgent::run(state, self.llm.as_ref()).await?,
            };
            info!(
                stage = %stage,
                appended = state.messages().len() - before,
                "Stage complete"
            );
        }

        info!(message_count = state.messages().len(), "Research pipeline complete");
        Ok(state)
    }

    /// Run the pipeline and return only the report text.
    pub async fn run_research(&self, query: &str, config: Arc<AgentConfig>) -> AppResult<String> {
        let state = self.run(query, config).await?;
        Ok(extract_report(&state))
    }
}

/// Content of the last assistant message, or [`NO_REPORT`].
pub fn extract_report(state: &RunState) -> String {
    state
        .last_assistant()
        .map(|m| m.content.clone())
        .unwrap_or_else(|| NO_REPORT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedLLM, ScriptedSearch};
    use crate::types::{AppError, Role};

    const PLAN: &str = "1. What is perovskite?\n2. Efficiency records\n3. Stability issues";
    const REPORT: &str = "1. Executive Summary\n- perovskites [1]\n5. Sources\n1. https://example.com/1";

    fn pipeline(llm: Arc<ScriptedLLM>, search: Arc<ScriptedSearch>) -> ResearchPipeline {
        ResearchPipeline::new(llm, search)
    }

    #[tokio::test]
    async fn test_full_run_appends_in_stage_order() {
        let llm = Arc::new(ScriptedLLM::new([PLAN, REPORT]));
        let search = Arc::new(ScriptedSearch::new());
        let config = Arc::new(AgentConfig::new("m", 2, None).unwrap());

        let state = pipeline(llm.clone(), search.clone())
            .run("perovskite solar cells", config)
            .await
            .unwrap();

        // seed + plan + 2 searches + report
        assert_eq!(state.messages().len(), 5);
        assert_eq!(state.messages()[0].role, Role::User);
        assert_eq!(state.messages()[1].content, PLAN);
        assert!(state.messages()[2].content.starts_with("[Search Result 1]"));
        assert!(state.messages()[3].content.starts_with("[Search Result 2]"));
        assert_eq!(state.messages()[4].content, REPORT);
        assert_eq!(search.queries(), ["What is perovskite?", "Efficiency records"]);

        // writer sees system + 4 prior messages + closing prompt
        let requests = llm.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].messages.len(), 6);
    }

    #[tokio::test]
    async fn test_run_research_returns_report() {
        let llm = Arc::new(ScriptedLLM::new([PLAN, REPORT]));
        let search = Arc::new(ScriptedSearch::new());

        let report = pipeline(llm, search)
            .run_research("perovskite solar cells", Arc::new(AgentConfig::default()))
            .await
            .unwrap();
        assert_eq!(report, REPORT);
    }

    #[tokio::test]
    async fn test_search_failure_aborts_before_writer() {
        let llm = Arc::new(ScriptedLLM::new([PLAN, REPORT]));
        let search = Arc::new(ScriptedSearch::failing_on(0));

        let result = pipeline(llm.clone(), search)
            .run("q", Arc::new(AgentConfig::default()))
            .await;

        assert!(matches!(result, Err(AppError::Search(_))));
        assert_eq!(llm.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_planner_failure_aborts_run() {
        let llm = Arc::new(ScriptedLLM::failing("down"));
        let search = Arc::new(ScriptedSearch::new());

        let result = pipeline(llm, search.clone())
            .run("q", Arc::new(AgentConfig::default()))
            .await;

        assert!(matches!(result, Err(AppError::LLMApi(_))));
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_each_stage_only_grows_the_log() {
        let llm = ScriptedLLM::new([PLAN, REPORT]);
        let search = ScriptedSearch::new();
        let initial = RunState::new("q", Arc::new(AgentConfig::default()));

        let planned = PlanningAgent::run(initial.clone(), &llm).await.unwrap();
        let searched = WebSearchAgent::run(planned.clone(), &search).await.unwrap();
        let written = WriterAgent::run(searched.clone(), &llm).await.unwrap();

        for (before, after) in [(&initial, &planned), (&planned, &searched), (&searched, &written)] {
            assert!(after.messages().len() >= before.messages().len());
            assert_eq!(&after.messages()[..before.messages().len()], before.messages());
        }
    }

    #[test]
    fn test_extract_report_sentinel() {
        let state = RunState::new("q", Arc::new(AgentConfig::default()));
        assert_eq!(extract_report(&state), NO_REPORT);
    }

    #[test]
    fn test_extract_report_takes_last_assistant() {
        let state = RunState::new("q", Arc::new(AgentConfig::default()))
            .with_message(crate::types::LLMMessage::assistant("plan"))
            .with_message(crate::types::LLMMessage::assistant("report"))
            .with_message(crate::types::LLMMessage::user("thanks"));
        assert_eq!(extract_report(&state), "report");
    }

    #[test]
    fn test_schedule_order() {
        let names: Vec<String> = PipelineStage::SCHEDULE.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["planning", "searching", "writing"]);
    }
}
