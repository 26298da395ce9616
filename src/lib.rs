// Deep Research - plan, search and write cited research reports, then score them

pub mod agents;
pub mod cli;
pub mod config;
pub mod evals;
pub mod llm;
pub mod search;    // Web search (Tavily)
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use agents::{extract_report, ResearchPipeline, RunState, NO_REPORT};
pub use config::{AgentConfig, Config};
pub use evals::{EvaluationResult, Evaluator};
pub use types::{AppError, AppResult};
