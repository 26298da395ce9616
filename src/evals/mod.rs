//! Report Evaluation
//!
//! Scores a finished report three ways:
//!
//! - **Structure**: section headers, bracketed citations, links under Sources
//! - **Grounding**: query keywords present, sources section with links
//! - **Judge**: an LLM rates relevance, grounding, depth and clarity (1-5)
//!
//! The heuristic checks are advisory. Nothing here gates on them.

pub mod grounding;
pub mod judge;
pub mod structure;

pub use grounding::eval_grounding;
pub use judge::{llm_judge_report, parse_judge_response, JudgeScores};
pub use structure::eval_structure;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::agents::ResearchPipeline;
use crate::config::AgentConfig;
use crate::llm::LLMAdapter;
use crate::types::AppResult;

/// Check name → passed.
pub type CheckMap = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub query: String,
    pub report: String,
    pub structure_checks: CheckMap,
    pub grounding_checks: CheckMap,
    pub judge_scores: JudgeScores,
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Generated Report ===\n")?;
        writeln!(f, "{}", self.report)?;

        writeln!(f, "\n=== Heuristic Checks ===")?;
        for (name, passed) in self.structure_checks.iter().chain(&self.grounding_checks) {
            writeln!(f, "{}: {}", name, passed)?;
        }

        let scores = &self.judge_scores;
        writeln!(f, "\n=== LLM-as-a-Judge Scores (scale: 1 = very poor, 5 = excellent) ===")?;
        writeln!(f, "relevance: {:?}", scores.relevance)?;
        writeln!(f, "grounding: {:?}", scores.grounding)?;
        writeln!(f, "analysis_depth: {:?}", scores.analysis_depth)?;
        writeln!(f, "clarity: {:?}", scores.clarity)?;
        writeln!(f, "overall: {:?}", scores.overall)?;
        writeln!(f, "justification: {}", scores.justification)?;

        write!(f, "\n{}", "=".repeat(80))
    }
}

/// Runs the research pipeline and scores what it produces.
pub struct Evaluator {
    pipeline: ResearchPipeline,
    judge: Arc<dyn LLMAdapter>,
    judge_model: String,
}

impl Evaluator {
    pub fn new(pipeline: ResearchPipeline, judge: Arc<dyn LLMAdapter>, judge_model: impl Into<String>) -> Self {
        Self {
            pipeline,
            judge,
            judge_model: judge_model.into(),
        }
    }

    pub async fn run_all_evals(&self, query: &str, config: Arc<AgentConfig>) -> AppResult<EvaluationResult> {
        let report = self.pipeline.run_research(query, config).await?;
        self.evaluate_report(query, report).await
    }

    /// Score an already generated report.
    pub async fn evaluate_report(&self, query: &str, report: String) -> AppResult<EvaluationResult> {
        let structure_checks = eval_structure(&report);
        let grounding_checks = eval_grounding(&report, query);
        let judge_scores = llm_judge_report(self.judge.as_ref(), &self.judge_model, &report, query).await?;

        info!(
            passed_checks = structure_checks.values().chain(grounding_checks.values()).filter(|p| **p).count(),
            overall = judge_scores.overall,
            "Evaluation complete"
        );

        Ok(EvaluationResult {
            query: query.to_string(),
            report,
            structure_checks,
            grounding_checks,
            judge_scores,
        })
    }
}
