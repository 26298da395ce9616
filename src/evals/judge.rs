//! LLM-as-a-judge scoring.
//!
//! The judge is asked for a bare JSON object. Its reply is parsed
//! leniently; anything unusable collapses to [`JudgeScores::fallback`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::llm::LLMAdapter;
use crate::types::{AppResult, LLMMessage, LLMRequest};

pub const JUDGE_TEMPERATURE: f32 = 0.0;
pub const MISSING_JUSTIFICATION: &str = "No justification provided by judge.";
pub const FALLBACK_JUSTIFICATION: &str = "Failed to parse judge output as JSON.";

/// Score given to a missing rating field.
const DEFAULT_RATING: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeScores {
    pub relevance: f64,
    pub grounding: f64,
    pub analysis_depth: f64,
    pub clarity: f64,
    pub overall: f64,
    pub justification: String,
}

impl JudgeScores {
    pub fn fallback() -> Self {
        Self {
            relevance: 1.0,
            grounding: 1.0,
            analysis_depth: 1.0,
            clarity: 1.0,
            overall: 1.0,
            justification: FALLBACK_JUSTIFICATION.to_string(),
        }
    }
}

#[derive(Debug, Error)]
enum JudgeParseError {
    #[error("no JSON object found in judge output")]
    NoJsonObject,

    #[error("invalid JSON object: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("field {field} is not a number: {value}")]
    NotANumber { field: &'static str, value: Value },
}

pub fn build_judge_prompt(report: &str, query: &str) -> String {
    format!(
        r#"
You are evaluating a research report produced by an AI agent.

User query:
"""{query}"""


Report:
"""{report}"""


Follow these steps internally:
1. Determine how well the report answers the user query.
2. Check whether statements appear grounded in cited sources.
3. Assess depth of analysis beyond surface-level summary.
4. Evaluate clarity, readability, and structure.

Then output only a JSON object, with no extra text, using this schema:

{{
  "relevance": <int 1-5>,
  "grounding": <int 1-5>,
  "analysis_depth": <int 1-5>,
  "clarity": <int 1-5>,
  "justification": "<2-4 concise sentences>"
}}
"#,
        query = query,
        report = report,
    )
}

/// Ask the judge model to score `report`. Only the model call can fail;
/// an unparseable reply yields the fallback scores.
pub async fn llm_judge_report(
    llm: &dyn LLMAdapter,
    model: &str,
    report: &str,
    query: &str,
) -> AppResult<JudgeScores> {
    let request = LLMRequest::new(model, vec![LLMMessage::user(build_judge_prompt(report, query))])
        .with_temperature(JUDGE_TEMPERATURE);

    let response = llm.create_chat_completion(&request).await?;
    let scores = parse_judge_response(&response.content);

    info!(overall = scores.overall, "Judge scored report");
    Ok(scores)
}

pub fn parse_judge_response(text: &str) -> JudgeScores {
    match try_parse(text) {
        Ok(scores) => scores,
        Err(e) => {
            warn!(error = %e, "Falling back to minimum judge scores");
            JudgeScores::fallback()
        }
    }
}

/// Greedy span from the first `{` to the last `}`.
fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn try_parse(text: &str) -> Result<JudgeScores, JudgeParseError> {
    let span = extract_json_span(text).ok_or(JudgeParseError::NoJsonObject)?;
    let data: Map<String, Value> = serde_json::from_str(span)?;

    let relevance = rating(&data, "relevance")?;
    let grounding = rating(&data, "grounding")?;
    let analysis_depth = rating(&data, "analysis_depth")?;
    let clarity = rating(&data, "clarity")?;

    let justification = match data.get("justification") {
        None | Some(Value::Null) => MISSING_JUSTIFICATION.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    Ok(JudgeScores {
        relevance,
        grounding,
        analysis_depth,
        clarity,
        overall: (relevance + grounding + analysis_depth + clarity) / 4.0,
        justification,
    })
}

/// Numbers, numeric strings and booleans coerce; a missing field scores 1.
fn rating(data: &Map<String, Value>, field: &'static str) -> Result<f64, JudgeParseError> {
    let not_a_number = |value: &Value| JudgeParseError::NotANumber {
        field,
        value: value.clone(),
    };

    match data.get(field) {
        None => Ok(DEFAULT_RATING),
        Some(value @ Value::Number(n)) => n.as_f64().ok_or_else(|| not_a_number(value)),
        Some(value @ Value::String(s)) => s.trim().parse::<f64>().map_err(|_| not_a_number(value)),
        Some(Value::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
        Some(other) => Err(not_a_number(other)),
    }
}
