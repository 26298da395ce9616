use crate::types::{AppError, AppResult, LLMProvider};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4.1";
pub const DEFAULT_NUM_SEARCHES: usize = 4;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a meticulous research assistant.
Using ONLY the information in the previous messages (especially the [Search Result ...] messages),
write a structured report answering the user's query.

Required structure:
1. Executive Summary (3–5 bullet points)
2. Key Findings (with inline citations like [1], [2])
3. Analysis / Discussion
4. Limitations & Open Questions
5. Sources (numbered list with titles and URLs)

If something is uncertain or speculative, say so.";

/// Process-wide settings read from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub llm: LLMConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub openai_api_key: String,
    pub groq_api_key: String,
    pub openrouter_api_key: String,
    pub api_base: Option<String>,
    pub judge_model: String,
}

impl LLMConfig {
    /// API key for the configured provider, if one is set.
    pub fn active_api_key(&self) -> Option<String> {
        let key = match self.provider {
            LLMProvider::OpenAI => &self.openai_api_key,
            LLMProvider::Groq => &self.groq_api_key,
            LLMProvider::OpenRouter => &self.openrouter_api_key,
        };
        if key.is_empty() {
            None
        } else {
            Some(key.clone())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub tavily_api_key: String,
    pub api_base: Option<String>,
    pub topic: String,
    pub include_answer: bool,
    pub include_raw_content: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            llm: LLMConfig {
                provider: LLMProvider::parse(&var("LLM_PROVIDER", "openai"))?,
                openai_api_key: var("OPENAI_API_KEY", ""),
                groq_api_key: var("GROQ_API_KEY", ""),
                openrouter_api_key: var("OPENROUTER_API_KEY", ""),
                api_base: non_empty("LLM_API_BASE"),
                judge_model: var("JUDGE_MODEL", DEFAULT_JUDGE_MODEL),
            },
            search: SearchConfig {
                tavily_api_key: var("TAVILY_API_KEY", ""),
                api_base: non_empty("TAVILY_API_BASE"),
                topic: var("SEARCH_TOPIC", "general"),
                include_answer: parse_bool("SEARCH_INCLUDE_ANSWER", &var("SEARCH_INCLUDE_ANSWER", "true"))?,
                include_raw_content: parse_bool(
                    "SEARCH_INCLUDE_RAW_CONTENT",
                    &var("SEARCH_INCLUDE_RAW_CONTENT", "false"),
                )?,
            },
            logging: LoggingConfig {
                log_dir: non_empty("LOG_DIR"),
            },
        })
    }
}

fn parse_bool(key: &str, value: &str) -> AppResult<bool> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be true or false, got {:?}", key, value)))
}

/// Settings for a single research run. Shared read-only between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub model: String,
    pub num_searches: usize,
    pub system_prompt: String,
}

impl AgentConfig {
    pub fn new(
        model: impl Into<String>,
        num_searches: usize,
        system_prompt: Option<String>,
    ) -> AppResult<Self> {
        if num_searches == 0 {
            return Err(AppError::Config("num_searches must be at least 1".to_string()));
        }

        let system_prompt = system_prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        Ok(Self {
            model: model.into(),
            num_searches,
            system_prompt,
        })
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            num_searches: DEFAULT_NUM_SEARCHES,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}
