//! Search Module
//!
//! Web search used by the search stage of the research pipeline.
//! The pipeline only sees the [`SearchProvider`] trait; results are an
//! opaque JSON payload forwarded verbatim to the writer.
//!
//! Uses Tavily as the backend.

pub mod tavily;

pub use tavily::TavilyClient;

use crate::types::AppResult;
use async_trait::async_trait;

/// A query → results capability.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> AppResult<serde_json::Value>;
}
