//! Topic summaries: one from the model's own knowledge, one from web search.

mod knowledge;
mod search;
mod tavily;

pub use knowledge::KnowledgeSummarizer;
pub use search::{normalize_results, parse_topics, SearchSummarizer};
pub use tavily::TavilySearch;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One search result attached to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFinding {
    pub topic: String,
    pub information: String,
    pub url: String,
}

/// Trait for web search providers.
///
/// Returns the provider's raw JSON so callers can normalize the several
/// shapes providers use.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<serde_json::Value>;
}
