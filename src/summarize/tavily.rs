//! Tavily web search client.

use super::WebSearch;
use crate::config::SearchSettings;
use crate::error::{RecapError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: u32,
    search_depth: &'a str,
    include_raw_content: bool,
}

/// Search through the Tavily REST API.
pub struct TavilySearch {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl TavilySearch {
    /// Create a client from settings; the API key must be set.
    pub fn from_settings(settings: &SearchSettings) -> Result<Self> {
        let api_key = settings.api_key().ok_or_else(|| {
            RecapError::Config(format!(
                "Search API key not found. Set the {} environment variable.",
                settings.api_key_env
            ))
        })?;

        let endpoint = search_endpoint(&settings.api_base)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

/// `{api_base}/search`, keeping any path prefix in the base.
fn search_endpoint(api_base: &str) -> Result<Url> {
    let base = format!("{}/", api_base.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|base| base.join("search"))
        .map_err(|e| RecapError::Config(format!("Invalid search API base '{}': {}", api_base, e)))
}

#[async_trait]
impl WebSearch for TavilySearch {
    async fn search(&self, query: &str, max_results: u32) -> Result<serde_json::Value> {
        debug!("Tavily search: {}", query);

        let request = SearchRequest {
            query,
            max_results,
            search_depth: "basic",
            include_raw_content: false,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RecapError::Search(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecapError::Search(format!("{}: {}", status, body.trim())));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| RecapError::Search(format!("invalid response: {}", e)))
    }
}
