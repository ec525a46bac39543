//! Search-based findings for each top-level topic.

use super::{SearchFinding, WebSearch};
use crate::error::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Parse the numbered top-level topics out of a keypoint list.
///
/// Only lines starting with a digit and containing a period count; the topic
/// is the text after the first period. Subtopic lines are ignored.
pub fn parse_topics(keypoints: &str) -> Vec<String> {
    keypoints
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(|c: char| c.is_ascii_digit()) && line.contains('.'))
        .filter_map(|line| line.split_once('.'))
        .map(|(_, topic)| {
            topic
                .trim()
                .trim_matches(|c: char| c == '*' || c == '_')
                .trim()
                .to_string()
        })
        .filter(|topic| !topic.is_empty())
        .collect()
}

/// Flatten a provider response into a list of result items.
///
/// Accepts an object with a `results` array, a bare array, an object whose
/// `content` is a JSON-encoded string, or a JSON-encoded string. Anything
/// else yields no items.
pub fn normalize_results(response: &Value) -> Vec<Value> {
    match response {
        Value::Array(items) => items.clone(),
        Value::Object(map) => {
            if let Some(Value::Array(items)) = map.get("results") {
                items.clone()
            } else if let Some(Value::String(content)) = map.get("content") {
                decode_embedded(content)
            } else {
                Vec::new()
            }
        }
        Value::String(encoded) => decode_embedded(encoded),
        _ => Vec::new(),
    }
}

fn decode_embedded(encoded: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(encoded) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => normalize_results(&value),
        _ => Vec::new(),
    }
}

fn finding_from(topic: &str, item: &Value) -> Option<SearchFinding> {
    let text_field = |key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let information = text_field("snippet").or_else(|| text_field("content"))?;
    let url = text_field("url")?;

    Some(SearchFinding {
        topic: topic.to_string(),
        information: information.to_string(),
        url: url.to_string(),
    })
}

/// Runs one web search per topic, in sequence.
pub struct SearchSummarizer {
    search: Arc<dyn WebSearch>,
    max_results: u32,
}

impl SearchSummarizer {
    pub fn new(search: Arc<dyn WebSearch>, max_results: u32) -> Self {
        Self {
            search,
            max_results: max_results.max(1),
        }
    }

    /// Collect findings for the numbered topics in `keypoints`.
    ///
    /// Returns `None` when no topic produced a usable result. Search provider
    /// errors are returned.
    #[instrument(skip(self, keypoints))]
    pub async fn summarize(&self, keypoints: &str) -> Result<Option<Vec<SearchFinding>>> {
        let topics = parse_topics(keypoints);
        info!("Searching the web for {} topics", topics.len());

        let mut findings = Vec::new();
        for topic in &topics {
            let response = self.search.search(topic, self.max_results).await?;
            let items = normalize_results(&response);
            debug!("'{}': {} results", topic, items.len());

            findings.extend(items.iter().filter_map(|item| finding_from(topic, item)));
        }

        if findings.is_empty() {
            Ok(None)
        } else {
            Ok(Some(findings))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecapError;
    use crate::testing::StaticSearch;
    use serde_json::json;

    #[test]
    fn test_parse_topics_ignores_subtopics() {
        let keypoints = "1. Neural networks\n  - backpropagation\n  - activation functions\n2. **Gradient descent**\n\nSummary line\n10. Regularization. L1 and L2";
        assert_eq!(
            parse_topics(keypoints),
            vec!["Neural networks", "Gradient descent", "Regularization. L1 and L2"]
        );
    }

    #[test]
    fn test_parse_topics_edge_cases() {
        assert!(parse_topics("").is_empty());
        assert!(parse_topics("  - backpropagation").is_empty());
        assert!(parse_topics("1.").is_empty());
        assert!(parse_topics("2024 was a good year").is_empty());
    }

    #[test]
    fn test_normalize_object_with_results() {
        let response = json!({"query": "q", "results": [{"url": "u", "content": "c"}]});
        assert_eq!(normalize_results(&response).len(), 1);
    }

    #[test]
    fn test_normalize_raw_list_and_encoded_content() {
        let list = json!([{"url": "a"}, {"url": "b"}]);
        assert_eq!(normalize_results(&list).len(), 2);

        let encoded = json!({"content": "{\"results\": [{\"url\": \"a\", \"content\": \"x\"}]}"});
        assert_eq!(normalize_results(&encoded).len(), 1);

        let string = Value::String("[{\"url\": \"a\"}]".to_string());
        assert_eq!(normalize_results(&string).len(), 1);
    }

    #[test]
    fn test_normalize_unknown_shapes() {
        assert!(normalize_results(&json!(null)).is_empty());
        assert!(normalize_results(&json!({"answer": "42"})).is_empty());
        assert!(normalize_results(&json!({"content": "not json"})).is_empty());
        assert!(normalize_results(&json!(3)).is_empty());
    }

    #[test]
    fn test_finding_requires_text_and_url() {
        let snippet = json!({"snippet": "from snippet", "content": "from content", "url": "https://a"});
        assert_eq!(finding_from("t", &snippet).unwrap().information, "from snippet");

        let content = json!({"content": "from content", "url": "https://a"});
        assert_eq!(finding_from("t", &content).unwrap().information, "from content");

        assert!(finding_from("t", &json!({"content": "no url"})).is_none());
        assert!(finding_from("t", &json!({"content": "", "url": "https://a"})).is_none());
    }

    #[tokio::test]
    async fn test_searches_each_topic_in_order() {
        let search = StaticSearch::new(json!({"results": [
            {"title": "A", "url": "https://example.com/a", "content": "about a"},
            {"title": "B", "url": "", "content": "missing url"}
        ]}));
        let summarizer = SearchSummarizer::new(search.clone(), 3);

        let findings = summarizer
            .summarize("1. Neural networks\n  - backpropagation\n2. Optimizers")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(search.queries(), vec!["Neural networks", "Optimizers"]);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].topic, "Neural networks");
        assert_eq!(findings[1].url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_no_results_is_none() {
        let search = StaticSearch::new(json!({"results": []}));
        let summarizer = SearchSummarizer::new(search, 3);
        let findings = tokio_test::assert_ok!(summarizer.summarize("1. Topic").await);
        assert_eq!(findings, None);

        let summarizer = SearchSummarizer::new(StaticSearch::new(json!([])), 3);
        assert_eq!(summarizer.summarize("no numbered lines").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let summarizer = SearchSummarizer::new(StaticSearch::failing(), 3);
        assert!(matches!(
            summarizer.summarize("1. Topic").await,
            Err(RecapError::Search(_))
        ));
    }
}
