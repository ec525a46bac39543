//! Keypoint extraction.
//!
//! Chunks are batched into segments, each segment is sent to the worker model
//! concurrently, and the merged per-segment lists are consolidated by one more
//! call into the final topic list.

use crate::config::{PlanningSettings, Prompts};
use crate::error::{RecapError, Result};
use crate::llm::LanguageModel;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A batch of consecutive chunks sent in one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Position of the segment among all segments, including skipped ones.
    pub index: usize,
    /// Number of chunks in the batch.
    pub chunk_count: usize,
    /// Chunk texts joined with single spaces.
    pub text: String,
}

/// Group chunks into contiguous segments of `segment_size` chunks.
///
/// The last segment may be shorter. Segments whose text is blank are
/// dropped. A `segment_size` of zero uses the default segment size.
pub fn group_segments(chunks: &[String], segment_size: usize) -> Vec<Segment> {
    let size = if segment_size == 0 {
        PlanningSettings::default().default_segment_size
    } else {
        segment_size
    };

    chunks
        .chunks(size)
        .enumerate()
        .map(|(index, batch)| Segment {
            index,
            chunk_count: batch.len(),
            text: batch.join(" "),
        })
        .filter(|segment| !segment.text.trim().is_empty())
        .collect()
}

/// Extracts and consolidates topics from transcript chunks.
pub struct KeypointExtractor {
    model: Arc<dyn LanguageModel>,
    prompts: Prompts,
    max_concurrent: usize,
}

impl KeypointExtractor {
    pub fn new(model: Arc<dyn LanguageModel>, max_concurrent: usize) -> Self {
        Self {
            model,
            prompts: Prompts::default(),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Extract the consolidated topic list.
    ///
    /// Every segment call must succeed; the first failure fails the step.
    #[instrument(skip(self, chunks), fields(chunks = chunks.len()))]
    pub async fn extract(&self, chunks: &[String], segment_size: usize) -> Result<String> {
        if chunks.is_empty() {
            return Err(RecapError::Extraction(
                "No transcript chunks available for keypoint extraction".to_string(),
            ));
        }

        let segments = group_segments(chunks, segment_size);
        if segments.is_empty() {
            return Err(RecapError::Extraction("Transcript contains no text".to_string()));
        }

        info!(
            "Extracting keypoints from {} segments ({} in flight)",
            segments.len(),
            self.max_concurrent
        );

        let per_segment: Vec<String> = stream::iter(segments)
            .map(|segment| self.extract_segment(segment))
            .buffered(self.max_concurrent)
            .try_collect()
            .await?;

        let merged = per_segment.join("\n");
        self.consolidate(&merged).await
    }

    async fn extract_segment(&self, segment: Segment) -> Result<String> {
        debug!(
            "Segment {}: {} chunks, {} chars",
            segment.index + 1,
            segment.chunk_count,
            segment.text.len()
        );

        let prompt = self
            .prompts
            .fill(&self.prompts.keypoints.segment, &[("segment", &segment.text)]);

        let response = self
            .model
            .complete(None, &prompt)
            .await
            .map_err(|e| RecapError::Extraction(format!("segment {}: {}", segment.index + 1, e)))?;

        Ok(response.trim().to_string())
    }

    async fn consolidate(&self, keypoints: &str) -> Result<String> {
        let prompt = self
            .prompts
            .fill(&self.prompts.keypoints.consolidate, &[("keypoints", keypoints)]);

        let response = self
            .model
            .complete(None, &prompt)
            .await
            .map_err(|e| RecapError::Extraction(format!("consolidation: {}", e)))?;

        let consolidated = response.trim();
        if consolidated.is_empty() {
            return Err(RecapError::Extraction(
                "consolidation produced no keypoints".to_string(),
            ));
        }

        info!("Consolidated keypoints: {} lines", consolidated.lines().count());
        Ok(consolidated.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;

    fn chunks(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{}", i)).collect()
    }

    #[test]
    fn test_grouping_covers_every_chunk_in_order() {
        for (len, size) in [(10, 3), (9, 3), (1, 30), (30, 30), (31, 30), (7, 1)] {
            let input = chunks(len);
            let segments = group_segments(&input, size);

            let rejoined: Vec<String> = segments
                .iter()
                .flat_map(|s| s.text.split(' ').map(str::to_string).collect::<Vec<_>>())
                .collect();
            assert_eq!(rejoined, input, "len={len} size={size}");

            let expected_last = if len % size == 0 { size } else { len % size };
            assert_eq!(segments.last().unwrap().chunk_count, expected_last);
            assert!(segments.iter().all(|s| s.chunk_count > 0));
        }
    }

    #[test]
    fn test_blank_segments_skipped() {
        let input = vec![
            "alpha".to_string(),
            " ".to_string(),
            "\n".to_string(),
            "omega".to_string(),
        ];
        let segments = group_segments(&input, 1);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].index, 0);
        assert_eq!(segments[1].index, 3);
    }

    #[test]
    fn test_zero_segment_size_uses_default() {
        let segments = group_segments(&chunks(61), 0);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].chunk_count, 30);
    }

    #[tokio::test]
    async fn test_extract_fans_out_then_consolidates() {
        let model = ScriptedModel::respond(|prompt| {
            if prompt.contains("de-duplicate") {
                Ok("1. Neural networks\n   - backpropagation\n2. Optimizers".to_string())
            } else {
                Ok("1. Some topic\n".to_string())
            }
        });
        let extractor = KeypointExtractor::new(model.clone(), 2);

        let keypoints = extractor.extract(&chunks(7), 3).await.unwrap();
        assert!(keypoints.starts_with("1. Neural networks"));

        // 3 segments + 1 consolidation
        assert_eq!(model.calls(), 4);
        let prompts = model.prompts();
        let consolidation = prompts.last().unwrap();
        assert_eq!(consolidation.matches("1. Some topic").count(), 3);
    }

    #[tokio::test]
    async fn test_segment_prompts_preserve_order() {
        let model = ScriptedModel::respond(|prompt| {
            if prompt.contains("de-duplicate") {
                Ok(prompt.to_string())
            } else {
                let tail = prompt.rsplit("TEXT:\n").next().unwrap_or("");
                Ok(format!("[{}]", tail))
            }
        });
        let extractor = KeypointExtractor::new(model, 4);

        let out = extractor.extract(&chunks(5), 2).await.unwrap();
        let first = out.find("[c0 c1]").unwrap();
        let second = out.find("[c2 c3]").unwrap();
        let third = out.find("[c4]").unwrap();
        assert!(first < second && second < third);
    }

    #[tokio::test]
    async fn test_one_failing_segment_fails_extraction() {
        let model = ScriptedModel::respond(|prompt| {
            if prompt.contains("c3") {
                Err(RecapError::Llm("rate limited".to_string()))
            } else {
                Ok("1. Topic".to_string())
            }
        });
        let extractor = KeypointExtractor::new(model.clone(), 8);

        let err = extractor.extract(&chunks(6), 2).await.unwrap_err();
        assert!(matches!(err, RecapError::Extraction(_)));
        assert!(err.to_string().contains("rate limited"));
        assert!(model.prompts().iter().all(|p| !p.contains("de-duplicate")));
    }

    #[tokio::test]
    async fn test_empty_consolidation_is_error() {
        let model = ScriptedModel::respond(|prompt| {
            if prompt.contains("de-duplicate") {
                Ok("   \n".to_string())
            } else {
                Ok("1. Topic".to_string())
            }
        });
        let extractor = KeypointExtractor::new(model, 1);

        let err = extractor.extract(&chunks(2), 5).await.unwrap_err();
        assert!(err.to_string().contains("no keypoints"));
    }

    #[tokio::test]
    async fn test_no_chunks_is_error() {
        let extractor = KeypointExtractor::new(ScriptedModel::always("unused"), 1);
        assert!(matches!(
            extractor.extract(&[], 3).await,
            Err(RecapError::Extraction(_))
        ));
    }
}
