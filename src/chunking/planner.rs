//! LLM-advised chunk planning with a validated fallback.

use super::{ChunkPlan, PlanSource};
use crate::config::{PlanningSettings, Prompts};
use crate::error::{RecapError, Result};
use crate::llm::LanguageModel;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Asks the planner model for chunk and segment sizes.
pub struct ChunkPlanner {
    model: Arc<dyn LanguageModel>,
    prompts: Prompts,
    settings: PlanningSettings,
}

impl ChunkPlanner {
    pub fn new(model: Arc<dyn LanguageModel>, settings: PlanningSettings) -> Self {
        Self {
            model,
            prompts: Prompts::default(),
            settings,
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Plan chunking for a transcript of `transcript_len` characters.
    ///
    /// Unparseable answers fall back to the configured defaults; transport
    /// errors from the model are returned.
    #[instrument(skip(self))]
    pub async fn plan(&self, transcript_len: usize) -> Result<ChunkPlan> {
        let prompt = self.prompts.fill(
            &self.prompts.planner.user,
            &[("transcript_len", &transcript_len.to_string())],
        );

        let attempts = self.settings.max_attempts.max(1);
        for attempt in 1..=attempts {
            let response = self.model.complete(None, &prompt).await?;
            debug!("Planner response (attempt {}): {:?}", attempt, response);

            match parse_plan(&response) {
                Ok((chunk_size, segment_size)) => {
                    let plan = self.clamp(chunk_size, segment_size);
                    info!(
                        "Planner chose chunk_size={} segment_size={}",
                        plan.chunk_size, plan.segment_size
                    );
                    return Ok(plan);
                }
                Err(e) => warn!("Attempt {}/{}: {}", attempt, attempts, e),
            }
        }

        let plan = ChunkPlan::fallback(&self.settings);
        warn!(
            "Using default chunk plan: chunk_size={} segment_size={}",
            plan.chunk_size, plan.segment_size
        );
        Ok(plan)
    }

    fn clamp(&self, chunk_size: usize, segment_size: usize) -> ChunkPlan {
        let min_chunk = self.settings.min_chunk_size.max(1);
        let max_chunk = self.settings.max_chunk_size.max(min_chunk);
        ChunkPlan {
            chunk_size: chunk_size.clamp(min_chunk, max_chunk),
            segment_size: segment_size.clamp(1, self.settings.max_segment_size.max(1)),
            source: PlanSource::Model,
        }
    }
}

/// Extract `(chunk_size, segment_size)` from a planner answer.
///
/// Expects labeled lines such as `chunk_size: 1000`. Labels are matched
/// case-insensitively; markdown emphasis and thousands separators around the
/// value are ignored. Missing labels, non-numeric and zero values are errors.
pub fn parse_plan(response: &str) -> Result<(usize, usize)> {
    let chunk_size = labeled_value(response, "chunk_size")?;
    let segment_size = labeled_value(response, "segment_size")?;
    Ok((chunk_size, segment_size))
}

fn labeled_value(response: &str, label: &str) -> Result<usize> {
    let lower = response.to_ascii_lowercase();
    let needle = format!("{}:", label);

    let start = lower
        .find(&needle)
        .ok_or_else(|| RecapError::Planning(format!("'{}' missing from planner response", label)))?
        + needle.len();

    let raw = response[start..].lines().next().unwrap_or("");
    let cleaned: String = raw
        .trim()
        .trim_matches(|c: char| c == '*' || c == '_' || c == '`')
        .trim()
        .replace(',', "");

    match cleaned.parse::<usize>() {
        Ok(0) => Err(RecapError::Planning(format!("'{}' must be positive", label))),
        Ok(value) => Ok(value),
        Err(_) => Err(RecapError::Planning(format!(
            "'{}' is not a number: {:?}",
            label, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;

    #[test]
    fn test_parse_plan_plain() {
        let (chunk, segment) = parse_plan("chunk_size: 1000\nsegment_size: 30\n").unwrap();
        assert_eq!((chunk, segment), (1000, 30));
    }

    #[test]
    fn test_parse_plan_tolerates_noise() {
        let response = "Here you go:\n**Chunk_Size:** 1,500\n**segment_size:** 12";
        assert_eq!(parse_plan(response).unwrap(), (1500, 12));
    }

    #[test]
    fn test_parse_plan_failures() {
        assert!(matches!(
            parse_plan("chunk_size: 1000"),
            Err(RecapError::Planning(_))
        ));
        assert!(matches!(
            parse_plan("chunk_size: about a thousand\nsegment_size: 30"),
            Err(RecapError::Planning(_))
        ));
        assert!(matches!(
            parse_plan("chunk_size: 0\nsegment_size: 30"),
            Err(RecapError::Planning(_))
        ));
    }

    #[tokio::test]
    async fn test_plan_uses_model_answer() {
        let model = ScriptedModel::always("chunk_size: 800\nsegment_size: 10");
        let planner = ChunkPlanner::new(model.clone(), PlanningSettings::default());

        let plan = planner.plan(5000).await.unwrap();
        assert_eq!(plan.chunk_size, 800);
        assert_eq!(plan.segment_size, 10);
        assert_eq!(plan.source, PlanSource::Model);

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("5000"));
    }

    #[tokio::test]
    async fn test_plan_falls_back_on_garbage() {
        let model = ScriptedModel::always("I recommend a moderate chunk size.");
        let planner = ChunkPlanner::new(model.clone(), PlanningSettings::default());

        let plan = planner.plan(134_190).await.unwrap();
        assert_eq!(plan.chunk_size, 1000);
        assert_eq!(plan.segment_size, 30);
        assert_eq!(plan.source, PlanSource::Fallback);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_plan_retries_only_when_configured() {
        let model = ScriptedModel::sequence(vec![
            "no idea".to_string(),
            "chunk_size: 2000\nsegment_size: 5".to_string(),
        ]);
        let settings = PlanningSettings {
            max_attempts: 2,
            ..PlanningSettings::default()
        };
        let planner = ChunkPlanner::new(model.clone(), settings);

        let plan = planner.plan(40_000).await.unwrap();
        assert_eq!(plan.chunk_size, 2000);
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_plan_clamps_extreme_values() {
        let model = ScriptedModel::always("chunk_size: 5\nsegment_size: 100000");
        let planner = ChunkPlanner::new(model, PlanningSettings::default());

        let plan = planner.plan(1000).await.unwrap();
        assert_eq!(plan.chunk_size, 200);
        assert_eq!(plan.segment_size, 200);
    }

    #[tokio::test]
    async fn test_plan_propagates_transport_errors() {
        let model = ScriptedModel::failing("connection reset");
        let planner = ChunkPlanner::new(model, PlanningSettings::default());

        assert!(matches!(planner.plan(1000).await, Err(RecapError::Llm(_))));
    }
}
