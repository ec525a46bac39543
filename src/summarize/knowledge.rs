//! Knowledge-based topic explanations.

use crate::config::Prompts;
use crate::llm::LanguageModel;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Explains topics from the planner model's own knowledge.
pub struct KnowledgeSummarizer {
    model: Arc<dyn LanguageModel>,
    prompts: Prompts,
}

impl KnowledgeSummarizer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Explain every topic. Failures and empty answers yield `None`, which the
    /// writer reports as a missing summary.
    #[instrument(skip(self, topics))]
    pub async fn summarize(&self, topics: &str) -> Option<String> {
        let prompt = self
            .prompts
            .fill(&self.prompts.summary.knowledge, &[("topics", topics)]);

        match self.model.complete(None, &prompt).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                warn!("Knowledge summary was empty");
                None
            }
            Err(e) => {
                warn!("Knowledge summary failed: {}", e);
                None
            }
        }
    }
}
