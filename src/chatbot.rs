//! Study chatbot for inputs that are not video links.

use crate::config::Prompts;
use crate::error::{RecapError, Result};
use crate::llm::LanguageModel;
use std::sync::Arc;
use tracing::instrument;

pub struct Chatbot {
    model: Arc<dyn LanguageModel>,
    prompts: Prompts,
}

impl Chatbot {
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

    /// Answer one question in the teacher persona.
    #[instrument(skip(self))]
    pub async fn answer(&self, input: &str) -> Result<String> {
        let system = self.prompts.fill(&self.prompts.chat.system, &[]);
        let prompt = self.prompts.fill(&self.prompts.chat.user, &[("input", input)]);

        let answer = self.model.complete(Some(&system), &prompt).await?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(RecapError::Llm("empty response".to_string()));
        }
        Ok(answer.to_string())
    }
}
