//! Chat model abstraction used by every pipeline stage.

mod openai;

pub use openai::OpenAIChatModel;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for text-in/text-out chat completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a prompt, optionally preceded by a system message.
    async fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String>;

    /// Model identifier, for logging.
    fn name(&self) -> &str;
}
