//! Final narrative writer.
//!
//! Stitches the knowledge summary and the search findings into one narrative
//! organized by topic. Both summaries must be present; there is no partial
//! narrative.

use crate::config::Prompts;
use crate::error::{RecapError, Result};
use crate::llm::LanguageModel;
use crate::state::SummaryLength;
use crate::summarize::SearchFinding;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, instrument};

/// Serialize findings into the numbered layout the writer prompt expects.
pub fn format_findings(findings: &[SearchFinding]) -> String {
    let mut out = String::new();
    for (i, finding) in findings.iter().enumerate() {
        let n = i + 1;
        let _ = write!(
            out,
            "- Keypoint{n}: {}\n- Information/Summary{n}: {}\n- URL Information/Summary{n}: {}\n",
            finding.topic, finding.information, finding.url
        );
    }
    out
}

/// Writes the final summary with the worker model.
pub struct Writer {
    model: Arc<dyn LanguageModel>,
    prompts: Prompts,
    allow_filler: bool,
}

impl Writer {
    pub fn new(model: Arc<dyn LanguageModel>, allow_filler: bool) -> Self {
        Self {
            model,
            prompts: Prompts::default(),
            allow_filler,
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    #[instrument(skip_all, fields(length = %length))]
    pub async fn write(
        &self,
        knowledge: Option<&str>,
        findings: Option<&[SearchFinding]>,
        topics: &str,
        length: SummaryLength,
    ) -> Result<String> {
        let knowledge = knowledge
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(RecapError::MissingSummaries)?;
        let findings = findings
            .filter(|f| !f.is_empty())
            .ok_or(RecapError::MissingSummaries)?;

        let filler = if self.allow_filler {
            self.prompts.summary.filler.as_str()
        } else {
            ""
        };
        let formatted = format_findings(findings);
        let length = length.to_string();

        let prompt = self.prompts.fill(
            &self.prompts.summary.writer,
            &[
                ("length", &length),
                ("filler", filler),
                ("knowledge", knowledge),
                ("findings", &formatted),
                ("topics", topics),
            ],
        );

        let response = self.model.complete(None, &prompt).await?;
        let narrative = response.trim();
        if narrative.is_empty() {
            return Err(RecapError::Llm("empty response".to_string()));
        }

        info!("Wrote summary: {} chars", narrative.len());
        Ok(narrative.to_string())
    }
}
