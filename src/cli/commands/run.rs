//! One-shot command: summarize a video or answer a question.

use crate::cli::preflight;
use crate::cli::{resolve_length, Output};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::state::{Outcome, Stage};
use anyhow::Result;

/// Run the pipeline once and print the result.
pub async fn run_input(
    input: &str,
    length: Option<&str>,
    output: Option<&str>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'recap doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let length = resolve_length(length, settings.general.default_length);
    let orchestrator = Orchestrator::new(settings)?;

    let pb = Output::spinner(Stage::Routing.label());
    let state = orchestrator
        .run_with_progress(input, length, &|stage: Stage| Output::stage(&pb, stage))
        .await;
    pb.finish_and_clear();

    match state.outcome {
        Some(Outcome::Chat(text)) | Some(Outcome::Summary(text)) => {
            Output::answer(&text);

            if let Some(path) = output {
                let path = Settings::expand_path(path);
                std::fs::write(&path, &text)?;
                Output::success(&format!("Saved to {}", path.display()));
            }
            Ok(())
        }
        Some(Outcome::Failed(message)) => {
            Output::error(&message);
            anyhow::bail!("request failed")
        }
        None => anyhow::bail!("request ended without a result"),
    }
}
