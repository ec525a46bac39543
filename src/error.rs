//! Error types for Recap.

use thiserror::Error;

/// Library-level error type for Recap operations.
#[derive(Error, Debug)]
pub enum RecapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Chunk planning failed: {0}")]
    Planning(String),

    #[error("Failed to extract key points: {0}")]
    Extraction(String),

    #[error("One or both summaries are missing. Cannot compare.")]
    MissingSummaries,

    #[error("Web search failed: {0}")]
    Search(String),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A request is already being processed")]
    Busy,
}

/// Result type alias for Recap operations.
pub type Result<T> = std::result::Result<T, RecapError>;

/// Render an error as the message shown to the person who submitted the request.
///
/// Pipeline failures carry generic remediation hints; input problems and the
/// busy guard are reported as-is.
pub fn user_message(err: &RecapError) -> String {
    match err {
        RecapError::InvalidInput(_) | RecapError::Busy => err.to_string(),
        RecapError::ToolNotFound(_) | RecapError::Config(_) => {
            format!("{}\n\nRun 'recap doctor' to check your setup.", err)
        }
        _ => format!(
            "An error occurred: {}\n\nPlease try:\n\
             - Checking that the YouTube URL is valid and the video has captions\n\
             - Checking your network connection\n\
             - Trying again with a different video",
            err
        ),
    }
}
