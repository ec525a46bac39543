//! Input routing: YouTube links go to the summary pipeline, everything else
//! goes to the chatbot.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Where a submission is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Fetch the transcript and summarize the video.
    Transcript,
    /// Answer the input as a study question.
    Chat,
}

fn youtube_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(https?://)?(www\.)?(youtube\.com|youtu\.be)/").expect("valid regex")
    })
}

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?x)
            (?:https?://)?
            (?:www\.|m\.)?
            (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/|youtube\.com/live/)
            ([a-zA-Z0-9_-]{11})
        ",
        )
        .expect("valid regex")
    })
}

fn video_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:https?://)?(?:www\.|m\.)?(?:youtube\.com|youtu\.be)/[^\s<>\x22']*")
            .expect("valid regex")
    })
}

/// Choose the route for the latest user message.
pub fn route(input: &str) -> Route {
    if !input.is_empty() && youtube_pattern().is_match(input) {
        Route::Transcript
    } else {
        Route::Chat
    }
}

/// Extract the 11-character video ID from a YouTube URL, if present.
pub fn video_id(input: &str) -> Option<String> {
    video_id_pattern()
        .captures(input.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// The YouTube link embedded in free text, without surrounding words or
/// trailing sentence punctuation.
pub fn video_url(input: &str) -> Option<String> {
    video_url_pattern()
        .find(input)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')']))
        .map(str::to_string)
}
