//! Transcript retrieval.
//!
//! Provides a trait-based interface over transcript providers and the
//! transcript data model shared by the rest of the pipeline.

mod vtt;
mod youtube;

pub use vtt::parse_vtt;
pub use youtube::YoutubeTranscriptSource;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A complete transcript with timed segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Video ID this transcript belongs to, when known.
    pub video_id: Option<String>,
    /// Caption language that was retrieved.
    pub language: String,
    /// Individual caption segments in order.
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Create a new transcript from segments.
    pub fn new(video_id: Option<String>, language: &str, segments: Vec<TranscriptSegment>) -> Self {
        Self {
            video_id,
            language: language.to_string(),
            segments,
        }
    }

    /// Concatenated transcript text, segments joined by single spaces.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Total duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.segments.last().map(|s| s.end_seconds).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.text.trim().is_empty())
    }
}

/// A single caption segment with timestamp information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    pub start_seconds: f64,
    /// End time in seconds.
    pub end_seconds: f64,
    /// Caption text.
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start_seconds: f64, end_seconds: f64, text: String) -> Self {
        Self {
            start_seconds,
            end_seconds,
            text,
        }
    }
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the transcript for a video URL.
    ///
    /// Fails with `TranscriptUnavailable` when no captions exist in any
    /// configured language.
    async fn fetch(&self, url: &str) -> Result<Transcript>;
}
