//! Per-request conversation state.
//!
//! A `ConversationState` is created for each submission and threaded through
//! the pipeline by value. Stages never mutate it; they return their output and
//! the orchestrator merges it with one of the `with_*` methods.

use crate::chunking::ChunkPlan;
use crate::summarize::SearchFinding;
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Requested length of the final summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl std::str::FromStr for SummaryLength {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(SummaryLength::Short),
            "medium" => Ok(SummaryLength::Medium),
            "long" => Ok(SummaryLength::Long),
            _ => Err(format!("Unknown summary length: {}", s)),
        }
    }
}

impl std::fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryLength::Short => write!(f, "short"),
            SummaryLength::Medium => write!(f, "medium"),
            SummaryLength::Long => write!(f, "long"),
        }
    }
}

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Routing,
    FetchingTranscript,
    Preprocessing,
    ExtractingKeypoints,
    Summarizing,
    Writing,
    Chatting,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }

    /// Short progress label.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Routing => "Reading input...",
            Stage::FetchingTranscript => "Fetching transcript...",
            Stage::Preprocessing => "Planning and splitting transcript...",
            Stage::ExtractingKeypoints => "Extracting key points...",
            Stage::Summarizing => "Summarizing topics and searching the web...",
            Stage::Writing => "Writing the final summary...",
            Stage::Chatting => "Thinking...",
            Stage::Done => "Done",
            Stage::Failed => "Failed",
        }
    }
}

/// Final result of a request. Exactly one variant is produced per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Outcome {
    /// Answer from the chatbot.
    Chat(String),
    /// Narrative from the writer.
    Summary(String),
    /// User-facing error message.
    Failed(String),
}

impl Outcome {
    pub fn text(&self) -> &str {
        match self {
            Outcome::Chat(t) | Outcome::Summary(t) | Outcome::Failed(t) => t,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// Immutable record threaded through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    pub summary_length: SummaryLength,
    pub stage: Stage,
    pub raw_transcript: Option<String>,
    pub chunk_plan: Option<ChunkPlan>,
    pub chunks: Vec<String>,
    pub keypoints: Option<String>,
    pub knowledge_summary: Option<String>,
    pub findings: Option<Vec<SearchFinding>>,
    pub outcome: Option<Outcome>,
}

impl ConversationState {
    /// Fresh state for a single submission.
    pub fn new(input: impl Into<String>, summary_length: SummaryLength) -> Self {
        Self {
            messages: vec![Message::user(input)],
            summary_length,
            stage: Stage::Routing,
            raw_transcript: None,
            chunk_plan: None,
            chunks: Vec::new(),
            keypoints: None,
            knowledge_summary: None,
            findings: None,
            outcome: None,
        }
    }

    /// Latest user message text.
    pub fn latest_input(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }

    pub fn at(self, stage: Stage) -> Self {
        Self { stage, ..self }
    }

    pub fn with_transcript(self, raw_transcript: String) -> Self {
        Self {
            raw_transcript: Some(raw_transcript),
            ..self
        }
    }

    pub fn with_chunks(self, plan: ChunkPlan, chunks: Vec<String>) -> Self {
        Self {
            chunk_plan: Some(plan),
            chunks,
            ..self
        }
    }

    pub fn with_keypoints(self, keypoints: String) -> Self {
        Self {
            keypoints: Some(keypoints),
            ..self
        }
    }

    pub fn with_summaries(
        self,
        knowledge_summary: Option<String>,
        findings: Option<Vec<SearchFinding>>,
    ) -> Self {
        Self {
            knowledge_summary,
            findings,
            ..self
        }
    }

    /// Terminal merge: records the outcome, appends a successful answer to the
    /// message list and moves to `Done` or `Failed`.
    pub fn finish(self, outcome: Outcome) -> Self {
        let mut messages = self.messages;
        let stage = if outcome.is_failure() {
            Stage::Failed
        } else {
            messages.push(Message::assistant(outcome.text()));
            Stage::Done
        };

        Self {
            messages,
            stage,
            outcome: Some(outcome),
            ..self
        }
    }

    /// The final assistant answer, if the request succeeded.
    pub fn final_answer(&self) -> Option<&str> {
        match &self.outcome {
            Some(Outcome::Chat(t)) | Some(Outcome::Summary(t)) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_length_parse() {
        assert_eq!("SHORT".parse::<SummaryLength>(), Ok(SummaryLength::Short));
        assert_eq!(" long ".parse::<SummaryLength>(), Ok(SummaryLength::Long));
        assert!("tiny".parse::<SummaryLength>().is_err());
        assert_eq!(SummaryLength::default(), SummaryLength::Medium);
        assert_eq!(SummaryLength::Medium.to_string(), "medium");
    }

    #[test]
    fn test_state_merges_are_additive() {
        let state = ConversationState::new("https://youtu.be/abc", SummaryLength::Short)
            .with_transcript("hello world".to_string())
            .with_keypoints("1. Greeting".to_string());

        assert_eq!(state.latest_input(), "https://youtu.be/abc");
        assert_eq!(state.raw_transcript.as_deref(), Some("hello world"));
        assert_eq!(state.keypoints.as_deref(), Some("1. Greeting"));
        assert_eq!(state.stage, Stage::Routing);
        assert!(state.outcome.is_none());
    }

    #[test]
    fn test_finish_success_appends_answer() {
        let state = ConversationState::new("What is DNS?", SummaryLength::Medium)
            .finish(Outcome::Chat("A naming system.".to_string()));

        assert_eq!(state.stage, Stage::Done);
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1], Message::assistant("A naming system."));
        assert_eq!(state.final_answer(), Some("A naming system."));
    }

    #[test]
    fn test_finish_failure_has_no_answer() {
        let state = ConversationState::new("https://youtu.be/abc", SummaryLength::Medium)
            .finish(Outcome::Failed("boom".to_string()));

        assert_eq!(state.stage, Stage::Failed);
        assert!(state.stage.is_terminal());
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.final_answer(), None);
    }
}
