//! Scripted stand-ins for models, search and transcripts used by unit tests.

use crate::error::{RecapError, Result};
use crate::llm::LanguageModel;
use crate::summarize::WebSearch;
use crate::transcript::{Transcript, TranscriptSegment, TranscriptSource};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// A language model whose answers are decided by a closure.
pub struct ScriptedModel {
    responder: Responder,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn respond<F>(f: F) -> Arc<Self>
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(f),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn always(answer: &str) -> Arc<Self> {
        let answer = answer.to_string();
        Self::respond(move |_| Ok(answer.clone()))
    }

    /// Answers in order; the last answer repeats once the list is exhausted.
    pub fn sequence(answers: Vec<String>) -> Arc<Self> {
        let queue = Mutex::new(VecDeque::from(answers));
        Self::respond(move |_| {
            let mut queue = queue.lock().unwrap();
            let next = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            };
            Ok(next.unwrap_or_default())
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        let message = message.to_string();
        Self::respond(move |_| Err(RecapError::Llm(message.clone())))
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String> {
        let recorded = match system {
            Some(system) => format!("{}\n{}", system, prompt),
            None => prompt.to_string(),
        };
        self.prompts.lock().unwrap().push(recorded.clone());
        (self.responder)(&recorded)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A search provider that returns the same response for every query.
pub struct StaticSearch {
    response: Option<serde_json::Value>,
    queries: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn new(response: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            response: Some(response),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: None,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for StaticSearch {
    async fn search(&self, query: &str, _max_results: u32) -> Result<serde_json::Value> {
        self.queries.lock().unwrap().push(query.to_string());
        self.response
            .clone()
            .ok_or_else(|| RecapError::Search("service unavailable".to_string()))
    }
}

/// A transcript provider returning fixed text, or no captions at all.
pub struct StaticTranscript {
    text: Option<String>,
    requests: Mutex<Vec<String>>,
}

impl StaticTranscript {
    pub fn new(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            text: Some(text.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            text: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptSource for StaticTranscript {
    async fn fetch(&self, url: &str) -> Result<Transcript> {
        self.requests.lock().unwrap().push(url.to_string());
        let text = self.text.clone().ok_or_else(|| {
            RecapError::TranscriptUnavailable("no captions in en, id".to_string())
        })?;
        Ok(Transcript::new(
            crate::router::video_id(url),
            "en",
            vec![TranscriptSegment::new(0.0, 60.0, text)],
        ))
    }
}
