//! Interactive session state shared by the REPL and the HTTP server.
//!
//! Keeps a rolling in-memory history of results and lets only one submission
//! be processed at a time.

use crate::error::{RecapError, Result};
use crate::orchestrator::{Orchestrator, Progress};
use crate::router::{route, Route};
use crate::state::{ConversationState, Stage, SummaryLength};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};
use uuid::Uuid;

/// One processed submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub input: String,
    pub route: Route,
    pub length: SummaryLength,
    pub output: String,
    /// Whether `output` is an error message.
    pub failed: bool,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn from_state(state: &ConversationState) -> Self {
        let (output, failed) = match &state.outcome {
            Some(outcome) => (outcome.text().to_string(), outcome.is_failure()),
            None => (String::new(), true),
        };

        Self {
            id: Uuid::new_v4(),
            input: state.latest_input().to_string(),
            route: route(state.latest_input()),
            length: state.summary_length,
            output,
            failed,
            created_at: Utc::now(),
        }
    }

    /// Suggested file name for downloading this result.
    pub fn file_name(&self) -> String {
        format!("recap-{}.txt", self.created_at.format("%Y%m%d-%H%M%S"))
    }
}

/// Clears the processing flag when a submission ends, however it ends.
pub(crate) struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A user session: the orchestrator, its result history and the busy flag.
pub struct Session {
    orchestrator: Orchestrator,
    history: Mutex<VecDeque<HistoryEntry>>,
    processing: AtomicBool,
    limit: usize,
}

impl Session {
    pub fn new(orchestrator: Orchestrator) -> Self {
        let limit = orchestrator.settings().session.history_limit.max(1);
        Self {
            orchestrator,
            history: Mutex::new(VecDeque::with_capacity(limit)),
            processing: AtomicBool::new(false),
            limit,
        }
    }

    /// Whether a submission is currently being processed.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Process one submission and record it in the history.
    ///
    /// Returns `Busy` if another submission is in flight and `InvalidInput`
    /// for blank input. Pipeline failures are not errors here: they are
    /// recorded like any other result.
    pub async fn submit(
        &self,
        input: &str,
        length: SummaryLength,
    ) -> Result<(ConversationState, HistoryEntry)> {
        self.submit_with_progress(input, length, &|_: Stage| {}).await
    }

    pub async fn submit_with_progress(
        &self,
        input: &str,
        length: SummaryLength,
        progress: Progress<'_>,
    ) -> Result<(ConversationState, HistoryEntry)> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RecapError::InvalidInput(
                "Please enter a question or a YouTube URL".to_string(),
            ));
        }

        let _guard = self.begin()?;

        let state = self.orchestrator.run_with_progress(input, length, progress).await;
        let entry = HistoryEntry::from_state(&state);

        let mut history = self.entries();
        history.push_back(entry.clone());
        while history.len() > self.limit {
            history.pop_front();
        }
        info!("Recorded result {} ({} in history)", entry.id, history.len());

        Ok((state, entry))
    }

    /// History entries, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.entries().iter().cloned().collect()
    }

    pub fn get(&self, id: Uuid) -> Option<HistoryEntry> {
        self.entries().iter().find(|e| e.id == id).cloned()
    }

    /// Reset the session history.
    pub fn clear(&self) {
        let mut history = self.entries();
        debug!("Clearing {} history entries", history.len());
        history.clear();
    }

    /// Mark a submission as in flight until the guard is dropped.
    pub(crate) fn begin(&self) -> Result<ProcessingGuard<'_>> {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RecapError::Busy)?;
        Ok(ProcessingGuard(&self.processing))
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<HistoryEntry>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
