//! Request orchestrator for Recap.
//!
//! Routes a submission to the chatbot or through the video pipeline:
//! transcript, chunk planning and splitting, keypoint extraction, the two
//! topic summaries in parallel, and the final writer. Every stage transition
//! is logged and reported to an optional progress callback.

use crate::chatbot::Chatbot;
use crate::chunking::{split_text, ChunkPlanner};
use crate::config::{Prompts, Settings};
use crate::error::{user_message, RecapError, Result};
use crate::keypoints::KeypointExtractor;
use crate::llm::{LanguageModel, OpenAIChatModel};
use crate::router::{route, video_id, video_url, Route};
use crate::state::{ConversationState, Outcome, Stage, SummaryLength};
use crate::summarize::{KnowledgeSummarizer, SearchSummarizer, TavilySearch, WebSearch};
use crate::transcript::{TranscriptSource, YoutubeTranscriptSource};
use crate::writer::Writer;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Callback receiving each stage the request enters.
pub type Progress<'a> = &'a (dyn Fn(Stage) + Send + Sync);

/// External collaborators the pipeline talks to.
pub struct Components {
    /// Model used for chunk planning and knowledge summaries.
    pub planner: Arc<dyn LanguageModel>,
    /// Model used for keypoints, writing and chat.
    pub worker: Arc<dyn LanguageModel>,
    pub transcripts: Arc<dyn TranscriptSource>,
    pub search: Arc<dyn WebSearch>,
}

/// The request graph.
pub struct Orchestrator {
    settings: Settings,
    transcripts: Arc<dyn TranscriptSource>,
    planner: ChunkPlanner,
    extractor: KeypointExtractor,
    knowledge: KnowledgeSummarizer,
    search: SearchSummarizer,
    writer: Writer,
    chatbot: Chatbot,
}

impl Orchestrator {
    /// Create an orchestrator talking to the configured providers.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let components = Components {
            planner: Arc::new(OpenAIChatModel::from_settings(&settings.models.planner)?),
            worker: Arc::new(OpenAIChatModel::from_settings(&settings.models.worker)?),
            transcripts: Arc::new(YoutubeTranscriptSource::with_config(&settings.transcript)),
            search: Arc::new(TavilySearch::from_settings(&settings.search)?),
        };
        info!(
            "Using planner {} and worker {}",
            components.planner.name(),
            components.worker.name()
        );

        Ok(Self::with_components(settings, prompts, components))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(settings: Settings, prompts: Prompts, components: Components) -> Self {
        let planner = ChunkPlanner::new(components.planner.clone(), settings.planning.clone())
            .with_prompts(prompts.clone());
        let extractor = KeypointExtractor::new(
            components.worker.clone(),
            settings.extraction.max_concurrent_segments,
        )
        .with_prompts(prompts.clone());
        let knowledge =
            KnowledgeSummarizer::new(components.planner).with_prompts(prompts.clone());
        let search = SearchSummarizer::new(components.search, settings.search.max_results);
        let writer = Writer::new(components.worker.clone(), settings.writer.allow_filler)
            .with_prompts(prompts.clone());
        let chatbot = Chatbot::new(components.worker).with_prompts(prompts);

        Self {
            settings,
            transcripts: components.transcripts,
            planner,
            extractor,
            knowledge,
            search,
            writer,
            chatbot,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Process one submission to a terminal state.
    pub async fn run(&self, input: &str, length: SummaryLength) -> ConversationState {
        self.run_with_progress(input, length, &|_: Stage| {}).await
    }

    /// Process one submission, reporting each stage to `progress`.
    ///
    /// Never fails: errors end the request in `Stage::Failed` with a
    /// user-facing message as the outcome.
    #[instrument(skip(self, progress))]
    pub async fn run_with_progress(
        &self,
        input: &str,
        length: SummaryLength,
        progress: Progress<'_>,
    ) -> ConversationState {
        let state = enter(ConversationState::new(input, length), Stage::Routing, progress);

        match route(state.latest_input()) {
            Route::Chat => self.chat(state, progress).await,
            Route::Transcript => self.summarize_video(state, progress).await,
        }
    }

    async fn chat(&self, state: ConversationState, progress: Progress<'_>) -> ConversationState {
        let state = enter(state, Stage::Chatting, progress);

        match self.chatbot.answer(state.latest_input()).await {
            Ok(answer) => done(state, Outcome::Chat(answer), progress),
            Err(e) => fail(state, e, progress),
        }
    }

    async fn summarize_video(
        &self,
        state: ConversationState,
        progress: Progress<'_>,
    ) -> ConversationState {
        let state = enter(state, Stage::FetchingTranscript, progress);

        // Canonical watch URL when the id is recognizable, otherwise just the link
        let input = state.latest_input().trim();
        let url = match video_id(input) {
            Some(id) => format!("https://www.youtube.com/watch?v={}", id),
            None => video_url(input).unwrap_or_else(|| input.to_string()),
        };

        // Fetch captions
        let transcript = match self.transcripts.fetch(&url).await {
            Ok(t) if !t.is_empty() => t,
            Ok(_) => {
                let e = RecapError::TranscriptUnavailable(format!("{} has an empty transcript", url));
                return fail(state, e, progress);
            }
            Err(e) => return fail(state, e, progress),
        };
        info!(
            "Transcript: {} segments, {:.0}s, language {}",
            transcript.segments.len(),
            transcript.duration_seconds(),
            transcript.language
        );
        let state = state.with_transcript(transcript.text());

        // Plan chunk sizes and split
        let state = enter(state, Stage::Preprocessing, progress);
        let text = state.raw_transcript.clone().unwrap_or_default();

        let plan = match self.planner.plan(text.chars().count()).await {
            Ok(plan) => plan,
            Err(e) => return fail(state, e, progress),
        };
        let chunks = match split_text(&text, plan.chunk_size) {
            Ok(chunks) => chunks,
            Err(e) => return fail(state, e, progress),
        };
        info!("Split transcript into {} chunks", chunks.len());
        let state = state.with_chunks(plan, chunks);

        // Extract keypoints per segment, then consolidate
        let state = enter(state, Stage::ExtractingKeypoints, progress);
        let keypoints = match self.extractor.extract(&state.chunks, plan.segment_size).await {
            Ok(keypoints) => keypoints,
            Err(e) => return fail(state, e, progress),
        };
        let state = state.with_keypoints(keypoints);

        // Knowledge and web summaries run side by side
        let state = enter(state, Stage::Summarizing, progress);
        let keypoints = state.keypoints.clone().unwrap_or_default();

        let (knowledge, findings) = tokio::join!(
            self.knowledge.summarize(&keypoints),
            self.search.summarize(&keypoints)
        );
        // Only a search failure is fatal here; a missing knowledge summary
        // is reported by the writer
        let findings = match findings {
            Ok(findings) => findings,
            Err(e) => return fail(state, e, progress),
        };
        let state = state.with_summaries(knowledge, findings);

        // Final narrative
        let state = enter(state, Stage::Writing, progress);
        let narrative = self
            .writer
            .write(
                state.knowledge_summary.as_deref(),
                state.findings.as_deref(),
                &keypoints,
                state.summary_length,
            )
            .await;

        match narrative {
            Ok(narrative) => done(state, Outcome::Summary(narrative), progress),
            Err(e) => fail(state, e, progress),
        }
    }
}

fn enter(state: ConversationState, stage: Stage, progress: Progress<'_>) -> ConversationState {
    info!("{:?} -> {:?}", state.stage, stage);
    progress(stage);
    state.at(stage)
}

fn done(state: ConversationState, outcome: Outcome, progress: Progress<'_>) -> ConversationState {
    let state = state.finish(outcome);
    info!("Request finished");
    progress(state.stage);
    state
}

fn fail(state: ConversationState, e: RecapError, progress: Progress<'_>) -> ConversationState {
    error!("Request failed during {:?}: {}", state.stage, e);
    let state = state.finish(Outcome::Failed(user_message(&e)));
    progress(state.stage);
    state
}
