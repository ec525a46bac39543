//! Recap - YouTube video summaries with web context
//!
//! Turns a YouTube link into a narrative summary organized by topic and
//! enriched with web search results, and answers plain study questions
//! through a tutoring chatbot.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `router` - Decides between the video pipeline and the chatbot
//! - `transcript` - Caption retrieval (yt-dlp) and VTT parsing
//! - `chunking` - Model-advised chunk planning and text splitting
//! - `keypoints` - Concurrent per-segment topic extraction and consolidation
//! - `summarize` - Knowledge and web search summaries per topic
//! - `writer` - Final narrative
//! - `chatbot` - Study questions
//! - `orchestrator` - Request graph
//! - `session` - Result history and the single-flight guard
//!
//! # Example
//!
//! ```rust,no_run
//! use recap::config::Settings;
//! use recap::orchestrator::Orchestrator;
//! use recap::state::SummaryLength;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let state = orchestrator
//!         .run("https://www.youtube.com/watch?v=aircAruvnKk", SummaryLength::Short)
//!         .await;
//!     if let Some(outcome) = &state.outcome {
//!         println!("{}", outcome.text());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod chatbot;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod keypoints;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod render;
pub mod router;
pub mod session;
pub mod state;
pub mod summarize;
pub mod transcript;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{RecapError, Result};
