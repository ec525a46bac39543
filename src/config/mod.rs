//! Configuration module for Recap.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{ChatPrompts, KeypointPrompts, PlannerPrompts, Prompts, SummaryPrompts};
pub use settings::{
    ExtractionSettings, GeneralSettings, ModelSettings, ModelsSettings, PlanningSettings,
    PromptSettings, SearchSettings, SessionSettings, Settings, TranscriptSettings,
    WriterSettings,
};
