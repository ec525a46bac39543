//! Transcript chunking.
//!
//! A planner model recommends a chunk size and a segment size for the
//! transcript; the splitter then cuts the transcript into chunks of that size.

mod planner;
mod splitter;

pub use planner::{parse_plan, ChunkPlanner};
pub use splitter::split_text;

use crate::config::PlanningSettings;
use serde::{Deserialize, Serialize};

/// Where a chunk plan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    /// Parsed from the planner model's answer.
    Model,
    /// Configured defaults, used when the answer was unusable.
    Fallback,
}

/// Chunk and segment sizes for one transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPlan {
    /// Maximum characters per chunk.
    pub chunk_size: usize,
    /// Chunks per keypoint-extraction call.
    pub segment_size: usize,
    pub source: PlanSource,
}

impl ChunkPlan {
    /// The configured default plan.
    pub fn fallback(settings: &PlanningSettings) -> Self {
        Self {
            chunk_size: settings.default_chunk_size.max(1),
            segment_size: settings.default_segment_size.max(1),
            source: PlanSource::Fallback,
        }
    }
}
