//! Configuration settings for Recap.

use crate::state::SummaryLength;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub models: ModelsSettings,
    pub transcript: TranscriptSettings,
    pub planning: PlanningSettings,
    pub extraction: ExtractionSettings,
    pub search: SearchSettings,
    pub writer: WriterSettings,
    pub session: SessionSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Summary length used when none is given on the command line or request.
    pub default_length: SummaryLength,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            default_length: SummaryLength::Medium,
        }
    }
}

/// Connection settings for one OpenAI-compatible chat model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.7,
            timeout_secs: 300,
        }
    }
}

impl ModelSettings {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// The two chat models used by the pipeline.
///
/// Fields left out of a `[models.planner]` or `[models.worker]` table keep
/// that role's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ModelsOverrides")]
pub struct ModelsSettings {
    /// Model used for chunk planning and knowledge summaries.
    pub planner: ModelSettings,
    /// Model used for keypoint extraction, consolidation, writing and chat.
    pub worker: ModelSettings,
}

impl Default for ModelsSettings {
    fn default() -> Self {
        Self {
            planner: ModelSettings {
                api_base: "https://api.groq.com/openai/v1".to_string(),
                model: "llama-3.3-70b-versatile".to_string(),
                api_key_env: "GROQ_API_KEY".to_string(),
                temperature: 0.2,
                ..ModelSettings::default()
            },
            worker: ModelSettings {
                api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
                model: "gemini-2.5-flash".to_string(),
                api_key_env: "GEMINI_API_KEY".to_string(),
                ..ModelSettings::default()
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelsOverrides {
    planner: ModelOverrides,
    worker: ModelOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelOverrides {
    api_base: Option<String>,
    model: Option<String>,
    api_key_env: Option<String>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
}

impl ModelOverrides {
    fn apply(self, base: ModelSettings) -> ModelSettings {
        ModelSettings {
            api_base: self.api_base.unwrap_or(base.api_base),
            model: self.model.unwrap_or(base.model),
            api_key_env: self.api_key_env.unwrap_or(base.api_key_env),
            temperature: self.temperature.unwrap_or(base.temperature),
            timeout_secs: self.timeout_secs.unwrap_or(base.timeout_secs),
        }
    }
}

impl From<ModelsOverrides> for ModelsSettings {
    fn from(overrides: ModelsOverrides) -> Self {
        let defaults = Self::default();
        Self {
            planner: overrides.planner.apply(defaults.planner),
            worker: overrides.worker.apply(defaults.worker),
        }
    }
}

/// Transcript retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Caption languages in preference order (primary first, then fallbacks).
    pub languages: Vec<String>,
    /// yt-dlp executable.
    pub ytdlp_path: String,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string(), "id".to_string()],
            ytdlp_path: "yt-dlp".to_string(),
        }
    }
}

/// Chunk planning settings and the fallback plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningSettings {
    /// Chunk size used when the planner's answer cannot be parsed.
    pub default_chunk_size: usize,
    /// Segment size used when the planner's answer cannot be parsed.
    pub default_segment_size: usize,
    /// Smallest chunk size accepted from the planner.
    pub min_chunk_size: usize,
    /// Largest chunk size accepted from the planner.
    pub max_chunk_size: usize,
    /// Largest segment size accepted from the planner.
    pub max_segment_size: usize,
    /// Planner calls attempted before falling back (1 = no retries).
    pub max_attempts: u32,
}

impl Default for PlanningSettings {
    fn default() -> Self {
        Self {
            default_chunk_size: 1000,
            default_segment_size: 30,
            min_chunk_size: 200,
            max_chunk_size: 20_000,
            max_segment_size: 200,
            max_attempts: 1,
        }
    }
}

/// Keypoint extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Maximum segment calls in flight at once.
    pub max_concurrent_segments: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            max_concurrent_segments: 8,
        }
    }
}

/// Web search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Base URL of the Tavily API.
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Results requested per topic.
    pub max_results: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.tavily.com".to_string(),
            api_key_env: "TAVILY_API_KEY".to_string(),
            max_results: 3,
            timeout_secs: 60,
        }
    }
}

impl SearchSettings {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Final narrative settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterSettings {
    /// Let the writer fill gaps with its own knowledge when sources run short.
    pub allow_filler: bool,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self { allow_filler: true }
    }
}

/// Interactive session and server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Number of results kept in the in-memory history.
    pub history_limit: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { history_limit: 20 }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::RecapError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recap")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [planning]
            default_segment_size = 12

            [models.worker]
            model = "gemini-2.0-flash"

            [models.planner]
            temperature = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(settings.planning.default_segment_size, 12);
        assert_eq!(settings.planning.default_chunk_size, 1000);

        let worker = &settings.models.worker;
        assert_eq!(worker.model, "gemini-2.0-flash");
        assert_eq!(worker.api_key_env, "GEMINI_API_KEY");
        assert_eq!(
            worker.api_base,
            "https://generativelanguage.googleapis.com/v1beta/openai"
        );

        let planner = &settings.models.planner;
        assert_eq!(planner.temperature, 0.5);
        assert_eq!(planner.model, "llama-3.3-70b-versatile");
        assert_eq!(planner.api_key_env, "GROQ_API_KEY");
        assert_eq!(planner.api_base, "https://api.groq.com/openai/v1");
        assert_eq!(settings.transcript.languages, vec!["en", "id"]);
        assert_eq!(settings.search.max_results, 3);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.general.default_length = SummaryLength::Long;
        settings.writer.allow_filler = false;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.general.default_length, SummaryLength::Long);
        assert!(!loaded.writer.allow_filler);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = PathBuf::from("/nonexistent/recap/config.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.session.history_limit, 20);
    }

    #[test]
    fn test_saved_models_reload_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.models.worker.model = "gemini-2.0-flash".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.models.worker.model, "gemini-2.0-flash");
        assert_eq!(loaded.models.planner.model, "llama-3.3-70b-versatile");
    }
}
