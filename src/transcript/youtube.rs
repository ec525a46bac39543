//! YouTube transcript source backed by yt-dlp captions.

use super::{parse_vtt, Transcript, TranscriptSource};
use crate::config::TranscriptSettings;
use crate::error::{RecapError, Result};
use crate::router::video_id;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Fetches manual or auto-generated captions through yt-dlp.
pub struct YoutubeTranscriptSource {
    ytdlp: String,
    languages: Vec<String>,
}

impl YoutubeTranscriptSource {
    pub fn with_config(settings: &TranscriptSettings) -> Self {
        Self {
            ytdlp: settings.ytdlp_path.clone(),
            languages: settings.languages.clone(),
        }
    }

    /// Download the captions for one language into `dir`.
    ///
    /// Returns `None` when the video has no captions in that language.
    async fn download_captions(&self, url: &str, language: &str, dir: &Path) -> Result<Option<PathBuf>> {
        let template = dir.join(format!("captions.{}.%(ext)s", language));

        let result = Command::new(&self.ytdlp)
            .arg("--skip-download")
            .arg("--write-subs")
            .arg("--write-auto-subs")
            .arg("--sub-langs").arg(language)
            .arg("--sub-format").arg("vtt")
            .arg("--output").arg(template.to_str().unwrap_or_default())
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RecapError::ToolNotFound(self.ytdlp.clone()));
            }
            Err(e) => {
                return Err(RecapError::ToolFailed(format!("yt-dlp execution failed: {e}")));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecapError::TranscriptUnavailable(format!(
                "yt-dlp failed for {url}: {}",
                stderr.trim()
            )));
        }

        Ok(find_caption_file(dir, language))
    }
}

/// Locate the VTT file yt-dlp wrote for a language.
fn find_caption_file(dir: &Path, language: &str) -> Option<PathBuf> {
    let prefix = format!("captions.{}.", language);
    std::fs::read_dir(dir).ok()?.flatten().map(|e| e.path()).find(|p| {
        let name = p.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        name.starts_with(&prefix) && name.ends_with(".vtt")
    })
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Transcript> {
        let id = video_id(url);
        let dir = tempfile::tempdir()?;
        let mut last_error = None;

        for language in &self.languages {
            debug!("Requesting {} captions", language);

            let path = match self.download_captions(url, language, dir.path()).await {
                Ok(Some(path)) => path,
                Ok(None) => {
                    debug!("No {} captions available", language);
                    continue;
                }
                Err(e @ (RecapError::TranscriptUnavailable(_) | RecapError::ToolFailed(_))) => {
                    warn!("{} captions failed: {}", language, e);
                    last_error = Some(e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let vtt = std::fs::read_to_string(&path)?;
            let transcript = Transcript::new(id.clone(), language, parse_vtt(&vtt));

            if transcript.is_empty() {
                warn!("{} captions were empty", language);
                continue;
            }

            info!(
                "Loaded {} transcript: {} segments, {:.0}s",
                language,
                transcript.segments.len(),
                transcript.duration_seconds()
            );
            return Ok(transcript);
        }

        let mut message = format!(
            "no captions found for {} in languages [{}]",
            url,
            self.languages.join(", ")
        );
        if let Some(e) = last_error {
            message.push_str(&format!(" (last error: {})", e));
        }
        Err(RecapError::TranscriptUnavailable(message))
    }
}
