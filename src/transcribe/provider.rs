use crate::config::RemoteWhisperConfig;
use crate::transcript::{TranscriptResult, TranscriptSegment};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

/// A speech-to-text backend. Remote APIs and the local engine hide their
/// transport differences behind this one capability.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Provider label used in logs and session metadata.
    fn name(&self) -> &str;

    /// One transcription attempt for one file. No internal retry: the
    /// chain treats provider diversity as the retry strategy.
    async fn transcribe(&self, path: &Path) -> Result<TranscriptResult>;
}

/// OpenAI-compatible remote transcription API (endpoint + credential +
/// model id), speaking the multipart `verbose_json` dialect.
pub struct RemoteWhisperProvider {
    config: RemoteWhisperConfig,
    language: String,
    client: reqwest::Client,
}

impl RemoteWhisperProvider {
    pub fn new(config: RemoteWhisperConfig, language: String) -> Self {
        Self {
            config,
            language,
            client: reqwest::Client::new(),
        }
    }

    fn api_key(&self) -> Result<String> {
        std::env::var(&self.config.api_key_env)
            .with_context(|| format!("missing API key env var {}", self.config.api_key_env))
    }
}

#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    text: String,
    language: Option<String>,
    duration: Option<f64>,
    #[serde(default)]
    segments: Vec<VerboseSegment>,
}

#[derive(Debug, Deserialize)]
struct VerboseSegment {
    start: f64,
    end: f64,
    text: String,
}

#[async_trait]
impl TranscriptionProvider for RemoteWhisperProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn transcribe(&self, path: &Path) -> Result<TranscriptResult> {
        let api_key = self.api_key()?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());
        let mime = match path.extension().and_then(|e| e.to_str()) {
            Some("mp3") => "audio/mpeg",
            _ => "audio/wav",
        };

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment")
            .text("language", self.language.clone());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.config.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .context("transcription request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("transcription API returned {status}: {body}");
        }

        let parsed: VerboseTranscription = response
            .json()
            .await
            .context("failed to decode transcription response")?;

        let segments = parsed
            .segments
            .into_iter()
            .map(|seg| TranscriptSegment {
                start: seg.start,
                end: seg.end,
                text: seg.text.trim().to_string(),
            })
            .collect();

        Ok(TranscriptResult {
            text: parsed.text,
            segments,
            language: parsed.language.unwrap_or_else(|| self.language.clone()),
            duration: parsed.duration.unwrap_or(0.0),
        })
    }
}
