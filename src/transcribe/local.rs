use super::provider::TranscriptionProvider;
use crate::config::LocalWhisperConfig;
use crate::transcript::{TranscriptResult, TranscriptSegment};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tracing::info;

/// Local whisper.cpp engine driven through its CLI. Last resort in the
/// provider chain: no network, no size limit, but slow.
pub struct LocalWhisperProvider {
    config: LocalWhisperConfig,
    language: String,
}

impl LocalWhisperProvider {
    pub fn new(config: LocalWhisperConfig, language: String) -> Self {
        Self { config, language }
    }
}

/// whisper.cpp `-oj` output shape.
#[derive(Debug, Deserialize)]
struct WhisperCppOutput {
    #[serde(default)]
    result: Option<WhisperCppResult>,
    #[serde(default)]
    transcription: Vec<WhisperCppSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperCppResult {
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhisperCppSegment {
    offsets: WhisperCppOffsets,
    text: String,
}

#[derive(Debug, Deserialize)]
struct WhisperCppOffsets {
    /// Milliseconds.
    from: u64,
    to: u64,
}

#[async_trait]
impl TranscriptionProvider for LocalWhisperProvider {
    fn name(&self) -> &str {
        "local-whisper"
    }

    async fn transcribe(&self, path: &Path) -> Result<TranscriptResult> {
        let out_prefix = path.with_extension("whisper");
        let json_path = out_prefix.with_extension("whisper.json");

        info!("Running local whisper engine on {}", path.display());

        let output = Command::new(&self.config.binary)
            .arg("-m")
            .arg(&self.config.model_path)
            .arg("-f")
            .arg(path)
            .args(["-l", &self.language])
            .arg("-oj")
            .arg("-of")
            .arg(&out_prefix)
            .arg("-np")
            .output()
            .await
            .with_context(|| format!("failed to launch {}", self.config.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "local whisper engine failed: {}",
                stderr.lines().last().unwrap_or("non-zero exit")
            );
        }

        let raw = tokio::fs::read_to_string(&json_path)
            .await
            .with_context(|| format!("missing whisper output {}", json_path.display()))?;
        let _ = tokio::fs::remove_file(&json_path).await;

        let parsed: WhisperCppOutput =
            serde_json::from_str(&raw).context("failed to decode whisper.cpp JSON")?;

        let segments: Vec<TranscriptSegment> = parsed
            .transcription
            .iter()
            .map(|seg| TranscriptSegment {
                start: seg.offsets.from as f64 / 1000.0,
                end: seg.offsets.to as f64 / 1000.0,
                text: seg.text.trim().to_string(),
            })
            .collect();

        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let duration = segments.last().map(|s| s.end).unwrap_or(0.0);

        Ok(TranscriptResult {
            text,
            segments,
            language: parsed
                .result
                .and_then(|r| r.language)
                .unwrap_or_else(|| self.language.clone()),
            duration,
        })
    }
}
