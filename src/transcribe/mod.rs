//! Transcription provider chain
//!
//! An ordered list of speech-to-text backends tried in sequence until one
//! succeeds. Providers tend to fail deterministically (quota, unsupported
//! format), so the chain moves on instead of retrying with delays; provider
//! diversity is the retry strategy.

mod local;
mod provider;

pub use local::LocalWhisperProvider;
pub use provider::{RemoteWhisperProvider, TranscriptionProvider};

use crate::config::TranscriptionConfig;
use crate::error::TranscribeError;
use crate::media::{cleanup_chunks, needs_chunking, split_audio};
use crate::transcript::{merge_transcripts, TranscriptResult};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Per-chunk progress event forwarded to the session store by the caller.
#[derive(Debug, Clone)]
pub struct TranscribeProgress {
    /// 0-100 across the whole transcription.
    pub percent: u8,

    /// Provider that succeeded for the chunk behind this event.
    pub provider: String,
}

/// Ordered transcription backends with whole-file and chunked entry points.
pub struct ProviderChain {
    providers: Vec<Box<dyn TranscriptionProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Box<dyn TranscriptionProvider>>) -> Self {
        Self { providers }
    }

    /// Build the chain from config: remote endpoints in listed order, the
    /// local engine appended as last resort when configured.
    pub fn from_config(config: &TranscriptionConfig) -> Self {
        let mut providers: Vec<Box<dyn TranscriptionProvider>> = config
            .remotes
            .iter()
            .map(|remote| {
                Box::new(RemoteWhisperProvider::new(
                    remote.clone(),
                    config.language.clone(),
                )) as Box<dyn TranscriptionProvider>
            })
            .collect();

        if let Some(local) = &config.local {
            providers.push(Box::new(LocalWhisperProvider::new(
                local.clone(),
                config.language.clone(),
            )));
        }

        Self { providers }
    }

    /// One attempt per provider, in order. Returns the first success along
    /// with the provider's name; `AllProvidersFailed` carries the last
    /// underlying error once the chain is exhausted.
    pub async fn transcribe_file(
        &self,
        path: &Path,
    ) -> Result<(TranscriptResult, String), TranscribeError> {
        let mut last_error = "no providers configured".to_string();

        for provider in &self.providers {
            info!("Trying transcription provider: {}", provider.name());
            match provider.transcribe(path).await {
                Ok(result) => {
                    info!(
                        "Provider {} succeeded ({} segments)",
                        provider.name(),
                        result.segments.len()
                    );
                    return Ok((result, provider.name().to_string()));
                }
                Err(e) => {
                    warn!("Provider {} failed: {:#}", provider.name(), e);
                    last_error = format!("{:#}", e);
                }
            }
        }

        Err(TranscribeError::AllProvidersFailed(last_error))
    }

    /// Transcribe a whole audio file, splitting it first when it exceeds
    /// the provider size limit.
    ///
    /// The chunked path reuses the full fallback ordering per chunk (a
    /// later chunk may succeed on a different provider than an earlier
    /// one), shifts each chunk's segments by its start offset, and merges.
    /// Chunk files are cleaned up on every exit path. A single chunk
    /// exhausting the chain aborts the entire transcription; no partial
    /// transcript is surfaced.
    pub async fn transcribe_audio(
        &self,
        path: &Path,
        progress: mpsc::Sender<TranscribeProgress>,
    ) -> Result<(TranscriptResult, String), TranscribeError> {
        if !needs_chunking(path)? {
            let _ = progress
                .send(TranscribeProgress {
                    percent: 10,
                    provider: String::new(),
                })
                .await;
            let (result, provider) = self.transcribe_file(path).await?;
            let _ = progress
                .send(TranscribeProgress {
                    percent: 100,
                    provider: provider.clone(),
                })
                .await;
            return Ok((result, provider));
        }

        info!("Audio needs chunking for transcription");
        let chunks = split_audio(path).await?;
        let outcome = self.transcribe_chunks(&chunks, progress).await;
        cleanup_chunks(&chunks);
        outcome
    }

    /// Transcribe already-split chunks and merge them onto the global
    /// timeline. The caller owns chunk cleanup.
    pub async fn transcribe_chunks(
        &self,
        chunks: &[crate::media::AudioChunk],
        progress: mpsc::Sender<TranscribeProgress>,
    ) -> Result<(TranscriptResult, String), TranscribeError> {
        let total = chunks.len();
        let mut results = Vec::with_capacity(total);
        let mut last_provider = String::new();

        for chunk in chunks {
            info!("Transcribing chunk {}/{}", chunk.index + 1, total);
            let (mut result, provider) = self.transcribe_file(&chunk.path).await?;

            result.shift(chunk.start_offset);
            results.push(result);
            last_provider = provider.clone();

            let percent = (((chunk.index + 1) as f64 / total as f64) * 100.0).round() as u8;
            let _ = progress.send(TranscribeProgress { percent, provider }).await;
        }

        Ok((merge_transcripts(results), last_provider))
    }
}
