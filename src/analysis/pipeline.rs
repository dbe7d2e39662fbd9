//! Streaming analysis orchestrator
//!
//! Drives prompt building, the LLM call, JSON recovery and normalization
//! for one analysis attempt, with the session store as the single source
//! of truth. Emits progress events followed by exactly one terminal
//! `done` or `error` event; no partial analysis is ever committed.

use super::llm::LlmClient;
use super::normalize::normalize_analysis;
use super::prompt::{build_analysis_prompt, format_transcript_with_timecodes};
use super::repair::parse_analysis_json;
use super::types::AnalysisResult;
use crate::error::AnalysisError;
use crate::session::{SessionStatus, SessionStore, SessionUpdate};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

/// The one capability the orchestrator needs from an LLM backend. Seam for
/// tests; [`LlmClient`] is the production implementation.
#[async_trait]
pub trait LlmInvoker: Send + Sync {
    async fn invoke(&self, prompt: &str, model: &str) -> Result<String, AnalysisError>;
}

#[async_trait]
impl LlmInvoker for LlmClient {
    async fn invoke(&self, prompt: &str, model: &str) -> Result<String, AnalysisError> {
        LlmClient::invoke(self, prompt, model).await
    }
}

/// One event on the analysis stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnalyzeEvent {
    Progress { message: String },
    Done { analysis: AnalysisResult },
    Error { error: String },
}

pub struct AnalysisPipeline {
    store: SessionStore,
    llm: Arc<dyn LlmInvoker>,
}

impl AnalysisPipeline {
    pub fn new(store: SessionStore, llm: Arc<dyn LlmInvoker>) -> Self {
        Self { store, llm }
    }

    /// Run one analysis attempt for the session.
    ///
    /// Fails fast with `TranscriptNotReady` before touching the session if
    /// no transcript is attached. Afterwards every outcome is reflected in
    /// the store (`done` + analysis, or `error` + message) and mirrored by
    /// the single terminal event sent to `events`.
    pub async fn run(
        &self,
        session_id: &str,
        model: &str,
        events: mpsc::Sender<AnalyzeEvent>,
    ) -> Result<(), AnalysisError> {
        let session = self
            .store
            .get(session_id)
            .await
            .ok_or_else(|| crate::error::StoreError::NotFound(session_id.to_string()))?;

        let transcript = session
            .transcript
            .clone()
            .ok_or(AnalysisError::TranscriptNotReady)?;

        self.store
            .update(
                session_id,
                SessionUpdate {
                    status: Some(SessionStatus::Analyzing),
                    progress: Some(0),
                    model: Some(model.to_string()),
                    ..Default::default()
                },
            )
            .await?;

        let _ = events
            .send(AnalyzeEvent::Progress {
                message: "Analyzing transcript...".to_string(),
            })
            .await;

        let outcome = async {
            let timecoded = format_transcript_with_timecodes(&transcript);
            let prompt = build_analysis_prompt(&timecoded, transcript.duration);

            let raw = self.llm.invoke(&prompt, model).await?;
            info!("Parsing response ({} chars)", raw.len());

            let parsed = parse_analysis_json(&raw)?;
            Ok::<_, AnalysisError>(normalize_analysis(&parsed))
        }
        .await;

        match outcome {
            Ok(analysis) => {
                self.store
                    .update(
                        session_id,
                        SessionUpdate {
                            status: Some(SessionStatus::Done),
                            progress: Some(100),
                            analysis: Some(analysis.clone()),
                            ..Default::default()
                        },
                    )
                    .await?;

                info!(
                    "Analysis complete for session {}: {} reels found",
                    session_id,
                    analysis.reels.len()
                );
                let _ = events.send(AnalyzeEvent::Done { analysis }).await;
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                error!("Analysis error for session {}: {}", session_id, message);

                self.store
                    .update(
                        session_id,
                        SessionUpdate::status(SessionStatus::Error).with_error(message.clone()),
                    )
                    .await?;

                let _ = events.send(AnalyzeEvent::Error { error: message }).await;
                Err(e)
            }
        }
    }
}
