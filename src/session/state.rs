use crate::analysis::AnalysisResult;
use crate::transcript::TranscriptResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a session. The serialized strings are part of the
/// wire protocol and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Uploading,
    ProcessingAudio,
    Transcribing,
    Analyzing,
    Done,
    Error,
}

/// Full state of one session, from asset registration through analysis.
/// Serialized camelCase to match the client contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub id: String,
    pub status: SessionStatus,

    /// 0-100, meaningful within the current status only; resets to 0 on a
    /// status transition.
    pub progress: u8,

    pub filename: String,

    /// Path of the original asset; empty for transcript-only sessions.
    pub filepath: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<TranscriptResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Last LLM model used for analysis, informational.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Last transcription provider that succeeded, informational.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whisper_provider: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl SessionState {
    /// A freshly registered video session.
    pub fn new_upload(id: String, filename: String, filepath: String) -> Self {
        Self {
            id,
            status: SessionStatus::Uploading,
            progress: 100,
            filename,
            filepath,
            audio_path: None,
            transcript: None,
            analysis: None,
            error: None,
            model: None,
            whisper_provider: None,
            created_at: Utc::now(),
        }
    }

    /// A transcript-only session: enters directly at `done` with the
    /// transcript attached and no analysis.
    pub fn new_transcript(id: String, filename: String, transcript: TranscriptResult) -> Self {
        Self {
            id,
            status: SessionStatus::Done,
            progress: 100,
            filename,
            filepath: String::new(),
            audio_path: None,
            transcript: Some(transcript),
            analysis: None,
            error: None,
            model: None,
            whisper_provider: None,
            created_at: Utc::now(),
        }
    }
}

/// Partial update applied to a session via [`SessionStore::update`].
///
/// Shallow merge: a `Some` field replaces the whole value (an entire
/// transcript or analysis object, never a deep merge of nested fields).
///
/// [`SessionStore::update`]: super::SessionStore::update
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub status: Option<SessionStatus>,
    pub progress: Option<u8>,
    pub audio_path: Option<String>,
    pub transcript: Option<TranscriptResult>,
    pub analysis: Option<AnalysisResult>,
    pub error: Option<String>,
    pub model: Option<String>,
    pub whisper_provider: Option<String>,
}

impl SessionUpdate {
    pub fn status(status: SessionStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn progress(progress: u8) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Apply this update onto an existing state.
    pub(super) fn apply(self, state: &mut SessionState) {
        if let Some(status) = self.status {
            state.status = status;
        }
        if let Some(progress) = self.progress {
            state.progress = progress;
        }
        if let Some(audio_path) = self.audio_path {
            state.audio_path = Some(audio_path);
        }
        if let Some(transcript) = self.transcript {
            state.transcript = Some(transcript);
        }
        if let Some(analysis) = self.analysis {
            state.analysis = Some(analysis);
        }
        if let Some(error) = self.error {
            state.error = Some(error);
        }
        if let Some(model) = self.model {
            state.model = Some(model);
        }
        if let Some(whisper_provider) = self.whisper_provider {
            state.whisper_provider = Some(whisper_provider);
        }
    }
}
