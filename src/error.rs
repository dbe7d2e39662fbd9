//! Error types, one enum per pipeline stage.

use thiserror::Error;

/// Session store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session {0} already exists")]
    AlreadyExists(String),

    #[error("session {0} not found")]
    NotFound(String),
}

/// ffmpeg/ffprobe subprocess failures.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("audio extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("audio chunking failed: {0}")]
    ChunkingFailed(String),

    #[error("media probe failed: {0}")]
    ProbeFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Transcription failures. Individual provider errors are logged and
/// folded into `AllProvidersFailed` once the chain is exhausted.
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("all transcription providers failed, last error: {0}")]
    AllProvidersFailed(String),

    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Analysis failures, from the precondition check through LLM invocation
/// and response recovery.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("session has no transcript yet")]
    TranscriptNotReady,

    #[error("LLM unavailable after {attempts} attempts: {message}")]
    LlmUnavailable { attempts: u32, message: String },

    #[error("model refused to analyze: {0}")]
    ModelRefused(String),

    #[error("could not recover JSON from the model response")]
    UnparseableResponse,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Transcript upload parsing failures.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported transcript format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid transcript JSON: {0}")]
    InvalidJson(String),

    #[error("SRT file contains no cues")]
    EmptySrt,
}
