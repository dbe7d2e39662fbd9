pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod http;
pub mod media;
pub mod session;
pub mod transcribe;
pub mod transcript;

pub use analysis::{
    AnalysisPipeline, AnalysisResult, AnalyzeEvent, LlmClient, ModelOption, AVAILABLE_MODELS,
};
pub use config::Config;
pub use http::{create_router, AppState};
pub use session::{SessionState, SessionStatus, SessionStore, SessionUpdate};
pub use transcribe::{ProviderChain, TranscribeProgress, TranscriptionProvider};
pub use transcript::{merge_transcripts, TranscriptResult, TranscriptSegment};
