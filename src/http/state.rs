use crate::analysis::AnalysisPipeline;
use crate::session::SessionStore;
use crate::transcribe::ProviderChain;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single source of truth for all session state.
    pub store: SessionStore,

    /// Ordered transcription backends.
    pub chain: Arc<ProviderChain>,

    /// Transcript-to-analysis orchestrator.
    pub pipeline: Arc<AnalysisPipeline>,

    /// Where registered assets and extracted audio live.
    pub upload_dir: PathBuf,
}
