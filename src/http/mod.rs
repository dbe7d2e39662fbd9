//! HTTP API for the pipeline (upload plumbing and the web UI live
//! elsewhere; this is the wire protocol they consume):
//! - POST /api/sessions - register a video file, extract audio
//! - POST /api/sessions/transcript - ingest a ready transcript
//! - GET  /api/status/:id - SSE stream of session snapshots
//! - POST /api/transcribe/:id - run the transcription provider chain
//! - POST /api/analyze/:id - SSE stream of one analysis attempt
//! - GET  /api/analyze/models - model catalog
//! - GET  /api/export/:id - markdown/json/edl/fcpxml export
//! - GET  /api/health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
