use super::state::AppState;
use crate::analysis::{default_model, AVAILABLE_MODELS};
use crate::export::{generate_edl, generate_fcpxml, generate_json, generate_markdown, ExportFormat};
use crate::media::extract_audio;
use crate::session::{SessionState, SessionStatus, SessionUpdate};
use crate::transcript::{parse_transcript, TranscriptFormat};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Json},
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use tokio::sync::mpsc;
use tokio_stream::wrappers::{BroadcastStream, ReceiverStream};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterSessionRequest {
    /// Path of an already-on-disk video file (upload handling is external).
    pub filepath: String,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadTranscriptRequest {
    pub filename: String,
    pub content: String,
    /// txt, json or srt; derived from the filename extension when absent.
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub id: String,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/sessions
/// Register a video file and start audio extraction in the background.
pub async fn register_session(
    State(state): State<AppState>,
    Json(req): Json<RegisterSessionRequest>,
) -> impl IntoResponse {
    if !FsPath::new(&req.filepath).exists() {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("file not found: {}", req.filepath),
        );
    }

    let session_id = uuid::Uuid::new_v4().to_string();
    let session =
        SessionState::new_upload(session_id.clone(), req.filename.clone(), req.filepath.clone());

    if let Err(e) = state.store.create(session).await {
        error!("Failed to create session: {}", e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }

    info!("Registered {} -> session {}", req.filename, session_id);

    // Extract audio in the background; progress flows via the status stream.
    let store = state.store.clone();
    let id = session_id.clone();
    tokio::spawn(async move {
        let _ = store
            .update(
                &id,
                SessionUpdate::status(SessionStatus::ProcessingAudio).with_progress(0),
            )
            .await;

        let (progress_tx, mut progress_rx) = mpsc::channel::<u8>(16);
        let progress_store = store.clone();
        let progress_id = id.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(percent) = progress_rx.recv().await {
                let _ = progress_store
                    .update(&progress_id, SessionUpdate::progress(percent))
                    .await;
            }
        });

        let result = extract_audio(FsPath::new(&req.filepath), progress_tx).await;
        let _ = forwarder.await;

        match result {
            Ok(audio_path) => {
                info!("Audio ready for session {}: {}", id, audio_path.display());
                let _ = store
                    .update(
                        &id,
                        SessionUpdate {
                            status: Some(SessionStatus::ProcessingAudio),
                            progress: Some(100),
                            audio_path: Some(audio_path.to_string_lossy().to_string()),
                            ..Default::default()
                        },
                    )
                    .await;
            }
            Err(e) => {
                error!("Audio extraction failed for session {}: {}", id, e);
                let _ = store
                    .update(
                        &id,
                        SessionUpdate::status(SessionStatus::Error).with_error(e.to_string()),
                    )
                    .await;
            }
        }
    });

    (
        StatusCode::OK,
        Json(SessionCreatedResponse {
            id: session_id,
            filename: req.filename,
        }),
    )
        .into_response()
}

/// POST /api/sessions/transcript
/// Ingest a pre-existing transcript; the session enters directly at `done`.
pub async fn upload_transcript(
    State(state): State<AppState>,
    Json(req): Json<UploadTranscriptRequest>,
) -> impl IntoResponse {
    let format_hint = req.format.clone().unwrap_or_else(|| {
        FsPath::new(&req.filename)
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "txt".to_string())
    });

    let format = match TranscriptFormat::from_extension(&format_hint) {
        Ok(format) => format,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let transcript = match parse_transcript(&req.content, format) {
        Ok(transcript) => transcript,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let session_id = uuid::Uuid::new_v4().to_string();
    let segments = transcript.segments.len();
    let session =
        SessionState::new_transcript(session_id.clone(), req.filename.clone(), transcript);

    if let Err(e) = state.store.create(session).await {
        error!("Failed to create session: {}", e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }

    info!(
        "Transcript upload: {} -> session {} ({} segments)",
        req.filename, session_id, segments
    );

    (
        StatusCode::OK,
        Json(SessionCreatedResponse {
            id: session_id,
            filename: req.filename,
        }),
    )
        .into_response()
}

/// GET /api/status/:id
/// SSE stream of full session snapshots, one event per store update.
pub async fn status_stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let (snapshot, rx) = match state.store.subscribe(&id).await {
        Ok(sub) => sub,
        Err(e) => return error_response(StatusCode::NOT_FOUND, e.to_string()),
    };

    let initial = futures::stream::once(async move { Event::default().json_data(&snapshot) });
    let updates = BroadcastStream::new(rx).filter_map(|item| async move {
        // A lagged subscriber just skips to the next snapshot; there is no
        // event log to replay.
        item.ok().map(|session| Event::default().json_data(&session))
    });

    Sse::new(initial.chain(updates))
        .keep_alive(KeepAlive::default())
        .into_response()
}

/// POST /api/transcribe/:id
/// Trigger the provider chain; responds immediately, progress flows via
/// the status stream.
pub async fn transcribe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let session = match state.store.get(&id).await {
        Some(session) => session,
        None => return error_response(StatusCode::NOT_FOUND, "session not found"),
    };

    let Some(audio_path) = session.audio_path else {
        return error_response(StatusCode::BAD_REQUEST, "audio is not ready yet");
    };

    // Transcripts are immutable once set; analysis can re-run against it.
    if let Some(transcript) = session.transcript {
        return (StatusCode::OK, Json(serde_json::json!({ "transcript": transcript })))
            .into_response();
    }

    let _ = state
        .store
        .update(
            &id,
            SessionUpdate::status(SessionStatus::Transcribing).with_progress(0),
        )
        .await;

    let store = state.store.clone();
    let chain = state.chain.clone();
    tokio::spawn(async move {
        let (progress_tx, mut progress_rx) = mpsc::channel(16);
        let progress_store = store.clone();
        let progress_id = id.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(progress) = progress_rx.recv().await {
                let progress: crate::transcribe::TranscribeProgress = progress;
                let update = SessionUpdate {
                    progress: Some(progress.percent),
                    whisper_provider: (!progress.provider.is_empty())
                        .then_some(progress.provider),
                    ..Default::default()
                };
                let _ = progress_store.update(&progress_id, update).await;
            }
        });

        let result = chain
            .transcribe_audio(FsPath::new(&audio_path), progress_tx)
            .await;
        let _ = forwarder.await;

        match result {
            Ok((transcript, provider)) => {
                info!(
                    "Transcription complete for session {}: {} segments",
                    id,
                    transcript.segments.len()
                );
                let _ = store
                    .update(
                        &id,
                        SessionUpdate {
                            status: Some(SessionStatus::Transcribing),
                            progress: Some(100),
                            transcript: Some(transcript),
                            whisper_provider: Some(provider),
                            ..Default::default()
                        },
                    )
                    .await;
            }
            Err(e) => {
                error!("Transcription error for session {}: {}", id, e);
                let _ = store
                    .update(
                        &id,
                        SessionUpdate::status(SessionStatus::Error).with_error(e.to_string()),
                    )
                    .await;
            }
        }
    });

    (
        StatusCode::OK,
        Json(AckResponse {
            message: "transcription started".to_string(),
        }),
    )
        .into_response()
}

/// Aborts the analysis task when the SSE response is dropped: client
/// disconnect cancels the in-flight LLM call, no terminal event fires and
/// the session stays as-is.
struct AbortOnDrop(tokio::task::JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// POST /api/analyze/:id
/// SSE stream of progress/done/error events for one analysis attempt.
pub async fn analyze(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    let session = match state.store.get(&id).await {
        Some(session) => session,
        None => return error_response(StatusCode::NOT_FOUND, "session not found"),
    };

    if session.transcript.is_none() {
        return error_response(StatusCode::BAD_REQUEST, "transcript is not ready yet");
    }

    let model = req.model.unwrap_or_else(|| default_model().to_string());

    let (events_tx, events_rx) = mpsc::channel(16);
    let pipeline = state.pipeline.clone();
    let handle = tokio::spawn(async move {
        // Terminal state and event are the pipeline's responsibility.
        let _ = pipeline.run(&id, &model, events_tx).await;
    });

    let guard = AbortOnDrop(handle);
    let stream = ReceiverStream::new(events_rx).map(move |event| {
        let _ = &guard;
        Event::default().json_data(&event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

/// GET /api/analyze/models
pub async fn list_models() -> impl IntoResponse {
    Json(serde_json::json!({ "models": AVAILABLE_MODELS }))
}

/// GET /api/export/:id?format=json|markdown|edl|fcpxml
pub async fn export(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    let session = match state.store.get(&id).await {
        Some(session) => session,
        None => return error_response(StatusCode::NOT_FOUND, "session not found"),
    };

    let Some(analysis) = session.analysis.clone() else {
        return error_response(StatusCode::BAD_REQUEST, "analysis is not ready yet");
    };

    let format = ExportFormat::from_query(query.format.as_deref());
    let body = match format {
        ExportFormat::Json => generate_json(&session).to_string(),
        ExportFormat::Markdown => generate_markdown(&session, &analysis),
        ExportFormat::Edl => generate_edl(&analysis, &session.filename),
        ExportFormat::Fcpxml => {
            let duration = session.transcript.as_ref().map(|t| t.duration).unwrap_or(0.0);
            generate_fcpxml(&analysis, &session.filename, duration)
        }
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"reelcutter-{}.{}\"",
                    session.id,
                    format.extension()
                ),
            ),
        ],
        body,
    )
        .into_response()
}

/// GET /api/health
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
