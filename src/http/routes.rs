use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/api/health", get(handlers::health_check))
        // Session creation
        .route("/api/sessions", post(handlers::register_session))
        .route("/api/sessions/transcript", post(handlers::upload_transcript))
        // Live session snapshots
        .route("/api/status/:id", get(handlers::status_stream))
        // Pipeline triggers
        .route("/api/transcribe/:id", post(handlers::transcribe))
        .route("/api/analyze/models", get(handlers::list_models))
        .route("/api/analyze/:id", post(handlers::analyze))
        // Export
        .route("/api/export/:id", get(handlers::export))
        // Request logging + permissive CORS for the local client
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
