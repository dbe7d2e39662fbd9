// Integration tests for the analysis orchestrator
//
// These tests drive the full run with a scripted LLM backend: progress
// events, the single terminal event and the committed session state.

use anyhow::Result;
use async_trait::async_trait;
use reelcutter::analysis::{AnalysisPipeline, AnalyzeEvent, LlmInvoker};
use reelcutter::error::AnalysisError;
use reelcutter::session::{SessionState, SessionStatus, SessionStore};
use reelcutter::transcript::{TranscriptResult, TranscriptSegment};
use std::sync::Arc;
use tokio::sync::mpsc;

/// LLM backend returning a fixed response for every prompt.
struct CannedLlm {
    response: Result<String, fn() -> AnalysisError>,
}

impl CannedLlm {
    fn ok(response: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(response.to_string()),
        })
    }

    fn err(make: fn() -> AnalysisError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(make),
        })
    }
}

#[async_trait]
impl LlmInvoker for CannedLlm {
    async fn invoke(&self, _prompt: &str, _model: &str) -> Result<String, AnalysisError> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(make) => Err(make()),
        }
    }
}

fn sample_transcript() -> TranscriptResult {
    TranscriptResult {
        text: "welcome to the channel".to_string(),
        segments: vec![TranscriptSegment {
            start: 0.0,
            end: 4.0,
            text: "welcome to the channel".to_string(),
        }],
        language: "pl".to_string(),
        duration: 4.0,
    }
}

async fn store_with_transcript_session(id: &str) -> Result<SessionStore> {
    let store = SessionStore::new();
    store
        .create(SessionState::new_transcript(
            id.to_string(),
            "talk.srt".to_string(),
            sample_transcript(),
        ))
        .await?;
    Ok(store)
}

async fn collect_events(mut rx: mpsc::Receiver<AnalyzeEvent>) -> Vec<AnalyzeEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

const VALID_RESPONSE: &str = r#"{
  "summary": "A channel intro.",
  "reels": [
    {
      "title": "Intro hook",
      "start": "00:00",
      "end": "00:04",
      "duration": "4s",
      "hook": "welcome",
      "priority": "high",
      "why": "strong open",
      "ctr_potential": 8
    }
  ],
  "hooks": [],
  "structure_notes": "",
  "titles": [],
  "thumbnails": [],
  "engagement_map": []
}"#;

#[tokio::test]
async fn test_successful_run_commits_analysis_and_emits_done() -> Result<()> {
    let store = store_with_transcript_session("s1").await?;
    let pipeline = AnalysisPipeline::new(store.clone(), CannedLlm::ok(VALID_RESPONSE));

    let (tx, rx) = mpsc::channel(16);
    pipeline.run("s1", "google/gemini-3-flash-preview", tx).await?;

    let events = collect_events(rx).await;
    assert!(matches!(events.first(), Some(AnalyzeEvent::Progress { .. })));
    assert!(
        matches!(events.last(), Some(AnalyzeEvent::Done { .. })),
        "Stream ends with the terminal done event"
    );
    let terminals = events
        .iter()
        .filter(|e| matches!(e, AnalyzeEvent::Done { .. } | AnalyzeEvent::Error { .. }))
        .count();
    assert_eq!(terminals, 1, "Exactly one terminal event");

    let state = store.get("s1").await.expect("session should exist");
    assert_eq!(state.status, SessionStatus::Done);
    assert_eq!(state.progress, 100);
    assert_eq!(state.model.as_deref(), Some("google/gemini-3-flash-preview"));

    let analysis = state.analysis.expect("analysis committed to the store");
    assert_eq!(analysis.summary, "A channel intro.");
    assert_eq!(analysis.reels.len(), 1);
    assert_eq!(analysis.reels[0].ctr_potential, 8.0);

    Ok(())
}

#[tokio::test]
async fn test_refusal_sets_error_status_and_emits_error_event() -> Result<()> {
    let store = store_with_transcript_session("s1").await?;
    // Short answer with no JSON object is treated as a refusal.
    let pipeline = AnalysisPipeline::new(
        store.clone(),
        CannedLlm::ok("I'm sorry, I cannot analyze this transcript."),
    );

    let (tx, rx) = mpsc::channel(16);
    let result = pipeline.run("s1", "openai/gpt-5.1", tx).await;
    assert!(result.is_err());

    let events = collect_events(rx).await;
    assert!(
        matches!(events.last(), Some(AnalyzeEvent::Error { .. })),
        "Stream ends with the terminal error event"
    );

    let state = store.get("s1").await.expect("session should exist");
    assert_eq!(state.status, SessionStatus::Error);
    assert!(state.error.is_some());
    assert!(state.analysis.is_none(), "No partial analysis is committed");

    Ok(())
}

#[tokio::test]
async fn test_llm_failure_surfaces_through_session_and_stream() -> Result<()> {
    let store = store_with_transcript_session("s1").await?;
    let pipeline = AnalysisPipeline::new(
        store.clone(),
        CannedLlm::err(|| AnalysisError::LlmUnavailable {
            attempts: 3,
            message: "upstream timeout".to_string(),
        }),
    );

    let (tx, rx) = mpsc::channel(16);
    let result = pipeline.run("s1", "openai/gpt-5.1", tx).await;
    assert!(result.is_err());

    let events = collect_events(rx).await;
    match events.last() {
        Some(AnalyzeEvent::Error { error }) => {
            assert!(error.contains("upstream timeout"), "got: {error}");
        }
        other => panic!("expected terminal error event, got {other:?}"),
    }

    let state = store.get("s1").await.expect("session should exist");
    assert_eq!(state.status, SessionStatus::Error);

    Ok(())
}

#[tokio::test]
async fn test_missing_transcript_fails_fast_without_touching_session() -> Result<()> {
    let store = SessionStore::new();
    store
        .create(SessionState::new_upload(
            "s1".to_string(),
            "talk.mp4".to_string(),
            "/tmp/talk.mp4".to_string(),
        ))
        .await?;

    let pipeline = AnalysisPipeline::new(store.clone(), CannedLlm::ok(VALID_RESPONSE));

    let (tx, rx) = mpsc::channel(16);
    let result = pipeline.run("s1", "openai/gpt-5.1", tx).await;
    assert!(matches!(result, Err(AnalysisError::TranscriptNotReady)));

    // Precondition failure: no events, session untouched.
    let events = collect_events(rx).await;
    assert!(events.is_empty());

    let state = store.get("s1").await.expect("session should exist");
    assert_eq!(state.status, SessionStatus::Uploading);
    assert!(state.error.is_none());

    Ok(())
}

#[tokio::test]
async fn test_unknown_session_fails() {
    let store = SessionStore::new();
    let pipeline = AnalysisPipeline::new(store, CannedLlm::ok(VALID_RESPONSE));

    let (tx, _rx) = mpsc::channel(16);
    let result = pipeline.run("missing", "openai/gpt-5.1", tx).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_fenced_response_is_recovered() -> Result<()> {
    let store = store_with_transcript_session("s1").await?;
    let fenced = format!("Here is the analysis:\n```json\n{VALID_RESPONSE}\n```\nDone.");
    let pipeline = AnalysisPipeline::new(store.clone(), CannedLlm::ok(&fenced));

    let (tx, rx) = mpsc::channel(16);
    pipeline.run("s1", "openai/gpt-5.1", tx).await?;

    let events = collect_events(rx).await;
    assert!(matches!(events.last(), Some(AnalyzeEvent::Done { .. })));

    let state = store.get("s1").await.expect("session should exist");
    assert_eq!(state.analysis.expect("analysis").summary, "A channel intro.");

    Ok(())
}
