// Integration tests for the transcription provider chain
//
// These tests drive the fallback ordering, the whole-file path and the
// chunked merge path with scripted in-memory providers.

use anyhow::{bail, Result};
use async_trait::async_trait;
use reelcutter::media::AudioChunk;
use reelcutter::transcribe::{ProviderChain, TranscriptionProvider};
use reelcutter::transcript::{TranscriptResult, TranscriptSegment};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Scripted provider: each call pops the next outcome and bumps a shared
/// call counter.
struct ScriptedProvider {
    name: String,
    outcomes: std::sync::Mutex<Vec<Result<TranscriptResult>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    fn new(name: &str, outcomes: Vec<Result<TranscriptResult>>, calls: Arc<AtomicUsize>) -> Self {
        Self {
            name: name.to_string(),
            outcomes: std::sync::Mutex::new(outcomes),
            calls,
        }
    }
}

#[async_trait]
impl TranscriptionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn transcribe(&self, _path: &Path) -> Result<TranscriptResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            bail!("provider {} exhausted its script", self.name);
        }
        outcomes.remove(0)
    }
}

fn transcript(text: &str, start: f64, end: f64) -> TranscriptResult {
    TranscriptResult {
        text: text.to_string(),
        segments: vec![TranscriptSegment {
            start,
            end,
            text: text.to_string(),
        }],
        language: "pl".to_string(),
        duration: end,
    }
}

fn chunk(index: usize, dir: &Path) -> AudioChunk {
    AudioChunk {
        path: dir.join(format!("audio_chunk_{index:03}.mp3")),
        start_offset: (index * 600) as f64,
        index,
    }
}

#[tokio::test]
async fn test_chain_returns_first_success_without_trying_later_providers() -> Result<()> {
    let calls_a = Arc::new(AtomicUsize::new(0));
    let calls_b = Arc::new(AtomicUsize::new(0));

    let chain = ProviderChain::new(vec![
        Box::new(ScriptedProvider::new(
            "primary",
            vec![Ok(transcript("hello", 0.0, 5.0))],
            calls_a.clone(),
        )),
        Box::new(ScriptedProvider::new(
            "backup",
            vec![Ok(transcript("unused", 0.0, 5.0))],
            calls_b.clone(),
        )),
    ]);

    let (result, provider) = chain.transcribe_file(Path::new("/tmp/audio.mp3")).await?;
    assert_eq!(provider, "primary");
    assert_eq!(result.text, "hello");
    assert_eq!(calls_a.load(Ordering::SeqCst), 1);
    assert_eq!(calls_b.load(Ordering::SeqCst), 0, "Backup must not be called");

    Ok(())
}

#[tokio::test]
async fn test_chain_falls_through_to_next_provider_on_failure() -> Result<()> {
    let calls_a = Arc::new(AtomicUsize::new(0));
    let calls_b = Arc::new(AtomicUsize::new(0));

    let chain = ProviderChain::new(vec![
        Box::new(ScriptedProvider::new(
            "primary",
            vec![Err(anyhow::anyhow!("quota exceeded"))],
            calls_a.clone(),
        )),
        Box::new(ScriptedProvider::new(
            "backup",
            vec![Ok(transcript("recovered", 0.0, 5.0))],
            calls_b.clone(),
        )),
    ]);

    let (result, provider) = chain.transcribe_file(Path::new("/tmp/audio.mp3")).await?;
    assert_eq!(provider, "backup");
    assert_eq!(result.text, "recovered");
    // Exactly one attempt per provider, no retry of the failed one.
    assert_eq!(calls_a.load(Ordering::SeqCst), 1);
    assert_eq!(calls_b.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn test_exhausted_chain_reports_last_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let chain = ProviderChain::new(vec![
        Box::new(ScriptedProvider::new(
            "primary",
            vec![Err(anyhow::anyhow!("first failure"))],
            calls.clone(),
        )) as Box<dyn TranscriptionProvider>,
        Box::new(ScriptedProvider::new(
            "backup",
            vec![Err(anyhow::anyhow!("second failure"))],
            calls.clone(),
        )),
    ]);

    let err = chain
        .transcribe_file(Path::new("/tmp/audio.mp3"))
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains("second failure"),
        "Error should carry the last provider's failure: {message}"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_empty_chain_fails() {
    let chain = ProviderChain::new(vec![]);
    let err = chain
        .transcribe_file(Path::new("/tmp/audio.mp3"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no providers configured"));
}

#[tokio::test]
async fn test_small_file_is_transcribed_whole() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let audio = dir.path().join("short.mp3");
    std::fs::write(&audio, b"not really audio")?;

    let calls = Arc::new(AtomicUsize::new(0));
    let chain = ProviderChain::new(vec![Box::new(ScriptedProvider::new(
        "primary",
        vec![Ok(transcript("short clip", 0.0, 12.0))],
        calls.clone(),
    )) as Box<dyn TranscriptionProvider>]);

    let (tx, mut rx) = mpsc::channel(16);
    let (result, provider) = chain.transcribe_audio(&audio, tx).await?;

    assert_eq!(provider, "primary");
    assert_eq!(result.duration, 12.0);
    assert_eq!(calls.load(Ordering::SeqCst), 1, "One call, no chunking");

    // Whole-file path reports a start and a completion event.
    let first = rx.recv().await.expect("progress event");
    assert_eq!(first.percent, 10);
    let last = rx.recv().await.expect("completion event");
    assert_eq!(last.percent, 100);
    assert_eq!(last.provider, "primary");

    Ok(())
}

#[tokio::test]
async fn test_chunked_transcription_merges_onto_global_timeline() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let chunks = vec![chunk(0, dir.path()), chunk(1, dir.path())];

    // A 930 s recording split at 600 s: provider A handles chunk one, then
    // fails on chunk two; provider B picks it up.
    let calls_a = Arc::new(AtomicUsize::new(0));
    let calls_b = Arc::new(AtomicUsize::new(0));
    let chain = ProviderChain::new(vec![
        Box::new(ScriptedProvider::new(
            "provider-a",
            vec![
                Ok(transcript("first half", 0.0, 590.0)),
                Err(anyhow::anyhow!("rate limited")),
            ],
            calls_a.clone(),
        )) as Box<dyn TranscriptionProvider>,
        Box::new(ScriptedProvider::new(
            "provider-b",
            vec![Ok(transcript("second half", 0.0, 320.0))],
            calls_b.clone(),
        )),
    ]);

    let (tx, mut rx) = mpsc::channel(16);
    let (merged, provider) = chain.transcribe_chunks(&chunks, tx).await?;

    // Last successful provider wins the label.
    assert_eq!(provider, "provider-b");
    assert_eq!(calls_a.load(Ordering::SeqCst), 2);
    assert_eq!(calls_b.load(Ordering::SeqCst), 1);

    // Chunk-local times shifted by each chunk's offset, then merged.
    assert_eq!(merged.text, "first half second half");
    assert_eq!(merged.segments.len(), 2);
    assert_eq!(merged.segments[0].start, 0.0);
    assert_eq!(merged.segments[0].end, 590.0);
    assert_eq!(merged.segments[1].start, 600.0);
    assert_eq!(merged.segments[1].end, 920.0);
    assert_eq!(merged.duration, 920.0, "Duration is the max end, not a sum");

    // Per-chunk progress: 50% after chunk one, 100% after chunk two.
    let first = rx.recv().await.expect("chunk one progress");
    assert_eq!(first.percent, 50);
    assert_eq!(first.provider, "provider-a");
    let second = rx.recv().await.expect("chunk two progress");
    assert_eq!(second.percent, 100);
    assert_eq!(second.provider, "provider-b");

    Ok(())
}

#[tokio::test]
async fn test_chunked_transcription_aborts_when_one_chunk_exhausts_chain() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let chunks = vec![chunk(0, dir.path()), chunk(1, dir.path())];

    let calls = Arc::new(AtomicUsize::new(0));
    let chain = ProviderChain::new(vec![Box::new(ScriptedProvider::new(
        "only",
        vec![
            Ok(transcript("first half", 0.0, 590.0)),
            Err(anyhow::anyhow!("connection reset")),
        ],
        calls.clone(),
    )) as Box<dyn TranscriptionProvider>]);

    let (tx, _rx) = mpsc::channel(16);
    let result = chain.transcribe_chunks(&chunks, tx).await;

    assert!(result.is_err(), "No partial transcript on chunk failure");

    Ok(())
}
