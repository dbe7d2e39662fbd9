use crate::error::MediaError;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{info, warn};

/// Request-size limit of the downstream transcription providers, with
/// headroom below the hard 25 MB API cap.
const MAX_CHUNK_SIZE: u64 = 24 * 1024 * 1024;

/// Fixed chunk length in seconds. Boundaries are time-based, not
/// content-aware; transcripts, not playback, are the consumer.
pub const CHUNK_DURATION_SECS: u64 = 600;

/// A time-bounded slice of an audio file, created solely to satisfy the
/// provider input-size limit. Deleted after transcription regardless of
/// outcome.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub path: PathBuf,

    /// Seconds from the start of the original file.
    pub start_offset: f64,

    pub index: usize,
}

/// Whether the file exceeds the provider size limit and must be split.
pub fn needs_chunking(audio_path: &Path) -> Result<bool, MediaError> {
    let size = std::fs::metadata(audio_path)?.len();
    Ok(size > MAX_CHUNK_SIZE)
}

/// Split into fixed-duration segments with reset timestamps, returning
/// chunks ordered by index. On ffmpeg failure any partial chunk files are
/// removed best-effort before the error is surfaced.
pub async fn split_audio(audio_path: &Path) -> Result<Vec<AudioChunk>, MediaError> {
    let dir = audio_path.parent().unwrap_or_else(|| Path::new("."));
    let ext = audio_path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    let base = audio_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "audio".to_string());

    let pattern = dir.join(format!("{base}_chunk_%03d.{ext}"));

    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(audio_path)
        .args([
            "-f",
            "segment",
            "-segment_time",
            &CHUNK_DURATION_SECS.to_string(),
            "-reset_timestamps",
            "1",
            "-c",
            "copy",
        ])
        .args(["-loglevel", "error"])
        .arg(&pattern)
        .output()
        .await?;

    if !output.status.success() {
        cleanup_chunks(&discover_chunks(dir, &base, &ext));
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::ChunkingFailed(
            stderr.lines().last().unwrap_or("ffmpeg exited with error").to_string(),
        ));
    }

    let chunks = discover_chunks(dir, &base, &ext);
    info!("Split audio into {} chunks", chunks.len());
    Ok(chunks)
}

/// Collect `<base>_chunk_NNN.<ext>` files in index order.
fn discover_chunks(dir: &Path, base: &str, ext: &str) -> Vec<AudioChunk> {
    let mut chunks = Vec::new();
    let mut index = 0usize;
    loop {
        let path = dir.join(format!("{base}_chunk_{index:03}.{ext}"));
        if !path.exists() {
            break;
        }
        chunks.push(AudioChunk {
            path,
            start_offset: (index as u64 * CHUNK_DURATION_SECS) as f64,
            index,
        });
        index += 1;
    }
    chunks
}

/// Delete chunk files. Individual failures are logged and swallowed:
/// cleanup must never fail the pipeline.
pub fn cleanup_chunks(chunks: &[AudioChunk]) {
    for chunk in chunks {
        if chunk.path.exists() {
            if let Err(e) = std::fs::remove_file(&chunk.path) {
                warn!("Failed to delete chunk {}: {}", chunk.path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn small_files_do_not_need_chunking() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"tiny").unwrap();
        assert!(!needs_chunking(file.path()).unwrap());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = needs_chunking(Path::new("/nonexistent/audio.wav")).unwrap_err();
        assert!(matches!(err, MediaError::Io(_)));
    }

    #[test]
    fn cleanup_swallows_missing_files() {
        let chunks = vec![AudioChunk {
            path: PathBuf::from("/nonexistent/audio_chunk_000.wav"),
            start_offset: 0.0,
            index: 0,
        }];
        // Must not panic or error.
        cleanup_chunks(&chunks);
    }

    #[test]
    fn chunk_offsets_follow_indices() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..3 {
            std::fs::write(dir.path().join(format!("a_chunk_{i:03}.wav")), b"x").unwrap();
        }
        let chunks = discover_chunks(dir.path(), "a", "wav");
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].start_offset, 1200.0);
    }
}
