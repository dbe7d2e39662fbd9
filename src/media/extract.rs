use crate::error::MediaError;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Whisper-compatible APIs reject request bodies above ~25 MB.
const MAX_WHISPER_SIZE: u64 = 25 * 1024 * 1024;

/// Extract a mono 16 kHz audio track from a video file.
///
/// Produces a WAV next to the input; if the WAV exceeds the provider size
/// limit it is re-encoded to a 64k mono MP3 and the WAV deleted. Percent
/// progress is reported over `progress` while ffmpeg runs.
pub async fn extract_audio(
    input: &Path,
    progress: mpsc::Sender<u8>,
) -> Result<PathBuf, MediaError> {
    let dir = input.parent().unwrap_or_else(|| Path::new("."));
    let base = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "audio".to_string());
    let wav_path = dir.join(format!("{base}.wav"));

    let total_duration = probe_duration(input).await.unwrap_or(0.0);

    let mut child = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(input)
        .args(["-vn", "-ac", "1", "-ar", "16000", "-acodec", "pcm_s16le", "-f", "wav"])
        .args(["-progress", "pipe:1", "-nostats", "-loglevel", "error"])
        .arg(&wav_path)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()?;

    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            // ffmpeg -progress emits key=value lines; out_time_us tracks
            // the position in the output stream.
            if let Some(value) = line.strip_prefix("out_time_us=") {
                if total_duration > 0.0 {
                    if let Ok(us) = value.trim().parse::<f64>() {
                        let percent = (us / 1_000_000.0 / total_duration * 100.0).min(100.0);
                        let _ = progress.send(percent as u8).await;
                    }
                }
            }
        }
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::ExtractionFailed(
            stderr.lines().last().unwrap_or("ffmpeg exited with error").to_string(),
        ));
    }

    info!("Audio extracted to WAV: {}", wav_path.display());
    let size = tokio::fs::metadata(&wav_path).await?.len();

    if size > MAX_WHISPER_SIZE {
        info!(
            "WAV too large ({:.1}MB), converting to MP3",
            size as f64 / 1024.0 / 1024.0
        );
        let mp3_path = convert_to_mp3(&wav_path, dir, &base).await?;
        if let Err(e) = tokio::fs::remove_file(&wav_path).await {
            warn!("Failed to remove oversized WAV: {}", e);
        }
        return Ok(mp3_path);
    }

    Ok(wav_path)
}

async fn convert_to_mp3(wav_path: &Path, dir: &Path, base: &str) -> Result<PathBuf, MediaError> {
    let mp3_path = dir.join(format!("{base}.mp3"));

    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(wav_path)
        .args(["-acodec", "libmp3lame", "-b:a", "64k", "-ac", "1", "-ar", "16000"])
        .args(["-loglevel", "error"])
        .arg(&mp3_path)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::ExtractionFailed(format!(
            "MP3 conversion failed: {}",
            stderr.lines().last().unwrap_or("ffmpeg exited with error")
        )));
    }

    info!("Converted to MP3: {}", mp3_path.display());
    Ok(mp3_path)
}

/// Duration of a media file in seconds, via ffprobe.
pub async fn probe_duration(path: &Path) -> Result<f64, MediaError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::ProbeFailed(
            stderr.lines().last().unwrap_or("ffprobe exited with error").to_string(),
        ));
    }

    String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse::<f64>()
        .map_err(|e| MediaError::ProbeFailed(e.to_string()))
}
