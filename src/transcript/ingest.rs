//! Parsing of user-supplied transcript files (txt, json, srt)

use super::{TranscriptResult, TranscriptSegment};
use crate::error::IngestError;

/// Supported transcript upload formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    Txt,
    Json,
    Srt,
}

impl TranscriptFormat {
    pub fn from_extension(ext: &str) -> Result<Self, IngestError> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "json" => Ok(Self::Json),
            "srt" => Ok(Self::Srt),
            other => Err(IngestError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Parse transcript file content into a [`TranscriptResult`].
///
/// Plain text becomes a single zero-length segment; JSON must already carry
/// `text` and `segments`; SRT blocks are converted to seconds.
pub fn parse_transcript(
    content: &str,
    format: TranscriptFormat,
) -> Result<TranscriptResult, IngestError> {
    match format {
        TranscriptFormat::Txt => {
            let text = content.trim().to_string();
            Ok(TranscriptResult {
                segments: vec![TranscriptSegment {
                    start: 0.0,
                    end: 0.0,
                    text: text.clone(),
                }],
                text,
                language: "pl".to_string(),
                duration: 0.0,
            })
        }
        TranscriptFormat::Json => parse_json(content),
        TranscriptFormat::Srt => parse_srt(content),
    }
}

fn parse_json(content: &str) -> Result<TranscriptResult, IngestError> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| IngestError::InvalidJson(e.to_string()))?;

    if value.get("text").and_then(|t| t.as_str()).is_none()
        || !value.get("segments").map(|s| s.is_array()).unwrap_or(false)
    {
        return Err(IngestError::InvalidJson(
            "required fields: text, segments".to_string(),
        ));
    }

    let segments = serde_json::from_value(value["segments"].clone())
        .map_err(|e| IngestError::InvalidJson(e.to_string()))?;

    Ok(TranscriptResult {
        text: value["text"].as_str().unwrap_or_default().to_string(),
        segments,
        language: value
            .get("language")
            .and_then(|l| l.as_str())
            .unwrap_or("pl")
            .to_string(),
        duration: value.get("duration").and_then(|d| d.as_f64()).unwrap_or(0.0),
    })
}

fn parse_srt(content: &str) -> Result<TranscriptResult, IngestError> {
    let mut segments = Vec::new();

    for block in content.trim().split("\n\n") {
        let lines: Vec<&str> = block.trim().lines().collect();
        if lines.len() < 3 {
            continue;
        }

        let Some((start, end)) = parse_srt_time_line(lines[1]) else {
            continue;
        };

        let text = lines[2..].join(" ").trim().to_string();
        if !text.is_empty() {
            segments.push(TranscriptSegment { start, end, text });
        }
    }

    if segments.is_empty() {
        return Err(IngestError::EmptySrt);
    }

    let text = segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let duration = segments.last().map(|s| s.end).unwrap_or(0.0);

    Ok(TranscriptResult {
        text,
        segments,
        language: "pl".to_string(),
        duration,
    })
}

/// Parse an SRT time line: `HH:MM:SS,mmm --> HH:MM:SS,mmm` (dots also
/// accepted as the millisecond separator).
fn parse_srt_time_line(line: &str) -> Option<(f64, f64)> {
    let (start_str, end_str) = line.split_once("-->")?;
    Some((
        parse_srt_timestamp(start_str.trim())?,
        parse_srt_timestamp(end_str.trim())?,
    ))
}

fn parse_srt_timestamp(value: &str) -> Option<f64> {
    let (hms, millis) = value
        .split_once(',')
        .or_else(|| value.split_once('.'))
        .unwrap_or((value, "0"));

    let mut parts = hms.split(':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    let millis: f64 = millis.parse().ok()?;

    Some(hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0)
}
