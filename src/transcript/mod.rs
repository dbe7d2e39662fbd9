//! Transcript types and chunk merging
//!
//! Segments carry absolute times in seconds. When audio is transcribed in
//! chunks, each chunk's segments are shifted by the chunk's start offset
//! and the chunks merged into one timeline.

mod ingest;

pub use ingest::{parse_transcript, TranscriptFormat};

use serde::{Deserialize, Serialize};

/// One time-aligned piece of transcribed speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    pub start: f64,

    /// End time in seconds (start <= end).
    pub end: f64,

    pub text: String,
}

/// A complete transcript: full text plus the ordered segment timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResult {
    /// Concatenation of all segment texts.
    pub text: String,

    /// Ordered by non-decreasing `start`.
    pub segments: Vec<TranscriptSegment>,

    pub language: String,

    /// Total duration in seconds, >= the last segment's `end`.
    pub duration: f64,
}

impl TranscriptResult {
    /// Shift every segment by `offset` seconds. Used to place a chunk's
    /// locally-timestamped segments onto the global timeline.
    pub fn shift(&mut self, offset: f64) {
        for seg in &mut self.segments {
            seg.start += offset;
            seg.end += offset;
        }
    }
}

/// Merge per-chunk transcripts (already shifted to global time, in chunk
/// order) into one result.
///
/// Text fields are joined with a single space and segment arrays
/// concatenated as-is: chunk indices are time-ordered and offsets
/// monotonic, so the result stays globally ordered. Duration is the
/// maximum last-segment end across chunks, not the sum of per-chunk
/// durations, which avoids double counting silence-padding drift.
pub fn merge_transcripts(results: Vec<TranscriptResult>) -> TranscriptResult {
    let text = results
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let language = results
        .first()
        .map(|r| r.language.clone())
        .unwrap_or_else(|| "pl".to_string());

    let duration = results
        .iter()
        .filter_map(|r| r.segments.last())
        .fold(0.0_f64, |max, seg| max.max(seg.end));

    let segments = results.into_iter().flat_map(|r| r.segments).collect();

    TranscriptResult {
        text,
        segments,
        language,
        duration,
    }
}
