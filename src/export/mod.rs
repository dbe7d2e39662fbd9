//! Deterministic export serializers over a validated analysis
//!
//! Markdown and JSON are direct structured dumps; EDL and FCPXML follow
//! the field mappings downstream NLE tools expect.

mod edl;
mod fcpxml;
mod markdown;
mod timecode;

pub use edl::generate_edl;
pub use fcpxml::generate_fcpxml;
pub use markdown::generate_markdown;
pub use timecode::{mmss_to_seconds, mmss_to_smpte, seconds_to_smpte};

use crate::session::SessionState;
use serde_json::json;

/// Requested export format, from the `format` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
    Edl,
    Fcpxml,
}

impl ExportFormat {
    /// Markdown is the fallback for unknown/absent formats, matching the
    /// wire contract.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("json") => Self::Json,
            Some("edl") => Self::Edl,
            Some("fcpxml") => Self::Fcpxml,
            _ => Self::Markdown,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Markdown => "text/markdown",
            Self::Edl => "text/plain",
            Self::Fcpxml => "application/xml",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
            Self::Edl => "edl",
            Self::Fcpxml => "fcpxml",
        }
    }
}

/// The JSON export bundle: session metadata + transcript + analysis.
pub fn generate_json(session: &SessionState) -> serde_json::Value {
    json!({
        "session": {
            "id": session.id,
            "filename": session.filename,
            "model": session.model,
            "createdAt": session.created_at,
        },
        "transcript": session.transcript,
        "analysis": session.analysis,
    })
}
