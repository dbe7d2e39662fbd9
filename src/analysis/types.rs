use serde::{Deserialize, Serialize};

/// Viral priority of a reel suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutType {
    JumpCut,
    HardCut,
    JCut,
    LCut,
}

impl CutType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JumpCut => "jump_cut",
            Self::HardCut => "hard_cut",
            Self::JCut => "j_cut",
            Self::LCut => "l_cut",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomType {
    ZoomIn,
    ZoomOut,
    SlowZoom,
}

impl ZoomType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::SlowZoom => "slow_zoom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayStyle {
    LowerThird,
    Center,
    Caption,
}

impl OverlayStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowerThird => "lower_third",
            Self::Center => "center",
            Self::Caption => "caption",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Fast,
    Medium,
    Slow,
}

impl Pace {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementLevel {
    Peak,
    High,
    Medium,
    Low,
}

impl EngagementLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Peak => "peak",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropSeverity {
    Critical,
    Moderate,
    Minor,
}

impl DropSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Moderate => "moderate",
            Self::Minor => "minor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
}

/// One suggested cut inside a reel's editing guide. Timecodes are MM:SS
/// strings as emitted by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditingCut {
    pub timecode: String,
    #[serde(rename = "type")]
    pub cut_type: CutType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrollMoment {
    pub start: String,
    pub end: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomMoment {
    pub timecode: String,
    #[serde(rename = "type")]
    pub zoom_type: ZoomType,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub timecode: String,
    pub text: String,
    pub style: OverlayStyle,
}

/// Per-reel editing instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditingGuide {
    pub pace: Pace,
    pub cuts: Vec<EditingCut>,
    pub broll_moments: Vec<BrollMoment>,
    pub zoom_moments: Vec<ZoomMoment>,
    pub text_overlays: Vec<TextOverlay>,
    pub music_sync: String,
}

/// A fleshed-out hook variant for a reel (first-3-seconds blueprint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookBlueprint {
    pub text: String,
    #[serde(rename = "type")]
    pub hook_type: String,
    pub visual_description: String,
    pub audio_description: String,
    pub first_3_seconds: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelSuggestion {
    pub title: String,
    pub hook: String,
    /// MM:SS timecodes into the source video.
    pub start: String,
    pub end: String,
    pub duration: String,
    pub priority: Priority,
    pub why: String,
    pub script_outline: String,
    pub editing_tips: Vec<String>,
    pub hashtags: Vec<String>,
    /// 0-10.
    pub ctr_potential: f64,
    pub retention_strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editing_guide: Option<EditingGuide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_variants: Option<Vec<HookBlueprint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSuggestion {
    pub title: String,
    pub style: String,
    pub why: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paired_thumbnail_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paired_hook_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailSuggestion {
    pub concept: String,
    pub text_overlay: String,
    pub style: String,
    pub reference: String,
    pub color_palette: String,
    pub face_expression: String,
    pub composition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookSuggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub hook_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementSegment {
    pub start: String,
    pub end: String,
    pub level: EngagementLevel,
    pub emotion: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionDropPoint {
    pub timecode: String,
    pub reason: String,
    pub severity: DropSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionPeakMoment {
    pub timecode: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionPrediction {
    /// Percent, 0-100.
    pub estimated_avg_retention: f64,
    pub drop_points: Vec<RetentionDropPoint>,
    pub peak_moments: Vec<RetentionPeakMoment>,
}

/// The fully-normalized content repurposing analysis. Array fields are
/// always present (possibly empty), never absent; the normalizer enforces
/// this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub reels: Vec<ReelSuggestion>,
    pub hooks: Vec<HookSuggestion>,
    pub structure_notes: String,
    pub titles: Vec<TitleSuggestion>,
    pub thumbnails: Vec<ThumbnailSuggestion>,
    pub engagement_map: Vec<EngagementSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_prediction: Option<RetentionPrediction>,
}
