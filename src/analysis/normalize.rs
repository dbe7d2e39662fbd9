//! Normalization of parsed-but-untrusted analysis JSON
//!
//! The last line of defense against structurally-valid-but-sloppy model
//! output. Pure and total: defined for every input, never fails, never
//! does I/O. Arrays default to empty, scalars to per-field defaults,
//! unknown enum values to a designated fallback, and partial nested
//! structures become either a fully-defaulted object or absent.

use super::types::*;
use serde_json::Value;

/// Coerce an arbitrary JSON value into a schema-complete [`AnalysisResult`].
pub fn normalize_analysis(value: &Value) -> AnalysisResult {
    AnalysisResult {
        summary: str_field(value, "summary"),
        structure_notes: str_field(value, "structure_notes"),
        reels: arr_field(value, "reels").iter().map(normalize_reel).collect(),
        hooks: arr_field(value, "hooks").iter().map(normalize_hook).collect(),
        titles: arr_field(value, "titles").iter().map(normalize_title).collect(),
        thumbnails: arr_field(value, "thumbnails")
            .iter()
            .map(normalize_thumbnail)
            .collect(),
        engagement_map: arr_field(value, "engagement_map")
            .iter()
            .map(normalize_engagement)
            .collect(),
        retention_prediction: value
            .get("retention_prediction")
            .filter(|v| v.is_object())
            .map(normalize_retention),
    }
}

fn normalize_reel(value: &Value) -> ReelSuggestion {
    ReelSuggestion {
        title: str_field(value, "title"),
        hook: str_field(value, "hook"),
        start: str_field(value, "start"),
        end: str_field(value, "end"),
        duration: str_field(value, "duration"),
        priority: match value.get("priority").and_then(Value::as_str) {
            Some("high") => Priority::High,
            Some("low") => Priority::Low,
            _ => Priority::Medium,
        },
        why: str_field(value, "why"),
        script_outline: str_field(value, "script_outline"),
        editing_tips: str_array(value, "editing_tips"),
        hashtags: str_array(value, "hashtags"),
        ctr_potential: value
            .get("ctr_potential")
            .and_then(Value::as_f64)
            .unwrap_or(5.0)
            .clamp(0.0, 10.0),
        retention_strategy: str_field(value, "retention_strategy"),
        editing_guide: value
            .get("editing_guide")
            .filter(|v| v.is_object())
            .map(normalize_editing_guide),
        hook_variants: value
            .get("hook_variants")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(normalize_hook_blueprint).collect()),
    }
}

/// Hooks arrive either as objects or, in the legacy shape, as bare
/// strings; bare strings become open-loop hooks.
fn normalize_hook(value: &Value) -> HookSuggestion {
    match value.as_str() {
        Some(text) => HookSuggestion {
            text: text.to_string(),
            hook_type: "open_loop".to_string(),
        },
        None => HookSuggestion {
            text: str_field(value, "text"),
            hook_type: str_field_or(value, "type", "open_loop"),
        },
    }
}

fn normalize_title(value: &Value) -> TitleSuggestion {
    TitleSuggestion {
        title: str_field(value, "title"),
        style: str_field(value, "style"),
        why: str_field(value, "why"),
        platform: match value.get("platform").and_then(Value::as_str) {
            Some("youtube") => Some(Platform::Youtube),
            Some("tiktok") => Some(Platform::Tiktok),
            Some("instagram") => Some(Platform::Instagram),
            _ => None,
        },
        paired_thumbnail_index: value
            .get("paired_thumbnail_index")
            .and_then(Value::as_u64)
            .map(|i| i as usize),
        paired_hook_type: value
            .get("paired_hook_type")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

fn normalize_thumbnail(value: &Value) -> ThumbnailSuggestion {
    ThumbnailSuggestion {
        concept: str_field(value, "concept"),
        text_overlay: str_field(value, "text_overlay"),
        style: str_field(value, "style"),
        reference: str_field(value, "reference"),
        color_palette: str_field(value, "color_palette"),
        face_expression: str_field(value, "face_expression"),
        composition: str_field(value, "composition"),
    }
}

fn normalize_editing_guide(value: &Value) -> EditingGuide {
    EditingGuide {
        pace: match value.get("pace").and_then(Value::as_str) {
            Some("fast") => Pace::Fast,
            Some("slow") => Pace::Slow,
            _ => Pace::Medium,
        },
        cuts: arr_field(value, "cuts")
            .iter()
            .map(|cut| EditingCut {
                timecode: str_field(cut, "timecode"),
                cut_type: match cut.get("type").and_then(Value::as_str) {
                    Some("hard_cut") => CutType::HardCut,
                    Some("j_cut") => CutType::JCut,
                    Some("l_cut") => CutType::LCut,
                    _ => CutType::JumpCut,
                },
                description: str_field(cut, "description"),
            })
            .collect(),
        broll_moments: arr_field(value, "broll_moments")
            .iter()
            .map(|broll| BrollMoment {
                start: str_field(broll, "start"),
                end: str_field(broll, "end"),
                suggestion: str_field(broll, "suggestion"),
            })
            .collect(),
        zoom_moments: arr_field(value, "zoom_moments")
            .iter()
            .map(|zoom| ZoomMoment {
                timecode: str_field(zoom, "timecode"),
                zoom_type: match zoom.get("type").and_then(Value::as_str) {
                    Some("zoom_out") => ZoomType::ZoomOut,
                    Some("slow_zoom") => ZoomType::SlowZoom,
                    _ => ZoomType::ZoomIn,
                },
                reason: str_field(zoom, "reason"),
            })
            .collect(),
        text_overlays: arr_field(value, "text_overlays")
            .iter()
            .map(|overlay| TextOverlay {
                timecode: str_field(overlay, "timecode"),
                text: str_field(overlay, "text"),
                style: match overlay.get("style").and_then(Value::as_str) {
                    Some("lower_third") => OverlayStyle::LowerThird,
                    Some("center") => OverlayStyle::Center,
                    _ => OverlayStyle::Caption,
                },
            })
            .collect(),
        music_sync: str_field(value, "music_sync"),
    }
}

fn normalize_hook_blueprint(value: &Value) -> HookBlueprint {
    HookBlueprint {
        text: str_field(value, "text"),
        hook_type: str_field_or(value, "type", "open_loop"),
        visual_description: str_field(value, "visual_description"),
        audio_description: str_field(value, "audio_description"),
        first_3_seconds: str_field(value, "first_3_seconds"),
    }
}

fn normalize_engagement(value: &Value) -> EngagementSegment {
    EngagementSegment {
        start: str_field(value, "start"),
        end: str_field(value, "end"),
        level: match value.get("level").and_then(Value::as_str) {
            Some("peak") => EngagementLevel::Peak,
            Some("high") => EngagementLevel::High,
            Some("low") => EngagementLevel::Low,
            _ => EngagementLevel::Medium,
        },
        emotion: str_field(value, "emotion"),
        note: str_field(value, "note"),
    }
}

fn normalize_retention(value: &Value) -> RetentionPrediction {
    RetentionPrediction {
        estimated_avg_retention: value
            .get("estimated_avg_retention")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
            .clamp(0.0, 100.0),
        drop_points: arr_field(value, "drop_points")
            .iter()
            .map(|dp| RetentionDropPoint {
                timecode: str_field(dp, "timecode"),
                reason: str_field(dp, "reason"),
                severity: match dp.get("severity").and_then(Value::as_str) {
                    Some("critical") => DropSeverity::Critical,
                    Some("minor") => DropSeverity::Minor,
                    _ => DropSeverity::Moderate,
                },
            })
            .collect(),
        peak_moments: arr_field(value, "peak_moments")
            .iter()
            .map(|pm| RetentionPeakMoment {
                timecode: str_field(pm, "timecode"),
                reason: str_field(pm, "reason"),
            })
            .collect(),
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn str_field_or(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

static EMPTY: Vec<Value> = Vec::new();

fn arr_field<'a>(value: &'a Value, key: &str) -> &'a Vec<Value> {
    value.get(key).and_then(Value::as_array).unwrap_or(&EMPTY)
}

fn str_array(value: &Value, key: &str) -> Vec<String> {
    arr_field(value, key)
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn totally_empty_input_yields_full_defaults() {
        let result = normalize_analysis(&json!({}));
        assert_eq!(result.summary, "");
        assert!(result.reels.is_empty());
        assert!(result.hooks.is_empty());
        assert!(result.titles.is_empty());
        assert!(result.thumbnails.is_empty());
        assert!(result.engagement_map.is_empty());
        assert!(result.retention_prediction.is_none());
    }

    #[test]
    fn non_object_input_does_not_panic() {
        normalize_analysis(&json!(null));
        normalize_analysis(&json!("just a string"));
        normalize_analysis(&json!([1, 2, 3]));
        normalize_analysis(&json!(42));
    }

    #[test]
    fn non_array_reels_become_empty() {
        let result = normalize_analysis(&json!({"reels": "oops"}));
        assert!(result.reels.is_empty());
    }

    #[test]
    fn bare_string_hooks_become_open_loop() {
        let result = normalize_analysis(&json!({
            "hooks": ["you won't believe this", {"text": "listen", "type": "direct_value"}]
        }));
        assert_eq!(result.hooks[0].text, "you won't believe this");
        assert_eq!(result.hooks[0].hook_type, "open_loop");
        assert_eq!(result.hooks[1].hook_type, "direct_value");
    }

    #[test]
    fn reel_scalars_get_per_field_defaults() {
        let result = normalize_analysis(&json!({
            "reels": [{"title": "clip", "priority": "urgent", "ctr_potential": "9"}]
        }));
        let reel = &result.reels[0];
        assert_eq!(reel.priority, Priority::Medium);
        assert_eq!(reel.ctr_potential, 5.0);
        assert!(reel.editing_tips.is_empty());
        assert!(reel.hashtags.is_empty());
        assert_eq!(reel.retention_strategy, "");
        assert!(reel.editing_guide.is_none());
        assert!(reel.hook_variants.is_none());
    }

    #[test]
    fn ctr_potential_clamps_into_range() {
        let result = normalize_analysis(&json!({"reels": [{"ctr_potential": 42.0}]}));
        assert_eq!(result.reels[0].ctr_potential, 10.0);
    }

    #[test]
    fn unknown_cut_type_falls_back_to_jump_cut() {
        let result = normalize_analysis(&json!({
            "reels": [{"editing_guide": {"cuts": [{"timecode": "00:10", "type": "smash_cut"}]}}]
        }));
        let guide = result.reels[0].editing_guide.as_ref().unwrap();
        assert_eq!(guide.cuts[0].cut_type, CutType::JumpCut);
    }

    #[test]
    fn partial_editing_guide_is_fully_defaulted() {
        let result = normalize_analysis(&json!({
            "reels": [{"editing_guide": {"pace": "fast"}}]
        }));
        let guide = result.reels[0].editing_guide.as_ref().unwrap();
        assert_eq!(guide.pace, Pace::Fast);
        assert!(guide.cuts.is_empty());
        assert!(guide.broll_moments.is_empty());
        assert!(guide.zoom_moments.is_empty());
        assert!(guide.text_overlays.is_empty());
        assert_eq!(guide.music_sync, "");
    }

    #[test]
    fn retention_clamps_and_defaults() {
        let result = normalize_analysis(&json!({
            "retention_prediction": {
                "estimated_avg_retention": 180,
                "drop_points": [{"timecode": "01:00", "severity": "catastrophic"}]
            }
        }));
        let retention = result.retention_prediction.unwrap();
        assert_eq!(retention.estimated_avg_retention, 100.0);
        assert_eq!(retention.drop_points[0].severity, DropSeverity::Moderate);
        assert!(retention.peak_moments.is_empty());
    }

    #[test]
    fn unknown_platform_becomes_absent() {
        let result = normalize_analysis(&json!({
            "titles": [{"title": "t", "platform": "myspace"}]
        }));
        assert!(result.titles[0].platform.is_none());
    }

    #[test]
    fn mixed_type_editing_tips_keep_only_strings() {
        let result = normalize_analysis(&json!({
            "reels": [{"editing_tips": ["cut fast", 7, null, "add captions"]}]
        }));
        assert_eq!(result.reels[0].editing_tips, vec!["cut fast", "add captions"]);
    }
}
