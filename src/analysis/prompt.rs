//! Analysis prompt construction
//!
//! The prompt text is an input to the pipeline, not part of it: the only
//! structural requirements are the timecoded transcript lines and the JSON
//! schema the parser downstream expects.

use crate::transcript::TranscriptResult;
use std::fmt::Write;

/// Render the transcript as `[MM:SS] text` lines so the model can quote
/// exact timecodes back.
pub fn format_transcript_with_timecodes(transcript: &TranscriptResult) -> String {
    let mut out = String::new();
    for seg in &transcript.segments {
        let mins = (seg.start / 60.0).floor() as u64;
        let secs = (seg.start % 60.0).floor() as u64;
        let _ = writeln!(out, "[{mins:02}:{secs:02}] {}", seg.text);
    }
    out
}

/// Build the full analysis prompt for a transcript of `duration` seconds.
pub fn build_analysis_prompt(timecoded_transcript: &str, duration: f64) -> String {
    let duration_min = (duration / 60.0).round() as u64;

    format!(
        r#"You are an expert in short-form video (Reels, Shorts, TikTok) and YouTube CTR strategy, and an experienced video editor. Analyze the transcript of a {duration_min} minute video and propose segments to repurpose as reels, plus titles and thumbnail concepts.

Rules:
1. Each reel should run 30-90 seconds and stand alone without context.
2. Look for strong hooks (surprise, controversy, value, emotion).
3. Mark priority: high (viral potential), medium (solid content), low (filler).
4. Use exact MM:SS timecodes from the transcript.
5. Hooks need a type: open_loop, pattern_interrupt, controversial, or direct_value.
6. Titles: max 60 chars, each with a platform (youtube/tiktok/instagram); optionally pair with a thumbnail via paired_thumbnail_index (0-based) and a hook type via paired_hook_type.
7. Thumbnails: concrete color palette, face expression, composition, 3-5 word text overlay.
8. Rate each reel's ctr_potential 1-10 and give a retention_strategy.
9. For EVERY reel produce an editing_guide: pace (fast/medium/slow), cuts (timecode, type: jump_cut/hard_cut/j_cut/l_cut, description), broll_moments (start, end, suggestion), zoom_moments (timecode, type: zoom_in/zoom_out/slow_zoom, reason), text_overlays (timecode, text, style: lower_third/center/caption), music_sync.
10. For EVERY reel produce 2-3 hook_variants: text, type, visual_description, audio_description, first_3_seconds.
11. Produce an engagement_map of segments (start, end, level: peak/high/medium/low, emotion, note) and a retention_prediction (estimated_avg_retention 0-100, drop_points with timecode/reason/severity critical/moderate/minor, peak_moments with timecode/reason).

Respond with a single JSON object:
{{"summary": "...", "structure_notes": "...", "reels": [...], "hooks": [{{"text": "...", "type": "..."}}], "titles": [...], "thumbnails": [...], "engagement_map": [...], "retention_prediction": {{...}}}}

Transcript:
{timecoded_transcript}"#
    )
}
