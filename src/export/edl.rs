//! EDL (CMX 3600) export
//!
//! One edit event per reel; comment lines carry hooks and editing-guide
//! details for editors whose NLE surfaces EDL comments.

use super::timecode::mmss_to_smpte;
use crate::analysis::AnalysisResult;

pub fn generate_edl(analysis: &AnalysisResult, filename: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("TITLE: ReelCutter - {filename}"));
    lines.push("FCM: NON-DROP FRAME".to_string());
    lines.push(String::new());

    for (i, reel) in analysis.reels.iter().enumerate() {
        let event_num = format!("{:03}", i + 1);
        let src_in = mmss_to_smpte(&reel.start);
        let src_out = mmss_to_smpte(&reel.end);
        // Record in/out matches source for a simple assembly.
        let (rec_in, rec_out) = (src_in.clone(), src_out.clone());

        // EVENT# REEL TRACK TRANSITION SRC_IN SRC_OUT REC_IN REC_OUT
        lines.push(format!(
            "{event_num}  AX       V     C        {src_in} {src_out} {rec_in} {rec_out}"
        ));

        lines.push(format!("* FROM CLIP NAME: {filename}"));
        lines.push(format!("* REEL: {}", reel.title));
        lines.push(format!("* PRIORITY: {}", reel.priority.as_str()));
        lines.push(format!("* HOOK: {}", reel.hook));

        if let Some(guide) = &reel.editing_guide {
            lines.push(format!("* PACE: {}", guide.pace.as_str()));
            if !guide.music_sync.is_empty() {
                lines.push(format!("* MUSIC: {}", guide.music_sync));
            }
            for cut in &guide.cuts {
                lines.push(format!(
                    "* CUT {} {}: {}",
                    mmss_to_smpte(&cut.timecode),
                    cut.cut_type.as_str(),
                    cut.description
                ));
            }
            for zoom in &guide.zoom_moments {
                lines.push(format!(
                    "* ZOOM {} {}: {}",
                    mmss_to_smpte(&zoom.timecode),
                    zoom.zoom_type.as_str(),
                    zoom.reason
                ));
            }
            for overlay in &guide.text_overlays {
                lines.push(format!(
                    "* TEXT {} [{}]: {}",
                    mmss_to_smpte(&overlay.timecode),
                    overlay.style.as_str(),
                    overlay.text
                ));
            }
        }

        if let Some(variants) = &reel.hook_variants {
            for (j, variant) in variants.iter().enumerate() {
                lines.push(format!(
                    "* HOOK_VARIANT_{}: [{}] {}",
                    j + 1,
                    variant.hook_type,
                    variant.text
                ));
            }
        }

        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Priority, ReelSuggestion};

    fn reel(title: &str, start: &str, end: &str) -> ReelSuggestion {
        ReelSuggestion {
            title: title.to_string(),
            hook: "the hook".to_string(),
            start: start.to_string(),
            end: end.to_string(),
            duration: "45s".to_string(),
            priority: Priority::High,
            why: String::new(),
            script_outline: String::new(),
            editing_tips: vec![],
            hashtags: vec![],
            ctr_potential: 8.0,
            retention_strategy: String::new(),
            editing_guide: None,
            hook_variants: None,
        }
    }

    fn analysis_with(reels: Vec<ReelSuggestion>) -> AnalysisResult {
        AnalysisResult {
            summary: String::new(),
            reels,
            hooks: vec![],
            structure_notes: String::new(),
            titles: vec![],
            thumbnails: vec![],
            engagement_map: vec![],
            retention_prediction: None,
        }
    }

    #[test]
    fn edl_has_header_and_one_event_per_reel() {
        let analysis = analysis_with(vec![reel("First", "01:00", "01:45"), reel("Second", "05:30", "06:10")]);
        let edl = generate_edl(&analysis, "video.mp4");

        assert!(edl.starts_with("TITLE: ReelCutter - video.mp4\nFCM: NON-DROP FRAME"));
        assert!(edl.contains("001  AX       V     C        00:01:00:00 00:01:45:00 00:01:00:00 00:01:45:00"));
        assert!(edl.contains("002  AX       V     C        00:05:30:00 00:06:10:00"));
        assert!(edl.contains("* REEL: First"));
        assert!(edl.contains("* PRIORITY: high"));
        assert!(edl.contains("* HOOK: the hook"));
    }
}
