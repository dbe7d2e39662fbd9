//! FCPXML (v1.11) export
//!
//! One project with a single spine: reels as clips carrying markers for
//! the editing guide, chapter-markers for engagement segments, plain
//! markers for retention drop/peak points. Rational time uses whole
//! seconds (`{N}/1s`).

use super::timecode::mmss_to_seconds;
use crate::analysis::AnalysisResult;

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn to_rational(seconds: u64) -> String {
    format!("{seconds}/1s")
}

pub fn generate_fcpxml(analysis: &AnalysisResult, filename: &str, total_duration: f64) -> String {
    let total = to_rational(total_duration.round() as u64);
    let name = escape_xml(filename);
    let mut lines: Vec<String> = Vec::new();

    lines.push("<?xml version=\"1.0\" encoding=\"UTF-8\"?>".to_string());
    lines.push("<!DOCTYPE fcpxml>".to_string());
    lines.push("<fcpxml version=\"1.11\">".to_string());
    lines.push("  <resources>".to_string());
    lines.push(
        "    <format id=\"r1\" name=\"FFVideoFormat1080p25\" frameDuration=\"100/2500s\" width=\"1920\" height=\"1080\"/>"
            .to_string(),
    );
    lines.push(format!(
        "    <asset id=\"a1\" name=\"{name}\" src=\"file://./{name}\" start=\"0/1s\" duration=\"{total}\" hasVideo=\"1\" hasAudio=\"1\" format=\"r1\"/>"
    ));
    lines.push("  </resources>".to_string());
    lines.push("  <library>".to_string());
    lines.push("    <event name=\"ReelCutter Export\">".to_string());
    lines.push(format!("      <project name=\"ReelCutter - {name}\">"));
    lines.push(format!(
        "        <sequence format=\"r1\" duration=\"{total}\">"
    ));
    lines.push("          <spine>".to_string());

    for reel in &analysis.reels {
        let start_sec = mmss_to_seconds(&reel.start);
        let end_sec = mmss_to_seconds(&reel.end);
        let duration = end_sec.saturating_sub(start_sec);
        let offset = to_rational(start_sec);

        lines.push(format!(
            "            <clip name=\"{}\" offset=\"{offset}\" duration=\"{}\" start=\"{offset}\">",
            escape_xml(&reel.title),
            to_rational(duration)
        ));
        lines.push(format!(
            "              <video ref=\"a1\" offset=\"0/1s\" duration=\"{total}\"/>"
        ));

        lines.push(format!(
            "              <marker start=\"{offset}\" duration=\"1/1s\" value=\"{}\"/>",
            escape_xml(&format!(
                "[{}] {}",
                reel.priority.as_str().to_uppercase(),
                reel.hook
            ))
        ));

        // Editing-guide markers, only when they fall inside the reel.
        if let Some(guide) = &reel.editing_guide {
            for cut in &guide.cuts {
                let sec = mmss_to_seconds(&cut.timecode);
                if sec >= start_sec && sec <= end_sec {
                    lines.push(format!(
                        "              <marker start=\"{}\" duration=\"1/1s\" value=\"{}\"/>",
                        to_rational(sec),
                        escape_xml(&format!("CUT [{}]: {}", cut.cut_type.as_str(), cut.description))
                    ));
                }
            }
            for zoom in &guide.zoom_moments {
                let sec = mmss_to_seconds(&zoom.timecode);
                if sec >= start_sec && sec <= end_sec {
                    lines.push(format!(
                        "              <marker start=\"{}\" duration=\"1/1s\" value=\"{}\"/>",
                        to_rational(sec),
                        escape_xml(&format!("ZOOM [{}]: {}", zoom.zoom_type.as_str(), zoom.reason))
                    ));
                }
            }
            for overlay in &guide.text_overlays {
                let sec = mmss_to_seconds(&overlay.timecode);
                if sec >= start_sec && sec <= end_sec {
                    lines.push(format!(
                        "              <marker start=\"{}\" duration=\"1/1s\" value=\"{}\"/>",
                        to_rational(sec),
                        escape_xml(&format!("TEXT [{}]: {}", overlay.style.as_str(), overlay.text))
                    ));
                }
            }
        }

        lines.push("            </clip>".to_string());
    }

    lines.push("          </spine>".to_string());

    if !analysis.engagement_map.is_empty() {
        lines.push("          <!-- Engagement Map Markers -->".to_string());
        for seg in &analysis.engagement_map {
            let seg_start = mmss_to_seconds(&seg.start);
            let seg_end = mmss_to_seconds(&seg.end);
            lines.push(format!(
                "          <chapter-marker start=\"{}\" duration=\"{}\" value=\"{}\"/>",
                to_rational(seg_start),
                to_rational(seg_end.saturating_sub(seg_start)),
                escape_xml(&format!(
                    "[{}] {}: {}",
                    seg.level.as_str().to_uppercase(),
                    seg.emotion,
                    seg.note
                ))
            ));
        }
    }

    if let Some(retention) = &analysis.retention_prediction {
        lines.push("          <!-- Retention Markers -->".to_string());
        for dp in &retention.drop_points {
            lines.push(format!(
                "          <marker start=\"{}\" duration=\"1/1s\" value=\"{}\"/>",
                to_rational(mmss_to_seconds(&dp.timecode)),
                escape_xml(&format!("DROP [{}]: {}", dp.severity.as_str(), dp.reason))
            ));
        }
        for pm in &retention.peak_moments {
            lines.push(format!(
                "          <marker start=\"{}\" duration=\"1/1s\" value=\"{}\"/>",
                to_rational(mmss_to_seconds(&pm.timecode)),
                escape_xml(&format!("PEAK: {}", pm.reason))
            ));
        }
    }

    lines.push("        </sequence>".to_string());
    lines.push("      </project>".to_string());
    lines.push("    </event>".to_string());
    lines.push("  </library>".to_string());
    lines.push("</fcpxml>".to_string());

    lines.join("\n")
}
