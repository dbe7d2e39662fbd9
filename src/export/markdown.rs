//! Markdown export: a human-readable dump of the full analysis.

use crate::analysis::AnalysisResult;
use crate::session::SessionState;
use std::fmt::Write;

pub fn generate_markdown(session: &SessionState, analysis: &AnalysisResult) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# ReelCutter — Analysis\n");
    let _ = writeln!(md, "**File:** {}", session.filename);
    let _ = writeln!(
        md,
        "**Model:** {}",
        session.model.as_deref().unwrap_or("default")
    );
    let _ = writeln!(md, "**Date:** {}\n", session.created_at.format("%Y-%m-%d"));
    let _ = writeln!(md, "## Summary\n\n{}\n", analysis.summary);

    if !analysis.titles.is_empty() {
        let _ = writeln!(md, "## Title suggestions\n");
        for (i, title) in analysis.titles.iter().enumerate() {
            let _ = writeln!(md, "{}. **{}**", i + 1, title.title);
            let _ = writeln!(md, "   - Style: {}", title.style);
            let _ = writeln!(md, "   - Why: {}", title.why);
        }
        md.push('\n');
    }

    if !analysis.thumbnails.is_empty() {
        let _ = writeln!(md, "## Thumbnail concepts\n");
        for (i, thumb) in analysis.thumbnails.iter().enumerate() {
            let _ = writeln!(md, "### Thumbnail {}\n", i + 1);
            let _ = writeln!(md, "- **Concept:** {}", thumb.concept);
            let _ = writeln!(md, "- **Text overlay:** {}", thumb.text_overlay);
            let _ = writeln!(md, "- **Style:** {}", thumb.style);
            let _ = writeln!(md, "- **Reference:** {}\n", thumb.reference);
        }
    }

    let _ = writeln!(md, "## Reel suggestions\n");
    for reel in &analysis.reels {
        let _ = writeln!(md, "### {}\n", reel.title);
        let _ = writeln!(md, "- **Priority:** {}", reel.priority.as_str());
        let _ = writeln!(
            md,
            "- **Time:** {} — {} ({})",
            reel.start, reel.end, reel.duration
        );
        let _ = writeln!(md, "- **Hook:** {}", reel.hook);
        let _ = writeln!(md, "- **Why:** {}", reel.why);
        let _ = writeln!(md, "- **Outline:** {}", reel.script_outline);
        if !reel.editing_tips.is_empty() {
            let _ = writeln!(md, "- **Editing tips:**");
            for tip in &reel.editing_tips {
                let _ = writeln!(md, "  - {tip}");
            }
        }
        if !reel.hashtags.is_empty() {
            let _ = writeln!(md, "- **Hashtags:** {}", reel.hashtags.join(" "));
        }
        md.push('\n');
    }

    if !analysis.hooks.is_empty() {
        let _ = writeln!(md, "## Hooks\n");
        for (i, hook) in analysis.hooks.iter().enumerate() {
            let _ = writeln!(md, "{}. [{}] {}", i + 1, hook.hook_type, hook.text);
        }
        md.push('\n');
    }

    if !analysis.structure_notes.is_empty() {
        let _ = writeln!(md, "## Structure notes\n\n{}", analysis.structure_notes);
    }

    md
}
