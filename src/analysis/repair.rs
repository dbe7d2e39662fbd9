//! Resilient extraction and repair of model-emitted JSON
//!
//! Models asked for JSON frequently wrap it in a fenced code block,
//! truncate mid-token at an output-length limit, or refuse outright. This
//! module recovers a parseable document whenever the content is even
//! approximately well-formed, and fails loudly otherwise. Repair is
//! structural only: unclosed strings/brackets at the document's tail are
//! closed, prose inside string values is never touched.

use crate::error::AnalysisError;
use serde_json::Value;
use tracing::{error, warn};

const REFUSAL_PREFIXES: &[&str] = &["i'm sorry", "i cannot", "i can't", "sorry,"];

/// Extract and parse a JSON document from raw model output.
///
/// Order: refusal detection, fenced-block/brace extraction, direct parse,
/// greedy first-`{`-to-last-`}` parse, then the structural repair pass.
/// All-or-nothing: a failed repair is a hard error, never a partial value.
pub fn parse_analysis_json(raw: &str) -> Result<Value, AnalysisError> {
    // Refusals must short-circuit before any JSON attempt: short non-JSON
    // text can otherwise masquerade as truncated JSON and waste repair
    // effort.
    let trimmed = raw.trim();
    let lowered = trimmed.to_lowercase();
    if REFUSAL_PREFIXES.iter().any(|p| lowered.starts_with(p))
        || (trimmed.len() < 200 && !trimmed.contains('{'))
    {
        let snippet: String = trimmed.chars().take(150).collect();
        return Err(AnalysisError::ModelRefused(snippet));
    }

    let json_text = extract_json(raw);

    if let Ok(value) = serde_json::from_str::<Value>(json_text) {
        return Ok(value);
    }

    // Greedy-brace fallback: first `{` through last `}`.
    if let (Some(first), Some(last)) = (json_text.find('{'), json_text.rfind('}')) {
        if first < last {
            if let Ok(value) = serde_json::from_str::<Value>(&json_text[first..=last]) {
                return Ok(value);
            }
        }
    }

    // Both parses failed: the document was likely truncated mid-stream.
    let repaired = repair_truncated_json(json_text);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => {
            warn!("Model response was truncated, repaired JSON successfully");
            Ok(value)
        }
        Err(_) => {
            let tail: String = {
                let chars: Vec<char> = repaired.chars().collect();
                chars[chars.len().saturating_sub(200)..].iter().collect()
            };
            error!("JSON repair failed. Repaired text (last 200 chars): {tail}");
            Err(AnalysisError::UnparseableResponse)
        }
    }
}

/// Pull the JSON payload out of free-form model text.
///
/// Preference order: a closed fenced code block, an unclosed fenced block
/// (trailing partial fence stripped), the substring from the first `{`,
/// the raw text verbatim.
fn extract_json(raw: &str) -> &str {
    if let Some(open) = raw.find("```") {
        let after_fence = &raw[open + 3..];
        // Skip an optional language tag on the fence line.
        let body = after_fence
            .strip_prefix("json")
            .unwrap_or(after_fence)
            .trim_start();

        if let Some(close) = body.find("```") {
            return body[..close].trim();
        }

        // Unclosed block (truncated response): strip up to two trailing
        // backticks left from a partial closing fence.
        return body.trim().trim_end_matches('`').trim_end();
    }

    if let Some(start) = raw.find('{') {
        return &raw[start..];
    }

    raw
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    OutsideString,
    InsideString,
    Escaped,
}

/// Close a truncated JSON document: terminate an open string literal,
/// drop a single dangling comma, then close open brackets in LIFO order.
fn repair_truncated_json(text: &str) -> String {
    let mut repaired = text.trim_end().to_string();

    let mut state = ScanState::OutsideString;
    let mut stack: Vec<char> = Vec::new();

    for ch in repaired.chars() {
        match state {
            ScanState::Escaped => state = ScanState::InsideString,
            ScanState::InsideString => match ch {
                '\\' => state = ScanState::Escaped,
                '"' => state = ScanState::OutsideString,
                _ => {}
            },
            ScanState::OutsideString => match ch {
                '"' => state = ScanState::InsideString,
                '{' | '[' => stack.push(ch),
                '}' | ']' => {
                    stack.pop();
                }
                _ => {}
            },
        }
    }

    if state != ScanState::OutsideString {
        repaired.push('"');
    }

    // A dangling list/object element.
    let trimmed_len = repaired.trim_end().len();
    repaired.truncate(trimmed_len);
    if repaired.ends_with(',') {
        repaired.pop();
    }

    for open in stack.into_iter().rev() {
        repaired.push(if open == '{' { '}' } else { ']' });
    }

    repaired
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_json_parses_directly() {
        let value = parse_analysis_json(r#"{"summary": "ok", "reels": []}"#).unwrap();
        assert_eq!(value, json!({"summary": "ok", "reels": []}));
    }

    #[test]
    fn parse_equals_direct_parse_on_valid_input() {
        // Repair must never change the result when direct parsing works.
        let raw = r#"{"a": [1, 2, {"b": "with } and ] inside strings"}], "c": null}"#;
        let direct: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(parse_analysis_json(raw).unwrap(), direct);
    }

    #[test]
    fn extracts_from_closed_code_block() {
        let raw = "Here is the analysis:\n```json\n{\"summary\": \"x\"}\n```\nDone.";
        let value = parse_analysis_json(raw).unwrap();
        assert_eq!(value["summary"], "x");
    }

    #[test]
    fn extracts_from_unclosed_code_block() {
        let raw = "```json\n{\"summary\": \"x\", \"reels\": []}\n``";
        let value = parse_analysis_json(raw).unwrap();
        assert_eq!(value["summary"], "x");
    }

    #[test]
    fn greedy_brace_fallback_skips_surrounding_prose() {
        let raw = format!(
            "Sure! The JSON you asked for is {} and that concludes it.",
            r#"{"summary": "y"}"#
        );
        let value = parse_analysis_json(&raw).unwrap();
        assert_eq!(value["summary"], "y");
    }

    #[test]
    fn repairs_truncation_inside_nested_string() {
        let value = parse_analysis_json(r#"{"a": [1, 2, {"b": "hel"#).unwrap();
        assert_eq!(value, json!({"a": [1, 2, {"b": "hel"}]}));
    }

    #[test]
    fn repairs_dangling_comma() {
        let value = parse_analysis_json(r#"{"reels": [{"title": "x"},"#).unwrap();
        assert_eq!(value, json!({"reels": [{"title": "x"}]}));
    }

    #[test]
    fn repair_honors_escaped_quotes() {
        let value = parse_analysis_json(r#"{"a": "say \"hi\"", "b": "cut of"#).unwrap();
        assert_eq!(value, json!({"a": "say \"hi\"", "b": "cut of"}));
    }

    #[test]
    fn brackets_inside_strings_do_not_affect_the_stack() {
        let value = parse_analysis_json(r#"{"a": "open { and [ here", "b": [1"#).unwrap();
        assert_eq!(value, json!({"a": "open { and [ here", "b": [1]}));
    }

    #[test]
    fn refusal_is_classified_not_repaired() {
        let err = parse_analysis_json("I'm sorry, I can't help with that.").unwrap_err();
        assert!(matches!(err, AnalysisError::ModelRefused(_)));
    }

    #[test]
    fn short_text_without_brace_is_a_refusal() {
        let err = parse_analysis_json("The transcript appears to be empty.").unwrap_err();
        assert!(matches!(err, AnalysisError::ModelRefused(_)));
    }

    #[test]
    fn long_garbage_is_unparseable_not_refusal() {
        let raw = format!("{{\"a\": {}", "not json at all ".repeat(30));
        let err = parse_analysis_json(&raw).unwrap_err();
        assert!(matches!(err, AnalysisError::UnparseableResponse));
    }

    #[test]
    fn repair_closes_in_lifo_order() {
        assert_eq!(
            repair_truncated_json(r#"{"a": [1, 2, {"b": "hel"#),
            r#"{"a": [1, 2, {"b": "hel"}]}"#
        );
    }
}
