//! Best-effort recovery of a JSON value from free-form model text.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// First `{...}` or `[...]` span, greedy to the last closing bracket of that kind.
fn json_span() -> &'static Regex {
    static SPAN: OnceLock<Regex> = OnceLock::new();
    SPAN.get_or_init(|| Regex::new(r"\{[\s\S]*\}|\[[\s\S]*\]").expect("static regex"))
}

/// Recovers a JSON value from model output.
///
/// 1. strip code fences and parse directly;
/// 2. otherwise parse the first bracketed span found in the text;
/// 3. otherwise `None`.
pub fn extract_json(text: &str) -> Option<Value> {
    let text = strip_json_fences(text);
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }

    let span = json_span().find(text)?;
    serde_json::from_str(span.as_str()).ok()
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
