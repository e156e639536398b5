//! Turn raw model text into an [`AltTextInfo`].
//!
//! Models often wrap JSON in a markdown fence even when asked not to. The
//! reconciler strips that fence, parses the JSON object, and makes every
//! prose field end with a period so screen readers pause correctly.

use crate::error::{AltaiError, Result};
use crate::types::AltTextInfo;
use serde_json::{Map, Value};

const FENCE: &str = "```";

/// Keys whose string values are labels rather than sentences.
///
/// `confidence` is skipped on purpose: "high" stays "high", never "high.".
const LABEL_KEYS: &[&str] = &["confidence"];

/// Strip the fence, parse, and punctuate the model's answer.
///
/// Fails with [`AltaiError::MalformedOutput`] when the text is not a JSON
/// object after fence stripping.
pub fn reconcile(raw: &str) -> Result<AltTextInfo> {
    let text = strip_code_fence(raw);

    let value: Value = serde_json::from_str(text).map_err(|e| AltaiError::MalformedOutput {
        message: format!("{e} in model output: {}", preview(text)),
    })?;

    let Value::Object(mut map) = value else {
        return Err(AltaiError::MalformedOutput {
            message: format!("expected a JSON object, got: {}", preview(text)),
        });
    };

    ensure_periods(&mut map);
    Ok(into_info(map))
}

/// Remove a surrounding ```` ```json ```` fence if both ends are present.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    if text.len() < 2 * FENCE.len() || !text.starts_with(FENCE) || !text.ends_with(FENCE) {
        return raw;
    }

    let inner = &text[FENCE.len()..text.len() - FENCE.len()];
    let inner = match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &inner[4..],
        _ => inner,
    };

    // The opening fence line must end in a newline before the payload starts
    let body = inner.trim_start();
    if !inner[..inner.len() - body.len()].contains('\n') {
        return raw;
    }
    body.trim_end()
}

/// Append "." to every non-empty top-level string that lacks one.
fn ensure_periods(map: &mut Map<String, Value>) {
    for (key, value) in map.iter_mut() {
        if LABEL_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Value::String(s) = value {
            if !s.is_empty() && !s.ends_with('.') {
                s.push('.');
            }
        }
    }
}

/// Lift the known keys into typed fields; anything else, or a known key with
/// an unexpected type, stays in `extra`.
fn into_info(mut map: Map<String, Value>) -> AltTextInfo {
    let alt = take_string(&mut map, "alt");
    let decorative_reason = take_string(&mut map, "decorative_reason");
    let confidence = take_string(&mut map, "confidence");
    let long_description = match map.get("long_description") {
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => map
            .remove("long_description")
            .and_then(|v| serde_json::from_value(v).ok()),
        _ => None,
    };

    AltTextInfo {
        alt,
        decorative_reason,
        long_description,
        confidence,
        extra: map,
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(_)) => match map.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

fn preview(text: &str) -> String {
    const MAX: usize = 200;
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
