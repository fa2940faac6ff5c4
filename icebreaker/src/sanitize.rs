//! Input sanitization for request bodies.
//!
//! Profile text arrives from scraped pages, so every string field is scrubbed
//! of markup and script payloads before it reaches the prompt composer or the
//! cache. Sanitization happens after validation; bounds apply to the raw
//! input.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;

use crate::error::Result;

fn script_block_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>")
            .unwrap_or_else(|e| panic!("invalid script block pattern: {e}"))
    })
}

fn tag_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"<[^>]*>").unwrap_or_else(|e| panic!("invalid tag pattern: {e}"))
    })
}

fn js_scheme_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"(?i)javascript:")
            .unwrap_or_else(|e| panic!("invalid scheme pattern: {e}"))
    })
}

fn event_handler_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r#"(?i)\bon\w+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
            .unwrap_or_else(|e| panic!("invalid handler pattern: {e}"))
    })
}

/// Strip markup from a single string: script/style elements with their
/// bodies, inline event handlers, `javascript:` schemes, then any remaining
/// tags. Whitespace is collapsed afterwards so tag removal does not leave
/// double spaces inside prose.
pub fn clean_text(input: &str) -> String {
    let cleaned = script_block_re().replace_all(input, "");
    let cleaned = event_handler_re().replace_all(&cleaned, "");
    let cleaned = js_scheme_re().replace_all(&cleaned, "");
    let cleaned = tag_re().replace_all(&cleaned, " ");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Recursively scrub every string in a JSON value in place.
pub fn scrub_value(value: &mut Value) {
    match value {
        Value::String(s) => *s = clean_text(s),
        Value::Array(items) => items.iter_mut().for_each(scrub_value),
        Value::Object(map) => map.values_mut().for_each(scrub_value),
        _ => {}
    }
}

/// Scrub every string field of a typed value by round-tripping it through
/// `serde_json::Value`.
pub fn sanitize<T>(value: &T) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut json = serde_json::to_value(value)?;
    scrub_value(&mut json);
    Ok(serde_json::from_value(json)?)
}
