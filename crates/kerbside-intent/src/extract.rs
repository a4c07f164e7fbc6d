//! Best-effort JSON extraction from free-form model output.
//!
//! Models are told to answer with a single JSON object, but the reply may
//! arrive wrapped in prose or code fences. Strategy: strict parse of the
//! whole trimmed text first; on failure, a single forward scan finds the
//! first balanced top-level object by brace counting (string- and
//! escape-aware), and that substring is parsed. No regex involved.

use serde_json::{Map, Value};

const ERROR_SUMMARY_MAX_LEN: usize = 240;

/// Extract the first well-formed JSON object from `text`.
///
/// Returns `None` when no parseable object exists; the caller treats that
/// as "no structured intent" and falls back.
#[must_use]
pub fn extract_first_json_object(text: &str) -> Option<Map<String, Value>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return Some(map);
    }

    let candidate = first_balanced_object(trimmed)?;
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Locate the first `{ ... }` substring with balanced braces, ignoring
/// braces inside JSON string literals.
fn first_balanced_object(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let start = s.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Collapse an error message to a single line, capped at 240 characters.
///
/// Keeps fallback notes readable and keeps huge HTML error bodies out of
/// API responses.
#[must_use]
pub fn shorten_error_text(s: &str) -> String {
    let one_line = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if one_line.len() <= ERROR_SUMMARY_MAX_LEN {
        return one_line;
    }
    let mut cut = ERROR_SUMMARY_MAX_LEN;
    while !one_line.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…", &one_line[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_string_object_parses_strictly() {
        let map = extract_first_json_object(r#"{"query": "market", "radius_m": 800}"#)
            .expect("object");
        assert_eq!(map["query"], "market");
        assert_eq!(map["radius_m"], 800);
    }

    #[test]
    fn object_inside_code_fence_is_found() {
        let text = "Here you go:\n```json\n{\"query\": \"city hall\"}\n```\nanything else?";
        let map = extract_first_json_object(text).expect("object");
        assert_eq!(map["query"], "city hall");
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_scan() {
        let text = r#"note {"query": "the {weird} place", "limit": 5} trailing"#;
        let map = extract_first_json_object(text).expect("object");
        assert_eq!(map["query"], "the {weird} place");
        assert_eq!(map["limit"], 5);
    }

    #[test]
    fn escaped_quotes_inside_strings_are_handled() {
        let text = r#"{"query": "say \"hi\"", "limit": 1}"#;
        let map = extract_first_json_object(text).expect("object");
        assert_eq!(map["query"], "say \"hi\"");
    }

    #[test]
    fn nested_objects_return_the_outermost() {
        let text = r#"{"a": {"b": 1}, "c": 2} {"second": true}"#;
        let map = extract_first_json_object(text).expect("object");
        assert_eq!(map["c"], 2);
        assert!(map.get("second").is_none());
    }

    #[test]
    fn top_level_arrays_are_not_objects() {
        assert!(extract_first_json_object(r#"[1, 2, 3]"#).is_none());
    }

    #[test]
    fn unbalanced_or_absent_objects_yield_none() {
        assert!(extract_first_json_object("no json here").is_none());
        assert!(extract_first_json_object(r#"{"query": "oops"#).is_none());
        assert!(extract_first_json_object("").is_none());
    }

    #[test]
    fn shorten_collapses_newlines() {
        assert_eq!(
            shorten_error_text("a\nmulti\r\n  line   error"),
            "a multi line error"
        );
    }

    #[test]
    fn shorten_caps_long_messages() {
        let long = "x".repeat(1_000);
        let short = shorten_error_text(&long);
        assert!(short.chars().count() == 241, "240 chars plus ellipsis");
        assert!(short.ends_with('…'));
    }
}
