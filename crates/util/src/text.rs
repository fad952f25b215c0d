//! Text helpers shared by the request logger and the renderer.

use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const REDACTED: &str = "[REDACTED]";

fn is_sensitive_key(key: &str) -> bool {
    let lowered = key.to_ascii_lowercase();
    ["password", "token", "secret", "authorization"]
        .iter()
        .any(|needle| lowered.contains(needle))
}

/// Returns a copy of `value` with every sensitive-looking key's value replaced.
pub fn redact_json(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(redact_json).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let val = if is_sensitive_key(key) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact_json(val)
                    };
                    (key.clone(), val)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Truncates `text` to at most `width` terminal cells, ending with `…` when
/// anything was cut.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn redacts_nested_password_fields() {
        let payload = json!({
            "email": "a@b.com",
            "password": "secret",
            "nested": { "confirmPassword": "secret", "bio": "hi" }
        });
        let redacted = redact_json(&payload);
        assert_eq!(redacted["email"], "a@b.com");
        assert_eq!(redacted["password"], REDACTED);
        assert_eq!(redacted["nested"]["confirmPassword"], REDACTED);
        assert_eq!(redacted["nested"]["bio"], "hi");
    }

    #[test]
    fn truncation_respects_cell_width() {
        assert_eq!(truncate_to_width("Leather Boots", 20), "Leather Boots");
        assert_eq!(truncate_to_width("Leather Boots", 8), "Leather…");
        assert_eq!(truncate_to_width("ブーツブーツ", 5), "ブー…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
