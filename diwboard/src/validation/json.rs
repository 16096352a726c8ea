use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{DashboardError, Result};

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").expect("fence pattern is valid")
});

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([\]}])").expect("trailing comma pattern is valid"));

/// Pull a JSON value out of raw model output.
///
/// Tolerates a surrounding code fence (with or without a language tag) and
/// trailing commas before `]` or `}`. The raw text is logged on failure.
pub fn extract_json(raw: &str) -> Result<Value> {
    let mut candidate = raw.trim();

    if let Some(inner) = FENCE
        .captures(candidate)
        .and_then(|caps| caps.get(2))
        .filter(|inner| !inner.as_str().is_empty())
    {
        candidate = inner.as_str().trim();
    }

    let cleaned = TRAILING_COMMA.replace_all(candidate, "$1");

    serde_json::from_str(&cleaned).map_err(|e| {
        tracing::error!(error = %e, raw_response = %raw, "Failed to parse JSON response");
        DashboardError::Parse(format!("Failed to parse JSON response: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_object() {
        let value = extract_json(r#"  {"a": 1}  "#).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_fenced_with_language_tag() {
        let raw = "```json\n{\"a\": [1, 2]}\n```";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_fenced_without_language_tag() {
        let raw = "```\n[true]\n```";
        assert_eq!(extract_json(raw).unwrap(), json!([true]));
    }

    #[test]
    fn test_trailing_commas_stripped() {
        let raw = "{\"list\": [1, 2, 3,], \"nested\": {\"x\": 1,\n},}";
        assert_eq!(
            extract_json(raw).unwrap(),
            json!({"list": [1, 2, 3], "nested": {"x": 1}})
        );
    }

    #[test]
    fn test_invalid_json_is_parse_failure() {
        let result = extract_json("The model refused to answer.");
        assert!(matches!(result, Err(DashboardError::Parse(_))));
    }

    #[test]
    fn test_empty_input_is_parse_failure() {
        assert!(matches!(extract_json("   "), Err(DashboardError::Parse(_))));
    }
}
