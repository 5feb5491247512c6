//! Lenient decoding of service payloads.
//!
//! Payloads are untrusted. Response types declare every field as `Option`,
//! so a missing field is never an error here; callers decide what is
//! required. A payload that is not JSON at all, or has the wrong overall
//! shape, fails as a whole and nothing is applied.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::AiError;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*\n?(.*?)\s*```\s*$").expect("code fence pattern is valid")
});

/// Removes a surrounding Markdown code fence, if any.
pub fn strip_code_fence(raw: &str) -> &str {
    match CODE_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    }
}

/// Decodes a payload into `T`.
pub fn parse_payload<T: DeserializeOwned>(raw: &str) -> Result<T, AiError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "could not decode completion payload");
        AiError::Malformed(e.to_string())
    })
}

/// Trims a string field and treats blank text as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        a: Option<String>,
        b: Option<u32>,
    }

    #[test]
    fn strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[1]\n```\n"), "[1]");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn parse_payload_tolerates_missing_fields() {
        let parsed: Sample = parse_payload("{\"a\":\"x\"}").unwrap();

        assert_eq!(
            parsed,
            Sample {
                a: Some("x".to_string()),
                b: None,
            }
        );
    }

    #[test]
    fn parse_payload_accepts_fenced_json() {
        let parsed: Sample = parse_payload("```json\n{\"b\": 3}\n```").unwrap();

        assert_eq!(parsed.b, Some(3));
    }

    #[test]
    fn parse_payload_rejects_non_json() {
        let result: Result<Sample, _> = parse_payload("Sorry, I cannot help with that.");

        assert!(matches!(result, Err(AiError::Malformed(_))));
    }

    #[test]
    fn parse_payload_rejects_wrong_shape() {
        let result: Result<Sample, _> = parse_payload("[1, 2, 3]");

        assert!(matches!(result, Err(AiError::Malformed(_))));
    }

    #[test]
    fn parse_payload_blank_is_empty_response() {
        let result: Result<Sample, _> = parse_payload("   ");

        assert!(matches!(result, Err(AiError::EmptyResponse)));
    }

    #[test]
    fn non_blank_filters_whitespace() {
        assert_eq!(non_blank(Some("  hi ".to_string())), Some("hi".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
