//! Regex utility actions.
//!
//! Local text transforms with no I/O; they bypass the resilient invoker. A
//! malformed pattern is an expected failure mode and comes back as a
//! validation error value, never a panic.

use regex::Regex;
use serde_json::json;

use cairn_registry::FnAction;
use cairn_types::{ActionError, ParamSpec, ParamType, Signature};

fn compile(pattern: &str) -> Result<Regex, ActionError> {
    Regex::new(pattern).map_err(|e| ActionError::Validation(format!("invalid pattern: {e}")))
}

/// Find all matches of `pattern` in `text`, returned as an array.
///
/// When the pattern has exactly one capture group the group's text is
/// collected instead of the whole match, mirroring the usual findall
/// behavior.
pub fn regex_search() -> FnAction {
    FnAction::new(
        Signature::new()
            .with(ParamSpec::required("pattern", ParamType::String))
            .with(ParamSpec::required("text", ParamType::String)),
        |args| {
            let pattern = args["pattern"].as_str().unwrap_or_default();
            let text = args["text"].as_str().unwrap_or_default();
            let re = compile(pattern)?;
            let matches: Vec<String> = if re.captures_len() == 2 {
                re.captures_iter(text)
                    .filter_map(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
                    .collect()
            } else {
                re.find_iter(text).map(|m| m.as_str().to_string()).collect()
            };
            Ok(json!(matches))
        },
    )
}

/// Replace every match of `pattern` in `text` with `repl`.
pub fn regex_substitute() -> FnAction {
    FnAction::new(
        Signature::new()
            .with(ParamSpec::required("pattern", ParamType::String))
            .with(ParamSpec::required("repl", ParamType::String))
            .with(ParamSpec::required("text", ParamType::String)),
        |args| {
            let pattern = args["pattern"].as_str().unwrap_or_default();
            let repl = args["repl"].as_str().unwrap_or_default();
            let text = args["text"].as_str().unwrap_or_default();
            let re = compile(pattern)?;
            Ok(json!(re.replace_all(text, repl).into_owned()))
        },
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_registry::Action;

    #[tokio::test]
    async fn test_search_collects_matches() {
        let action = regex_search();
        let out = action
            .call(json!({"pattern": r"\d+", "text": "a1 b22 c333"}))
            .await
            .unwrap();
        assert_eq!(out, json!(["1", "22", "333"]));
    }

    #[tokio::test]
    async fn test_search_single_capture_group_collects_group() {
        let action = regex_search();
        let out = action
            .call(json!({"pattern": r"(\w+)@\w+\.com", "text": "a@x.com, b@y.com"}))
            .await
            .unwrap();
        assert_eq!(out, json!(["a", "b"]));
    }

    #[tokio::test]
    async fn test_search_no_matches_is_empty_array() {
        let action = regex_search();
        let out = action
            .call(json!({"pattern": r"\d+", "text": "no digits here"}))
            .await
            .unwrap();
        assert_eq!(out, json!([]));
    }

    #[tokio::test]
    async fn test_malformed_pattern_is_validation_error() {
        let action = regex_search();
        let err = action
            .call(json!({"pattern": "(", "text": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
    }

    #[tokio::test]
    async fn test_substitute() {
        let action = regex_substitute();
        let out = action
            .call(json!({"pattern": r"\d+", "repl": "#", "text": "a1 b22"}))
            .await
            .unwrap();
        assert_eq!(out, json!("a# b#"));
    }

    #[tokio::test]
    async fn test_substitute_no_match_returns_input() {
        let action = regex_substitute();
        let out = action
            .call(json!({"pattern": "zzz", "repl": "#", "text": "abc"}))
            .await
            .unwrap();
        assert_eq!(out, json!("abc"));
    }
}
