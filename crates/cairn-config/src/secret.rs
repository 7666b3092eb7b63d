//! Opaque credential wrapper.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// Placeholder rendered wherever a Secret would otherwise leak.
const REDACTED: &str = "[REDACTED]";

/// An opaque credential wrapper.
///
/// `Display`, `Debug`, and `Serialize` all render a fixed mask — never any
/// part of the raw value. The only way to get the underlying string back is
/// the explicit [`Secret::reveal`] call, typically made once while building
/// an outbound authorization header.
///
/// Secrets are created at configuration time and never mutated; cloning
/// shares the value, so they are safe to hand to concurrently running
/// actions.
#[derive(Clone)]
pub struct Secret {
    value: String,
    label: Option<String>,
}

impl Secret {
    /// Wrap a raw credential string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            value: raw.into(),
            label: None,
        }
    }

    /// Attach a label rendered alongside the mask for diagnostics
    /// (e.g. `"openai_api_key"`).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Explicitly retrieve the wrapped value.
    ///
    /// Errors with [`ConfigError::EmptySecret`] when the wrapped value is
    /// empty, so a missing credential surfaces as a configuration failure
    /// rather than an upstream 401.
    pub fn reveal(&self) -> Result<&str, ConfigError> {
        if self.value.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(&self.value)
    }

    /// Whether this Secret wraps an empty value.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The diagnostic label, if one was attached.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{REDACTED} ({label})"),
            None => write!(f, "{REDACTED}"),
        }
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Secret").field(&REDACTED).finish()
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Secret::new)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_returns_original() {
        let secret = Secret::new("sk-abc123");
        assert_eq!(secret.reveal().unwrap(), "sk-abc123");
    }

    #[test]
    fn test_reveal_empty_fails() {
        let secret = Secret::new("");
        assert_eq!(secret.reveal(), Err(ConfigError::EmptySecret));
        assert!(secret.is_empty());
    }

    #[test]
    fn test_display_never_contains_value() {
        let secret = Secret::new("sk-abc123");
        let rendered = secret.to_string();
        assert!(!rendered.contains("abc123"));
        assert!(!rendered.contains("sk-"));
        assert_eq!(rendered, "[REDACTED]");
    }

    #[test]
    fn test_debug_never_contains_value() {
        let secret = Secret::new("sk-abc123");
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("abc123"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_display_with_label() {
        let secret = Secret::new("sk-abc123").with_label("openai_api_key");
        let rendered = secret.to_string();
        assert_eq!(rendered, "[REDACTED] (openai_api_key)");
        assert!(!rendered.contains("abc123"));
    }

    #[test]
    fn test_serialize_redacts() {
        let secret = Secret::new("sk-abc123");
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, "\"[REDACTED]\"");
    }

    #[test]
    fn test_deserialize_wraps_raw_value() {
        let secret: Secret = serde_json::from_str("\"sk-abc123\"").unwrap();
        assert_eq!(secret.reveal().unwrap(), "sk-abc123");
    }

    #[test]
    fn test_clone_shares_value() {
        let secret = Secret::new("sk-abc123");
        let clone = secret.clone();
        assert_eq!(clone.reveal().unwrap(), "sk-abc123");
    }
}
