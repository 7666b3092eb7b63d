//! Built-in registry entries for the Cairn system.
//!
//! Two collections ship out of the box:
//!
//! - `"openai"` — model invokers (completion and chat) that call the OpenAI
//!   HTTP API with the credential revealed only while building the
//!   authorization header, retried through the resilient invoker.
//! - `"functional"` — local/programmatic actions: a generic HTTP call and a
//!   pair of regex utilities. These are mostly demo entries; hosts are
//!   expected to register their own actions alongside them.

pub mod http;
pub mod openai;
pub mod text;

use cairn_config::Secret;
use cairn_registry::ActionRegistry;
use cairn_types::ActionError;

pub use http::CallApi;
pub use openai::{OpenAiChat, OpenAiCompletion};

/// Collection holding the model invokers.
pub const OPENAI_COLLECTION: &str = "openai";

/// Collection holding the programmatic actions.
pub const FUNCTIONAL_COLLECTION: &str = "functional";

/// Credentials handed to the built-in actions at registration time.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// OpenAI API key. Model actions are registered even without one, but
    /// calling them then fails with a configuration error.
    pub openai_api_key: Option<Secret>,
}

impl Credentials {
    /// Resolve the OpenAI key from `OPENAI_API_KEY`, falling back to an
    /// explicit config value.
    pub fn from_env(config_value: Option<&str>) -> Self {
        Self {
            openai_api_key: cairn_config::resolve_secret("OPENAI_API_KEY", config_value)
                .map(|resolved| resolved.into_secret()),
        }
    }
}

/// Register every built-in action into the given registry.
pub fn register_builtins(
    registry: &ActionRegistry,
    credentials: &Credentials,
) -> Result<(), ActionError> {
    let api_key = credentials
        .openai_api_key
        .clone()
        .unwrap_or_else(|| Secret::new("").with_label("openai_api_key"));

    registry.register(
        OpenAiCompletion::new(api_key.clone()),
        OPENAI_COLLECTION,
        "openai-completion",
        "Given a prompt, the model will return one or more predicted completions, and can \
         also return the probabilities of alternative tokens at each position.",
    )?;
    registry.register(
        OpenAiChat::new(api_key),
        OPENAI_COLLECTION,
        "openai-chat",
        "Given a list of messages describing a conversation, the model will return a response.",
    )?;

    registry.register(
        CallApi::new(),
        FUNCTIONAL_COLLECTION,
        "call_api_requests",
        "Call an API over HTTP",
    )?;
    registry.register(
        text::regex_search(),
        FUNCTIONAL_COLLECTION,
        "regex_search",
        "Perform a regex search on the text and get items in an array",
    )?;
    registry.register(
        text::regex_substitute(),
        FUNCTIONAL_COLLECTION,
        "regex_substitute",
        "Perform a regex substitution on the text and get the result",
    )?;

    Ok(())
}

/// Map a transport-level failure into the shared error contract.
///
/// All of these are classified transient: there is no HTTP status to say
/// otherwise, and connection resets and timeouts are worth a retry.
pub(crate) fn net_err(err: reqwest::Error) -> ActionError {
    if err.is_timeout() {
        ActionError::network(format!("request timed out: {err}"))
    } else if err.is_connect() {
        ActionError::network(format!("connection failed: {err}"))
    } else {
        ActionError::network(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_builtins_populates_both_collections() {
        let registry = ActionRegistry::new();
        register_builtins(&registry, &Credentials::default()).unwrap();

        let openai: Vec<String> = registry
            .list(OPENAI_COLLECTION)
            .iter()
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(openai, vec!["openai-completion", "openai-chat"]);

        let functional: Vec<String> = registry
            .list(FUNCTIONAL_COLLECTION)
            .iter()
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(
            functional,
            vec!["call_api_requests", "regex_search", "regex_substitute"]
        );
    }

    #[test]
    fn test_register_builtins_twice_overwrites() {
        let registry = ActionRegistry::new();
        register_builtins(&registry, &Credentials::default()).unwrap();
        register_builtins(&registry, &Credentials::default()).unwrap();
        assert_eq!(registry.len(), 5);
    }

    #[tokio::test]
    async fn test_model_action_without_credential_is_config_error() {
        let registry = ActionRegistry::new();
        register_builtins(&registry, &Credentials::default()).unwrap();

        let err = registry
            .invoke(
                OPENAI_COLLECTION,
                "openai-chat",
                serde_json::json!({
                    "model": "gpt-4",
                    "messages": [{"role": "user", "content": "hi"}],
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Config(_)));
    }
}
