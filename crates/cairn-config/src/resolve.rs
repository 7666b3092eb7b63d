//! Credential resolution with provenance.
//!
//! Resolution order:
//! 1. Environment variable
//! 2. Explicit config value (with warning — plaintext credentials are
//!    discouraged)

use crate::secret::Secret;

/// Where a credential was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Environment variable.
    EnvVar(String),
    /// Explicit configuration value (plaintext — not recommended).
    ConfigValue,
}

impl std::fmt::Display for SecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretSource::EnvVar(var) => write!(f, "env var {var}"),
            SecretSource::ConfigValue => write!(f, "config value (plaintext)"),
        }
    }
}

/// Result of credential resolution with provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    value: String,
    /// Where the credential was found.
    pub source: SecretSource,
}

impl ResolvedSecret {
    /// Wrap the resolved value, labeling it with its provenance.
    pub fn into_secret(self) -> Secret {
        Secret::new(self.value).with_label(self.source.to_string())
    }
}

/// Resolve a credential using the full resolution chain.
///
/// Checks the named environment variable first, then the explicit config
/// value. Empty values are treated as unset. Returns `None` when no source
/// yields a credential.
pub fn resolve_secret(env_var: &str, config_value: Option<&str>) -> Option<ResolvedSecret> {
    if let Ok(value) = std::env::var(env_var) {
        if !value.is_empty() {
            return Some(ResolvedSecret {
                value,
                source: SecretSource::EnvVar(env_var.to_string()),
            });
        }
    }

    match config_value {
        Some(v) if !v.is_empty() => {
            tracing::warn!(
                env_var,
                "credential resolved from plaintext config; prefer the environment variable"
            );
            Some(ResolvedSecret {
                value: v.to_string(),
                source: SecretSource::ConfigValue,
            })
        }
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
