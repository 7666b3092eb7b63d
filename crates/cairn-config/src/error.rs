//! Error types for credential handling.

use thiserror::Error;

/// Error type for configuration and credential failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `reveal` was called on a Secret wrapping an empty value.
    #[error("secret is empty or unset")]
    EmptySecret,

    /// A required credential could not be resolved from any source.
    #[error("missing credential: {0}")]
    MissingCredential(String),
}
