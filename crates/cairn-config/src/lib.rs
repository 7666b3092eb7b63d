//! Credential handling for the Cairn action registry.
//!
//! Provides [`Secret`], an opaque wrapper that keeps credentials out of logs
//! and serialized output, and the resolution chain that produces Secrets from
//! the environment or explicit configuration with provenance attached.

pub mod error;
pub mod resolve;
pub mod secret;

pub use error::ConfigError;
pub use resolve::{ResolvedSecret, SecretSource, resolve_secret};
pub use secret::Secret;
