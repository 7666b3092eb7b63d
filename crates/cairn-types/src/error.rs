//! Error types shared across the Cairn crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using the shared action error.
pub type Result<T> = std::result::Result<T, ActionError>;

// ─────────────────────────────────────────────────────────────────────────────
// Action Error
// ─────────────────────────────────────────────────────────────────────────────

/// Error contract for registered actions and the registry itself.
///
/// Every expected failure mode — a bad upstream status, a malformed pattern,
/// a missing credential — is returned as one of these variants rather than
/// propagated as a panic. Only genuine programming defects use
/// [`ActionError::Internal`], and those abort the current call only.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Bad registration input or bad call arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Lookup miss in the registry.
    #[error("no entry '{id}' in collection '{collection}'")]
    NotFound {
        /// The collection that was searched.
        collection: String,
        /// The identifier that was not found.
        id: String,
    },

    /// Missing or invalid configuration (e.g. an empty credential).
    #[error("configuration error: {0}")]
    Config(String),

    /// Retryable upstream failure: rate limit, 5xx, connection reset, timeout.
    #[error("transient upstream error: {message}")]
    TransientUpstream {
        /// Upstream HTTP status, when the failure came from a response.
        status: Option<u16>,
        /// Human-readable description of the failure.
        message: String,
    },

    /// Non-retryable upstream rejection (4xx other than 429).
    #[error("upstream rejected the request (HTTP {status}): {message}")]
    PermanentUpstream {
        /// Upstream HTTP status.
        status: u16,
        /// Body text or provider error message.
        message: String,
    },

    /// Request/response (de)serialization failure. Not retryable.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A retried invocation ended in a terminal failure.
    ///
    /// Lets an action that retries internally (e.g. a model invoker wrapping
    /// its HTTP call in the resilient invoker) surface `Exhausted` or
    /// `Canceled` through the uniform error contract.
    #[error("invocation failed: {0}")]
    Invocation(#[from] InvocationFailure),

    /// Programming defect escape hatch.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ActionError {
    /// Create a not-found error for a `(collection, id)` pair.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Classify a non-success HTTP status into the upstream error variants.
    ///
    /// 429 and 5xx are transient (retryable); any other status is a
    /// permanent rejection.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            429 => Self::TransientUpstream {
                status: Some(429),
                message: message.into(),
            },
            s if s >= 500 => Self::TransientUpstream {
                status: Some(s),
                message: message.into(),
            },
            s => Self::PermanentUpstream {
                status: s,
                message: message.into(),
            },
        }
    }

    /// Create a transient error with no associated HTTP status
    /// (connection reset, timeout, DNS failure).
    pub fn network(message: impl Into<String>) -> Self {
        Self::TransientUpstream {
            status: None,
            message: message.into(),
        }
    }

    /// Returns true if a retry has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientUpstream { .. })
    }

    /// The machine-usable discriminant for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Config(_) => ErrorKind::Config,
            Self::TransientUpstream { .. } => ErrorKind::TransientUpstream,
            Self::PermanentUpstream { .. } => ErrorKind::PermanentUpstream,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Invocation(failure) => failure.kind,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The upstream HTTP status, when this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TransientUpstream { status, .. } => *status,
            Self::PermanentUpstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error Kind
// ─────────────────────────────────────────────────────────────────────────────

/// Machine-usable failure classification.
///
/// Covers every [`ActionError`] variant plus the two kinds only the resilient
/// invoker produces: [`ErrorKind::Exhausted`] when the retry budget runs out
/// and [`ErrorKind::Canceled`] when the caller aborts a backoff wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Config,
    TransientUpstream,
    PermanentUpstream,
    Serialization,
    Internal,
    /// Retry budget consumed without a success.
    Exhausted,
    /// The invocation was aborted by its cancellation signal.
    Canceled,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Config => "config",
            Self::TransientUpstream => "transient_upstream",
            Self::PermanentUpstream => "permanent_upstream",
            Self::Serialization => "serialization",
            Self::Internal => "internal",
            Self::Exhausted => "exhausted",
            Self::Canceled => "canceled",
        };
        write!(f, "{s}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Invocation Failure
// ─────────────────────────────────────────────────────────────────────────────

/// Terminal failure from the resilient invoker.
///
/// Carries enough structure for an orchestrator to decide whether to retry at
/// a higher level, surface the message to a user, or fall back to another
/// registered action.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message} (after {attempts} attempt(s))")]
pub struct InvocationFailure {
    /// Why the invocation failed.
    pub kind: ErrorKind,
    /// Human-readable description, usually the last underlying error.
    pub message: String,
    /// How many times the work unit was executed.
    pub attempts: u32,
}

impl InvocationFailure {
    /// A non-retryable failure that terminated the invocation immediately.
    pub fn terminal(err: &ActionError, attempts: u32) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            attempts,
        }
    }

    /// The retry budget was consumed; `last` is the final retryable error.
    pub fn exhausted(last: &ActionError, attempts: u32) -> Self {
        Self {
            kind: ErrorKind::Exhausted,
            message: last.to_string(),
            attempts,
        }
    }

    /// The caller canceled the invocation during a backoff wait.
    pub fn canceled(attempts: u32) -> Self {
        Self {
            kind: ErrorKind::Canceled,
            message: "invocation canceled".to_string(),
            attempts,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert!(matches!(
            ActionError::from_status(429, "rate limited"),
            ActionError::TransientUpstream {
                status: Some(429),
                ..
            }
        ));
        assert!(matches!(
            ActionError::from_status(503, "unavailable"),
            ActionError::TransientUpstream {
                status: Some(503),
                ..
            }
        ));
        assert!(matches!(
            ActionError::from_status(401, "unauthorized"),
            ActionError::PermanentUpstream { status: 401, .. }
        ));
        assert!(matches!(
            ActionError::from_status(404, "missing"),
            ActionError::PermanentUpstream { status: 404, .. }
        ));
    }

    #[test]
    fn test_is_retryable() {
        assert!(ActionError::from_status(429, "x").is_retryable());
        assert!(ActionError::from_status(500, "x").is_retryable());
        assert!(ActionError::network("reset").is_retryable());
        assert!(!ActionError::from_status(400, "x").is_retryable());
        assert!(!ActionError::Config("no key".into()).is_retryable());
        assert!(!ActionError::Validation("bad id".into()).is_retryable());
        assert!(!ActionError::Serialization("truncated".into()).is_retryable());
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            ActionError::not_found("openai", "missing").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ActionError::from_status(502, "x").kind(),
            ErrorKind::TransientUpstream
        );
        assert_eq!(
            ActionError::from_status(403, "x").kind(),
            ErrorKind::PermanentUpstream
        );
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(ActionError::from_status(429, "x").status(), Some(429));
        assert_eq!(ActionError::from_status(418, "x").status(), Some(418));
        assert_eq!(ActionError::network("x").status(), None);
        assert_eq!(ActionError::Internal("x".into()).status(), None);
    }

    #[test]
    fn test_not_found_display() {
        let err = ActionError::not_found("demo", "echo");
        assert_eq!(err.to_string(), "no entry 'echo' in collection 'demo'");
    }

    #[test]
    fn test_invocation_failure_constructors() {
        let err = ActionError::from_status(400, "bad body");
        let fail = InvocationFailure::terminal(&err, 1);
        assert_eq!(fail.kind, ErrorKind::PermanentUpstream);
        assert_eq!(fail.attempts, 1);

        let err = ActionError::from_status(503, "unavailable");
        let fail = InvocationFailure::exhausted(&err, 5);
        assert_eq!(fail.kind, ErrorKind::Exhausted);
        assert_eq!(fail.attempts, 5);
        assert!(fail.message.contains("unavailable"));

        let fail = InvocationFailure::canceled(2);
        assert_eq!(fail.kind, ErrorKind::Canceled);
        assert_eq!(fail.attempts, 2);
    }

    #[test]
    fn test_invocation_variant_carries_terminal_kind() {
        let last = ActionError::from_status(503, "unavailable");
        let err: ActionError = InvocationFailure::exhausted(&last, 5).into();
        assert_eq!(err.kind(), ErrorKind::Exhausted);
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn test_error_kind_serde_snake_case() {
        let json = serde_json::to_string(&ErrorKind::TransientUpstream).unwrap();
        assert_eq!(json, "\"transient_upstream\"");
        let kind: ErrorKind = serde_json::from_str("\"exhausted\"").unwrap();
        assert_eq!(kind, ErrorKind::Exhausted);
    }
}
