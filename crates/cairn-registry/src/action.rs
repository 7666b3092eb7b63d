//! The calling convention every registered callable implements.

use async_trait::async_trait;
use serde_json::Value;

use cairn_types::{ActionError, Signature};

/// The contract every registered callable honors.
///
/// An action declares its parameters up front via [`Action::signature`] so
/// the registry can derive an introspectable descriptor without executing it,
/// and returns every expected failure mode as an [`ActionError`] value — a
/// bad upstream status or a malformed pattern never crosses the registry
/// boundary as a panic. Beyond that contract the body is opaque: an action is
/// free to perform arbitrary I/O.
#[async_trait]
pub trait Action: Send + Sync {
    /// The parameters this action accepts.
    fn signature(&self) -> Signature;

    /// Execute with the given arguments.
    async fn call(&self, args: Value) -> Result<Value, ActionError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// FnAction
// ─────────────────────────────────────────────────────────────────────────────

/// Adapter that turns a plain closure into an [`Action`].
///
/// Intended for local, non-blocking callables (text transforms, lookups) that
/// have no need for an async body of their own.
pub struct FnAction {
    signature: Signature,
    f: Box<dyn Fn(Value) -> Result<Value, ActionError> + Send + Sync>,
}

impl FnAction {
    /// Wrap a closure together with its declared signature.
    pub fn new<F>(signature: Signature, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ActionError> + Send + Sync + 'static,
    {
        Self {
            signature,
            f: Box::new(f),
        }
    }
}

#[async_trait]
impl Action for FnAction {
    fn signature(&self) -> Signature {
        self.signature.clone()
    }

    async fn call(&self, args: Value) -> Result<Value, ActionError> {
        (self.f)(args)
    }
}

impl std::fmt::Debug for FnAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnAction")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
