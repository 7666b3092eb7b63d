//! Resilient invocation: exponential-backoff retry around fallible work.
//!
//! The invoker executes a zero-argument unit of work, classifies each
//! failure through [`ActionError::is_retryable`], and retries transient
//! failures with exponential backoff until success, a non-retryable failure,
//! or the attempt budget runs out. The outcome is always a typed value —
//! either the successful result or an [`InvocationFailure`] — never a panic
//! crossing into orchestrator code.
//!
//! Network-backed actions route their HTTP work through this wrapper; purely
//! local actions bypass it.
//!
//! [`ActionError::is_retryable`]: cairn_types::ActionError::is_retryable
//! [`InvocationFailure`]: cairn_types::InvocationFailure

pub mod invoke;
pub mod policy;

pub use invoke::{Retrier, invoke_cancellable, invoke_with_backoff};
pub use policy::{BackoffPolicy, Jitter};
