//! Shared types for the Cairn action registry.
//!
//! This crate holds the pieces every other crate agrees on:
//!
//! - [`ActionError`] — the uniform error contract every registered action
//!   returns instead of panicking across the registry boundary.
//! - [`InvocationFailure`] — the terminal outcome of a retried invocation,
//!   carrying the failure kind and how many attempts were made.
//! - [`Signature`] / [`ParamSpec`] — parameter descriptors captured at
//!   registration time so an orchestrator can introspect an action's shape
//!   without executing it.

pub mod error;
pub mod params;

pub use error::{ActionError, ErrorKind, InvocationFailure, Result};
pub use params::{ParamSpec, ParamType, Signature};
