//! Thread-safe named-callable registry.
//!
//! A host application registers independently-authored callables
//! ("actions") under a `(collection, id)` pair, and an orchestrating engine
//! discovers and invokes them by name rather than by direct reference.
//!
//! # Example
//!
//! ```rust,ignore
//! use cairn_registry::{ActionRegistry, FnAction};
//! use cairn_types::{ParamSpec, ParamType, Signature};
//! use serde_json::json;
//!
//! let registry = ActionRegistry::new();
//! let echo = FnAction::new(
//!     Signature::new().with(ParamSpec::required("input", ParamType::String)),
//!     |args| Ok(args["input"].clone()),
//! );
//! registry.register(echo, "demo", "echo", "Echo the input back")?;
//!
//! let value = registry.invoke("demo", "echo", json!({"input": "hi"})).await?;
//! assert_eq!(value, json!("hi"));
//! ```

pub mod action;
pub mod registry;

pub use action::{Action, FnAction};
pub use registry::{ActionRegistry, RegistryEntry};

// Re-export the shared contract types so downstream crates only need one import.
pub use cairn_types::{ActionError, ErrorKind, ParamSpec, ParamType, Result, Signature};
