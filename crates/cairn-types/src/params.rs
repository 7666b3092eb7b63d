//! Parameter descriptors for registered actions.
//!
//! A [`Signature`] is captured once at registration time and describes the
//! parameters an action accepts — names, types, defaults, required flags —
//! so the registry can validate arguments and an orchestrator can enumerate
//! an action's shape without executing it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ActionError;

// ─────────────────────────────────────────────────────────────────────────────
// Parameter Types
// ─────────────────────────────────────────────────────────────────────────────

/// Declared type of a single action parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Integer,
    Float,
    Bool,
    Object,
    List,
    /// A credential. Carried as a string in arguments but flagged so callers
    /// know not to log it.
    Secret,
}

impl ParamType {
    /// Check whether a JSON value is acceptable for this parameter type.
    ///
    /// Integers are accepted where a float is declared; `Secret` accepts any
    /// string.
    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String | Self::Secret => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::List => value.is_array(),
        }
    }

    /// Human-readable name used in validation messages.
    fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "number",
            Self::Bool => "bool",
            Self::Object => "object",
            Self::List => "list",
            Self::Secret => "secret",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parameter Spec
// ─────────────────────────────────────────────────────────────────────────────

/// Descriptor for one parameter of a registered action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name as it appears in the arguments object.
    pub name: String,
    /// Declared type.
    pub param_type: ParamType,
    /// Whether the parameter must be present in every call.
    pub required: bool,
    /// Default filled in when an optional parameter is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Optional human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamSpec {
    /// A required parameter with no default.
    pub fn required(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: true,
            default: None,
            description: None,
        }
    }

    /// An optional parameter with a declared default.
    pub fn optional(name: impl Into<String>, param_type: ParamType, default: Value) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: false,
            default: Some(default),
            description: None,
        }
    }

    /// Attach a description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Signature
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered parameter descriptor for a registered action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    params: Vec<ParamSpec>,
}

impl Signature {
    /// An empty signature (an action taking no parameters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style.
    pub fn with(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// The declared parameters, in declaration order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Validate a call's arguments against this signature.
    ///
    /// Errors with [`ActionError::Validation`] when the arguments are not a
    /// JSON object, a required parameter is missing, a provided value has the
    /// wrong type, or an unknown key is present (so typos surface early).
    pub fn check_args(&self, args: &Value) -> Result<(), ActionError> {
        let map = args
            .as_object()
            .ok_or_else(|| ActionError::Validation("arguments must be a JSON object".into()))?;

        for param in &self.params {
            match map.get(&param.name) {
                Some(value) => {
                    if !param.param_type.accepts(value) {
                        return Err(ActionError::Validation(format!(
                            "parameter '{}' expects {}, got {}",
                            param.name,
                            param.param_type.name(),
                            json_type_name(value),
                        )));
                    }
                }
                None if param.required => {
                    return Err(ActionError::Validation(format!(
                        "missing required parameter '{}'",
                        param.name
                    )));
                }
                None => {}
            }
        }

        for key in map.keys() {
            if self.get(key).is_none() {
                return Err(ActionError::Validation(format!(
                    "unknown parameter '{key}'"
                )));
            }
        }

        Ok(())
    }

    /// Fill absent optional parameters from their declared defaults.
    ///
    /// Arguments that are not an object are left untouched; `check_args`
    /// reports that case.
    pub fn apply_defaults(&self, args: &mut Value) {
        let Some(map) = args.as_object_mut() else {
            return;
        };
        for param in &self.params {
            if let Some(default) = &param.default {
                map.entry(param.name.clone()).or_insert_with(|| default.clone());
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn demo_signature() -> Signature {
        Signature::new()
            .with(ParamSpec::required("pattern", ParamType::String))
            .with(ParamSpec::required("text", ParamType::String))
            .with(ParamSpec::optional(
                "limit",
                ParamType::Integer,
                json!(10),
            ))
    }

    #[test]
    fn test_check_args_accepts_valid() {
        let sig = demo_signature();
        assert!(
            sig.check_args(&json!({"pattern": "a+", "text": "aaa", "limit": 3}))
                .is_ok()
        );
        // Optional parameter may be absent
        assert!(sig.check_args(&json!({"pattern": "a+", "text": "aaa"})).is_ok());
    }

    #[test]
    fn test_check_args_missing_required() {
        let sig = demo_signature();
        let err = sig.check_args(&json!({"pattern": "a+"})).unwrap_err();
        assert!(err.to_string().contains("missing required parameter 'text'"));
    }

    #[test]
    fn test_check_args_wrong_type() {
        let sig = demo_signature();
        let err = sig
            .check_args(&json!({"pattern": "a+", "text": 42}))
            .unwrap_err();
        assert!(err.to_string().contains("'text' expects string"));
    }

    #[test]
    fn test_check_args_unknown_key() {
        let sig = demo_signature();
        let err = sig
            .check_args(&json!({"pattern": "a+", "text": "x", "paterrn": "typo"}))
            .unwrap_err();
        assert!(err.to_string().contains("unknown parameter 'paterrn'"));
    }

    #[test]
    fn test_check_args_rejects_non_object() {
        let sig = demo_signature();
        assert!(sig.check_args(&json!("not an object")).is_err());
        assert!(sig.check_args(&json!(["a", "b"])).is_err());
    }

    #[test]
    fn test_integer_accepted_for_float() {
        let sig = Signature::new().with(ParamSpec::optional(
            "temperature",
            ParamType::Float,
            json!(1.0),
        ));
        assert!(sig.check_args(&json!({"temperature": 1})).is_ok());
        assert!(sig.check_args(&json!({"temperature": 0.5})).is_ok());
        assert!(sig.check_args(&json!({"temperature": "hot"})).is_err());
    }

    #[test]
    fn test_apply_defaults() {
        let sig = demo_signature();
        let mut args = json!({"pattern": "a+", "text": "aaa"});
        sig.apply_defaults(&mut args);
        assert_eq!(args["limit"], json!(10));

        // Explicit value wins over the default
        let mut args = json!({"pattern": "a+", "text": "aaa", "limit": 1});
        sig.apply_defaults(&mut args);
        assert_eq!(args["limit"], json!(1));
    }

    #[test]
    fn test_signature_serializes_for_introspection() {
        let sig = demo_signature();
        let value = serde_json::to_value(&sig).unwrap();
        let params = value["params"].as_array().unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params[0]["name"], "pattern");
        assert_eq!(params[0]["param_type"], "string");
        assert_eq!(params[2]["default"], json!(10));
    }
}
