//! Generic HTTP call action.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, header};
use serde_json::{Value, json};

use cairn_registry::Action;
use cairn_types::{ActionError, ParamSpec, ParamType, Signature};

use crate::net_err;

/// A generic "call an API" action.
///
/// Returns `{"body": text, "status": code}`. A non-2xx status is still a
/// successful action result — the caller branches on `status` — so this
/// action is not routed through the resilient invoker; only transport-level
/// failures (connect, timeout) surface as errors.
#[derive(Debug, Clone, Default)]
pub struct CallApi {
    client: Client,
}

impl CallApi {
    /// Create the action with a fresh HTTP client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Action for CallApi {
    fn signature(&self) -> Signature {
        Signature::new()
            .with(ParamSpec::required("method", ParamType::String).describe("HTTP method"))
            .with(ParamSpec::required("url", ParamType::String).describe("Request URL"))
            .with(
                ParamSpec::optional("params", ParamType::Object, json!({}))
                    .describe("Query parameters"),
            )
            .with(
                ParamSpec::optional("data", ParamType::Object, json!({}))
                    .describe("Form-encoded body; takes precedence over json"),
            )
            .with(ParamSpec::optional("json", ParamType::Object, json!({})).describe("JSON body"))
            .with(
                ParamSpec::optional("headers", ParamType::Object, json!({}))
                    .describe("Request headers"),
            )
            .with(
                ParamSpec::optional("cookies", ParamType::Object, json!({}))
                    .describe("Cookies sent with the request"),
            )
            .with(
                ParamSpec::optional("auth", ParamType::Object, json!({}))
                    .describe("Basic auth: {username, password}"),
            )
            .with(
                ParamSpec::optional("timeout", ParamType::Float, json!(0.0))
                    .describe("Timeout in seconds; 0 means no timeout"),
            )
    }

    async fn call(&self, mut args: Value) -> Result<Value, ActionError> {
        let signature = self.signature();
        signature.check_args(&args)?;
        signature.apply_defaults(&mut args);

        let method = args["method"].as_str().unwrap_or_default();
        let method = Method::from_str(&method.to_uppercase())
            .map_err(|_| ActionError::Validation(format!("invalid HTTP method '{method}'")))?;
        let url = args["url"].as_str().unwrap_or_default();

        let mut request = self.client.request(method, url);

        if let Some(params) = args["params"].as_object() {
            let pairs: Vec<(String, String)> = params
                .iter()
                .map(|(k, v)| (k.clone(), stringify(v)))
                .collect();
            if !pairs.is_empty() {
                request = request.query(&pairs);
            }
        }

        if let Some(headers) = args["headers"].as_object() {
            for (name, value) in headers {
                let name = header::HeaderName::from_str(name).map_err(|_| {
                    ActionError::Validation(format!("invalid header name '{name}'"))
                })?;
                let value = header::HeaderValue::from_str(&stringify(value)).map_err(|_| {
                    ActionError::Validation(format!("invalid value for header '{name}'"))
                })?;
                request = request.header(name, value);
            }
        }

        if let Some(cookies) = args["cookies"].as_object().filter(|c| !c.is_empty()) {
            let jar = cookies
                .iter()
                .map(|(k, v)| format!("{k}={}", stringify(v)))
                .collect::<Vec<_>>()
                .join("; ");
            let value = header::HeaderValue::from_str(&jar)
                .map_err(|_| ActionError::Validation("invalid cookie value".to_string()))?;
            request = request.header(header::COOKIE, value);
        }

        if let Some(auth) = args["auth"].as_object().filter(|a| !a.is_empty()) {
            let username = auth.get("username").and_then(Value::as_str).ok_or_else(|| {
                ActionError::Validation("auth requires a 'username' string".to_string())
            })?;
            let password = auth.get("password").and_then(Value::as_str);
            request = request.basic_auth(username, password);
        }

        let timeout = args["timeout"].as_f64().unwrap_or(0.0);
        if timeout > 0.0 {
            let timeout = Duration::try_from_secs_f64(timeout)
                .map_err(|_| ActionError::Validation(format!("invalid timeout {timeout}")))?;
            request = request.timeout(timeout);
        }

        if args["data"].as_object().is_some_and(|body| !body.is_empty()) {
            let pairs: Vec<(String, String)> = args["data"]
                .as_object()
                .into_iter()
                .flatten()
                .map(|(k, v)| (k.clone(), stringify(v)))
                .collect();
            request = request.form(&pairs);
        } else if args["json"].as_object().is_some_and(|body| !body.is_empty()) {
            request = request.json(&args["json"]);
        }

        let response = request.send().await.map_err(net_err)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(net_err)?;

        tracing::debug!(status, bytes = body.len(), "api call completed");
        Ok(json!({ "body": body, "status": status }))
    }
}

/// Render a JSON value as a query/header string without quoting strings.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_method_is_validation_error() {
        let action = CallApi::new();
        let err = action
            .call(json!({"method": "not a method", "url": "http://localhost/"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
    }

    #[tokio::test]
    async fn test_invalid_header_is_validation_error() {
        let action = CallApi::new();
        let err = action
            .call(json!({
                "method": "get",
                "url": "http://localhost/",
                "headers": {"bad header name": "x"},
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
    }

    #[tokio::test]
    async fn test_oversized_timeout_is_validation_error() {
        let action = CallApi::new();
        let err = action
            .call(json!({
                "method": "get",
                "url": "http://localhost/",
                "timeout": 1e300,
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
    }

    #[tokio::test]
    async fn test_auth_without_username_is_validation_error() {
        let action = CallApi::new();
        let err = action
            .call(json!({
                "method": "get",
                "url": "http://localhost/",
                "auth": {"password": "hunter2"},
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
    }

    #[tokio::test]
    async fn test_invalid_cookie_is_validation_error() {
        let action = CallApi::new();
        let err = action
            .call(json!({
                "method": "get",
                "url": "http://localhost/",
                "cookies": {"session": "bad\nvalue"},
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_url_is_validation_error() {
        let action = CallApi::new();
        let err = action.call(json!({"method": "get"})).await.unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
    }

    #[test]
    fn test_stringify_strips_quotes() {
        assert_eq!(stringify(&json!("plain")), "plain");
        assert_eq!(stringify(&json!(7)), "7");
        assert_eq!(stringify(&json!(true)), "true");
    }

    #[test]
    fn test_signature_shape() {
        let sig = CallApi::new().signature();
        assert!(sig.get("method").unwrap().required);
        assert!(sig.get("url").unwrap().required);
        for name in ["params", "data", "json", "headers", "cookies", "auth", "timeout"] {
            assert!(!sig.get(name).unwrap().required, "{name} should be optional");
        }
    }
}
