//! OpenAI model invokers.
//!
//! Both actions take their arguments as the request body fields documented by
//! the upstream API; absent optional parameters are filled from the declared
//! defaults, so after validation the arguments object is the request body.
//! The HTTP call is routed through the resilient invoker: 429 and 5xx are
//! retried with exponential backoff, other 4xx terminate immediately.

use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::{Value, json};

use cairn_config::Secret;
use cairn_invoker::Retrier;
use cairn_registry::Action;
use cairn_types::{ActionError, ParamSpec, ParamType, Signature};

use crate::net_err;

/// Default OpenAI API base URL.
const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";

// ─────────────────────────────────────────────────────────────────────────────
// Shared plumbing
// ─────────────────────────────────────────────────────────────────────────────

/// One authenticated POST with status classification. Retried by callers.
async fn post_json(
    client: &Client,
    url: &str,
    bearer: &str,
    body: &Value,
) -> Result<Value, ActionError> {
    let response = client
        .post(url)
        .header(header::AUTHORIZATION, bearer)
        .json(body)
        .send()
        .await
        .map_err(net_err)?;

    let status = response.status().as_u16();
    let text = response.text().await.map_err(net_err)?;
    if !(200..300).contains(&status) {
        return Err(ActionError::from_status(status, text));
    }
    Ok(serde_json::from_str(&text)?)
}

/// Validate, fill defaults, build the bearer header, and run the retried call.
async fn invoke_model(
    signature: &Signature,
    api_key: &Secret,
    retrier: &Retrier,
    client: &Client,
    url: &str,
    mut args: Value,
) -> Result<Value, ActionError> {
    signature.check_args(&args)?;
    signature.apply_defaults(&mut args);

    // The credential leaves its wrapper only here.
    let bearer = format!(
        "Bearer {}",
        api_key
            .reveal()
            .map_err(|e| ActionError::Config(e.to_string()))?
    );

    tracing::debug!(url, model = %args["model"], "sending model request");

    let value = retrier
        .run(|| post_json(client, url, &bearer, &args))
        .await?;
    Ok(value)
}

// ─────────────────────────────────────────────────────────────────────────────
// Completion
// ─────────────────────────────────────────────────────────────────────────────

/// The `/completions` model invoker.
pub struct OpenAiCompletion {
    api_key: Secret,
    base_url: String,
    client: Client,
    retrier: Retrier,
}

impl OpenAiCompletion {
    /// Create an invoker against the public OpenAI API.
    pub fn new(api_key: Secret) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_OPENAI_BASE.to_string(),
            client: Client::new(),
            retrier: Retrier::default(),
        }
    }

    /// Point at a different base URL (compatible providers, test stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the retry policy.
    pub fn with_retrier(mut self, retrier: Retrier) -> Self {
        self.retrier = retrier;
        self
    }

    fn url(&self) -> String {
        format!("{}/completions", self.base_url)
    }
}

#[async_trait]
impl Action for OpenAiCompletion {
    fn signature(&self) -> Signature {
        Signature::new()
            .with(ParamSpec::required("model", ParamType::String).describe("ID of the model to use"))
            .with(
                ParamSpec::required("prompt", ParamType::String)
                    .describe("The prompt to generate completions for"),
            )
            .with(ParamSpec::optional("max_tokens", ParamType::Integer, json!(16)))
            .with(ParamSpec::optional("temperature", ParamType::Float, json!(1.0)))
            .with(ParamSpec::optional("top_p", ParamType::Float, json!(1.0)))
            .with(ParamSpec::optional("n", ParamType::Integer, json!(1)))
            .with(ParamSpec::optional("logprobs", ParamType::Integer, json!(0)))
            .with(ParamSpec::optional("echo", ParamType::Bool, json!(false)))
            .with(ParamSpec::optional("stop", ParamType::String, json!("")))
            .with(ParamSpec::optional("presence_penalty", ParamType::Float, json!(0.0)))
            .with(ParamSpec::optional("frequency_penalty", ParamType::Float, json!(0.0)))
            .with(ParamSpec::optional("best_of", ParamType::Integer, json!(1)))
            .with(ParamSpec::optional("logit_bias", ParamType::Object, json!({})))
            .with(ParamSpec::optional("user", ParamType::String, json!("")))
    }

    async fn call(&self, args: Value) -> Result<Value, ActionError> {
        invoke_model(
            &self.signature(),
            &self.api_key,
            &self.retrier,
            &self.client,
            &self.url(),
            args,
        )
        .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

/// The `/chat/completions` model invoker.
pub struct OpenAiChat {
    api_key: Secret,
    base_url: String,
    client: Client,
    retrier: Retrier,
}

impl OpenAiChat {
    /// Create an invoker against the public OpenAI API.
    pub fn new(api_key: Secret) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_OPENAI_BASE.to_string(),
            client: Client::new(),
            retrier: Retrier::default(),
        }
    }

    /// Point at a different base URL (compatible providers, test stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the retry policy.
    pub fn with_retrier(mut self, retrier: Retrier) -> Self {
        self.retrier = retrier;
        self
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl Action for OpenAiChat {
    fn signature(&self) -> Signature {
        Signature::new()
            .with(ParamSpec::required("model", ParamType::String).describe("ID of the model to use"))
            .with(
                ParamSpec::required("messages", ParamType::List)
                    .describe("Messages describing the conversation so far"),
            )
            .with(ParamSpec::optional("temperature", ParamType::Float, json!(1.0)))
            .with(ParamSpec::optional("top_p", ParamType::Float, json!(1.0)))
            .with(ParamSpec::optional("n", ParamType::Integer, json!(1)))
            .with(ParamSpec::optional("stop", ParamType::String, json!("")))
            .with(ParamSpec::optional("max_tokens", ParamType::Integer, json!(1024)))
            .with(ParamSpec::optional("presence_penalty", ParamType::Float, json!(0.0)))
            .with(ParamSpec::optional("frequency_penalty", ParamType::Float, json!(0.0)))
            .with(ParamSpec::optional("logit_bias", ParamType::Object, json!({})))
            .with(ParamSpec::optional("user", ParamType::String, json!("")))
    }

    async fn call(&self, args: Value) -> Result<Value, ActionError> {
        invoke_model(
            &self.signature(),
            &self.api_key,
            &self.retrier,
            &self.client,
            &self.url(),
            args,
        )
        .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
