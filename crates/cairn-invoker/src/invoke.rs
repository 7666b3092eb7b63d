//! The retry loop itself.

use std::future::Future;
use tokio_util::sync::CancellationToken;

use cairn_types::{ActionError, InvocationFailure};

use crate::policy::BackoffPolicy;

/// Execute a unit of work with exponential-backoff retry.
///
/// The work is run at most `policy.max_attempts` times. A success returns
/// immediately. A non-retryable failure terminates the loop at once with the
/// failure's own kind; a retryable failure sleeps for the current backoff
/// delay and tries again until the budget is exhausted, which yields
/// `ErrorKind::Exhausted` carrying the last error's message.
///
/// No shared state outlives the call; the only suspension points are the
/// work's own I/O and the backoff sleep.
pub async fn invoke_with_backoff<T, F, Fut>(
    policy: &BackoffPolicy,
    work: F,
) -> Result<T, InvocationFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ActionError>>,
{
    run(policy, None, work).await
}

/// Like [`invoke_with_backoff`], but the backoff sleep races a cancellation
/// token.
///
/// Cancellation before an attempt or during a sleep returns
/// `ErrorKind::Canceled` with the number of executions performed so far; the
/// invoker holds no state that could be left inconsistent.
pub async fn invoke_cancellable<T, F, Fut>(
    policy: &BackoffPolicy,
    token: &CancellationToken,
    work: F,
) -> Result<T, InvocationFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ActionError>>,
{
    run(policy, Some(token), work).await
}

async fn run<T, F, Fut>(
    policy: &BackoffPolicy,
    token: Option<&CancellationToken>,
    mut work: F,
) -> Result<T, InvocationFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ActionError>>,
{
    let mut attempt: u32 = 1;
    loop {
        if let Some(token) = token {
            if token.is_cancelled() {
                return Err(InvocationFailure::canceled(attempt - 1));
            }
        }

        match work().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() => {
                return Err(InvocationFailure::terminal(&err, attempt));
            }
            Err(err) => {
                if attempt >= policy.max_attempts {
                    return Err(InvocationFailure::exhausted(&err, attempt));
                }
                let delay = policy.jittered(policy.delay_for(attempt));
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "attempt failed, backing off"
                );
                match token {
                    Some(token) => {
                        tokio::select! {
                            _ = token.cancelled() => {
                                return Err(InvocationFailure::canceled(attempt));
                            }
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                    None => tokio::time::sleep(delay).await,
                }
                attempt += 1;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Retrier
// ─────────────────────────────────────────────────────────────────────────────

/// A backoff policy bundled for reuse across call sites.
#[derive(Debug, Clone, Default)]
pub struct Retrier {
    policy: BackoffPolicy,
}

impl Retrier {
    /// Bundle a policy.
    pub fn new(policy: BackoffPolicy) -> Self {
        Self { policy }
    }

    /// The wrapped policy.
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Run a unit of work under this retrier's policy.
    pub async fn run<T, F, Fut>(&self, work: F) -> Result<T, InvocationFailure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ActionError>>,
    {
        invoke_with_backoff(&self.policy, work).await
    }

    /// Run a unit of work that can be canceled during backoff.
    pub async fn run_cancellable<T, F, Fut>(
        &self,
        token: &CancellationToken,
        work: F,
    ) -> Result<T, InvocationFailure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ActionError>>,
    {
        invoke_cancellable(&self.policy, token, work).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
