//! Backoff policy: attempt budget, delay growth, cap, jitter.

use std::time::Duration;

/// Jitter applied to each backoff delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Jitter {
    /// Use the computed delay as-is.
    #[default]
    None,
    /// Sample uniformly from `[delay/2, delay]` to decorrelate callers
    /// hammering the same upstream.
    Full,
}

/// Configuration for the retry loop.
///
/// All fields are overridable per call site via the builder methods.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Total number of executions allowed, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub factor: f64,
    /// Jitter strategy.
    pub jitter: Jitter,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            factor: 2.0,
            jitter: Jitter::None,
        }
    }
}

impl BackoffPolicy {
    /// The default policy: 5 attempts, 1s base, 30s cap, doubling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attempt budget. Clamped to at least 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the delay before the first retry.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the upper bound on any single delay.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set the growth factor applied after each retry. Clamped to at least
    /// 1.0 so the delay sequence never shrinks.
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = if factor.is_finite() { factor.max(1.0) } else { 1.0 };
        self
    }

    /// Set the jitter strategy.
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// The undisturbed delay after the given 1-based attempt:
    /// `base_delay * factor^(attempt-1)`, capped at `max_delay`.
    ///
    /// For any factor > 1 the sequence is non-decreasing and bounded by the
    /// cap.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(63) as i32;
        // Floored at zero: the fields are public, so a factor below the
        // builder's clamp can still produce a negative (or NaN) product.
        let secs = (self.base_delay.as_secs_f64() * self.factor.powi(exp)).max(0.0);
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(secs).min(self.max_delay)
    }

    /// Apply this policy's jitter to a computed delay.
    pub fn jittered(&self, delay: Duration) -> Duration {
        match self.jitter {
            Jitter::None => delay,
            Jitter::Full => {
                use rand::Rng;
                let scale: f64 = rand::rng().random_range(0.5..=1.0);
                delay.mul_f64(scale)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
