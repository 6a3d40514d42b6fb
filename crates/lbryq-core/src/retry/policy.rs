use std::time::Duration;

use crate::config::RetryConfig;

/// Retry-relevant classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect or read timed out.
    Timeout,
    /// Daemon or proxy asked us to slow down (429, 503).
    Throttled,
    /// Network-level failure (refused, reset, DNS).
    Connection,
    /// Retryable server error.
    Http5xx(u16),
    /// Malformed responses, RPC errors, 4xx. Not retried.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Exponential backoff with caps.
///
/// The default makes a single attempt: claim lookups are fire-and-forget and
/// a late redirect is worse than none. Raise `max_attempts` in config to retry.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Out-of-range values (infinite, NaN, too large) fall back to the default.
fn base_delay(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or_else(|e| {
        let fallback = RetryConfig::default().base_delay_secs;
        tracing::warn!(base_delay_secs = secs, error = %e, fallback, "invalid retry base delay");
        Duration::from_secs_f64(fallback)
    })
}

impl RetryPolicy {
    pub fn from_config(cfg: &RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            base_delay: base_delay(cfg.base_delay_secs),
            max_delay: Duration::from_secs(cfg.max_delay_secs),
        }
    }

    /// Decide whether attempt number `attempt` (1-based) should be followed by another.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout
            | ErrorKind::Connection
            | ErrorKind::Throttled
            | ErrorKind::Http5xx(_) => {
                let factor = 1u32 << attempt.saturating_sub(1).min(8);
                let delay = self.base_delay.saturating_mul(factor).min(self.max_delay);
                RetryDecision::RetryAfter(delay)
            }
        }
    }
}
