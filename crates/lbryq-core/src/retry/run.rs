//! Blocking retry loop.

use super::classify::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::claim_search::LookupFailure;

/// Runs `f` until it succeeds or the policy says stop. Sleeps the calling
/// thread between attempts; run on a blocking task.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, LookupFailure>
where
    F: FnMut() -> Result<T, LookupFailure>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(attempt, delay_ms = d.as_millis() as u64, error = %e, "retrying lookup");
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn retries_retryable_until_success() {
        let mut calls = 0;
        let out = run_with_retry(&fast(3), || {
            calls += 1;
            if calls < 3 {
                Err(LookupFailure::Http(503))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(out.unwrap(), 3);
    }

    #[test]
    fn stops_on_final_error() {
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&fast(5), || {
            calls += 1;
            Err(LookupFailure::Http(404))
        });
        assert!(matches!(out, Err(LookupFailure::Http(404))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&fast(2), || {
            calls += 1;
            Err(LookupFailure::Http(500))
        });
        assert!(out.is_err());
        assert_eq!(calls, 2);
    }
}
