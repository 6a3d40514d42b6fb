//! Retry and backoff policy for daemon calls.
//!
//! Classifies lookup failures (timeouts, throttling, connection failures)
//! and computes exponential backoff so every JSON-RPC call shares one policy.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
