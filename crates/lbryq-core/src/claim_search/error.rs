//! Claim lookup failure taxonomy.

use thiserror::Error;

/// Why a claim lookup produced no result. Never shown to the user; the
/// redirect flow downgrades every variant to "no match".
#[derive(Debug, Error)]
pub enum LookupFailure {
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
    #[error("daemon returned HTTP {0}")]
    Http(u32),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("daemon error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("lookup task failed: {0}")]
    Task(String),
}
