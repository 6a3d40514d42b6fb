//! Claim lookup against the lbrynet daemon.
//!
//! Uses the curl crate (libcurl) to POST JSON-RPC `claim_search` calls.
//! Calls block the current thread; run them on `spawn_blocking` from async code.

mod error;
mod rpc;

pub use error::LookupFailure;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::LbryqConfig;
use crate::retry::{run_with_retry, RetryPolicy};

/// Parameters of a `claim_search` call. Only the claim id is used here.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimSearchParams {
    pub claim_id: String,
}

impl ClaimSearchParams {
    pub fn for_claim_id(claim_id: &str) -> Self {
        Self {
            claim_id: claim_id.to_string(),
        }
    }
}

/// One claim returned by `claim_search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claim {
    #[serde(default)]
    pub claim_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub permanent_url: Option<String>,
    #[serde(default)]
    pub short_url: Option<String>,
    #[serde(default)]
    pub value_type: Option<String>,
}

/// `claim_search` result page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaimSearchResult {
    #[serde(default)]
    pub items: Vec<Claim>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl ClaimSearchResult {
    pub fn first(&self) -> Option<&Claim> {
        self.items.first()
    }
}

/// Source of claim lookups. Blocking.
pub trait ClaimSearch: Send + Sync {
    fn claim_search(&self, claim_id: &str) -> Result<ClaimSearchResult, LookupFailure>;
}

/// JSON-RPC client for a running lbrynet daemon.
#[derive(Debug)]
pub struct DaemonClient {
    url: String,
    connect_timeout: Duration,
    timeout: Duration,
    policy: RetryPolicy,
    next_id: AtomicU64,
}

impl DaemonClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::from_config(&LbryqConfig {
            daemon_url: url.into(),
            ..LbryqConfig::default()
        })
    }

    pub fn from_config(cfg: &LbryqConfig) -> Self {
        Self {
            url: cfg.daemon_url.clone(),
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.lookup_timeout_secs),
            policy: RetryPolicy::from_config(&cfg.retry_config()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn post(&self, body: &[u8]) -> Result<Vec<u8>, LookupFailure> {
        let mut response = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&self.url)?;
        easy.post(true)?;
        easy.post_fields_copy(body)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        let mut headers = curl::easy::List::new();
        headers.append("Content-Type: application/json")?;
        easy.http_headers(headers)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                response.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(LookupFailure::Http(code));
        }
        Ok(response)
    }

    /// Issue one JSON-RPC call, retrying transport failures per policy.
    pub fn call<P, T>(&self, method: &str, params: P) -> Result<T, LookupFailure>
    where
        P: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_vec(&rpc::RpcRequest::new(method, params, id))?;
        let raw = run_with_retry(&self.policy, || self.post(&body))?;
        rpc::parse_response(&raw)
    }
}

impl ClaimSearch for DaemonClient {
    fn claim_search(&self, claim_id: &str) -> Result<ClaimSearchResult, LookupFailure> {
        tracing::debug!(claim_id, daemon = %self.url, "claim_search");
        self.call("claim_search", ClaimSearchParams::for_claim_id(claim_id))
    }
}
