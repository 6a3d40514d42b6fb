//! Claim-id lookup and one-time redirect.
//!
//! When a query has the claim-id shape, the claim is looked up in the
//! background and, on a match, the router is sent to the claim's web URL.
//! Each query change takes a new token; a lookup whose token is no longer
//! current is discarded instead of redirecting the user away from whatever
//! they navigated to meanwhile.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::claim_search::{ClaimSearch, LookupFailure};
use crate::classify::QueryAnalysis;
use crate::uri::format_lbry_url_for_web;

/// Router side of a redirect. Fire-and-forget.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

impl Navigator for UnboundedSender<String> {
    fn navigate(&self, url: &str) {
        if self.send(url.to_string()).is_err() {
            tracing::debug!(url, "navigation receiver dropped");
        }
    }
}

/// Per-session request tokens: one generation per distinct query.
#[derive(Debug, Default)]
pub struct LookupTokens {
    generation: AtomicU64,
    current_query: Mutex<Option<String>>,
}

impl LookupTokens {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Record `query` as current. Returns a ticket only if it differs from the
    /// previous query, so re-rendering the same query never repeats a lookup.
    pub fn begin(self: &Arc<Self>, query: &str) -> Option<LookupTicket> {
        let mut current = self
            .current_query
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if current.as_deref() == Some(query) {
            return None;
        }
        *current = Some(query.to_string());
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Some(LookupTicket {
            generation,
            tokens: Arc::clone(self),
        })
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// Token for one query; stale once another query has begun.
#[derive(Debug, Clone)]
pub struct LookupTicket {
    generation: u64,
    tokens: Arc<LookupTokens>,
}

impl LookupTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.tokens.current_generation() == self.generation
    }
}

/// How a background lookup ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Navigated to this web URL.
    Redirected(String),
    /// No claim, or the first claim has no canonical URL.
    NoMatch,
    /// Transport or daemon error; treated as no match.
    LookupFailed,
    /// The query changed before the lookup finished.
    Stale,
}

impl fmt::Display for RedirectOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectOutcome::Redirected(url) => write!(f, "redirected to {url}"),
            RedirectOutcome::NoMatch => write!(f, "no matching claim"),
            RedirectOutcome::LookupFailed => write!(f, "lookup failed"),
            RedirectOutcome::Stale => write!(f, "discarded (query changed)"),
        }
    }
}

/// Issues claim-id lookups and performs the resulting redirect.
pub struct ClaimRedirector {
    search: Arc<dyn ClaimSearch>,
    navigator: Arc<dyn Navigator>,
    tokens: Arc<LookupTokens>,
    cancel_stale: bool,
}

impl ClaimRedirector {
    pub fn new(search: Arc<dyn ClaimSearch>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            search,
            navigator,
            tokens: LookupTokens::new(),
            cancel_stale: true,
        }
    }

    /// `false` lets a stale lookup still redirect, as older clients did.
    pub fn cancel_stale(mut self, cancel_stale: bool) -> Self {
        self.cancel_stale = cancel_stale;
        self
    }

    pub fn tokens(&self) -> &Arc<LookupTokens> {
        &self.tokens
    }

    /// Note a (possibly unchanged) query and start a lookup if it is new and
    /// carries a claim id. Must run inside a Tokio runtime; otherwise no lookup
    /// is issued and the query is not recorded, so a later call can still issue it.
    pub fn observe(&self, analysis: &QueryAnalysis) -> Option<JoinHandle<RedirectOutcome>> {
        let runtime = tokio::runtime::Handle::try_current();
        if let (Some(claim_id), Err(e)) = (&analysis.claim_id, &runtime) {
            tracing::warn!(claim_id = %claim_id, error = %e, "no runtime; skipping claim lookup");
            return None;
        }
        let ticket = self.tokens.begin(&analysis.raw)?;
        let claim_id = analysis.claim_id.clone()?;
        let handle = runtime.ok()?;

        let search = Arc::clone(&self.search);
        let navigator = Arc::clone(&self.navigator);
        let cancel_stale = self.cancel_stale;

        Some(handle.spawn(async move {
            let lookup = tokio::task::spawn_blocking({
                let claim_id = claim_id.clone();
                move || search.claim_search(&claim_id)
            })
            .await
            .map_err(|e| LookupFailure::Task(e.to_string()))
            .and_then(|r| r);

            let result = match lookup {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!(claim_id = %claim_id, error = %e, "claim lookup failed");
                    return RedirectOutcome::LookupFailed;
                }
            };
            let Some(canonical) = result.first().and_then(|c| c.canonical_url.clone()) else {
                tracing::debug!(claim_id = %claim_id, "no claim for id");
                return RedirectOutcome::NoMatch;
            };
            if cancel_stale && !ticket.is_current() {
                tracing::debug!(claim_id = %claim_id, generation = ticket.generation(), "dropping stale redirect");
                return RedirectOutcome::Stale;
            }

            let url = format_lbry_url_for_web(&canonical);
            tracing::info!(claim_id = %claim_id, %url, "redirecting to claim");
            navigator.navigate(&url);
            RedirectOutcome::Redirected(url)
        }))
    }
}
