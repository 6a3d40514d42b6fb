//! Search page model.
//!
//! Turns the location's `?q=` into everything the results page needs: the
//! search request to issue, the "top claim" header when the query names
//! content, and the surrounding strings. `SearchSession` additionally feeds
//! each location change to the claim-id redirector.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::classify::{analyze, QueryAnalysis};
use crate::config::LbryqConfig;
use crate::i18n::Translator;
use crate::redirect::{ClaimRedirector, RedirectOutcome};
use crate::uri::{lbry_url, top_claims_path};

/// Options sent with a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub is_background_search: bool,
    /// `Some(false)` when mature content is hidden; omitted otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<bool>,
}

impl SearchOptions {
    pub fn new(show_nsfw: bool) -> Self {
        Self {
            is_background_search: false,
            nsfw: if show_nsfw { None } else { Some(false) },
        }
    }
}

/// Search to run for the raw query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub options: SearchOptions,
}

/// Header shown above results when the query is itself a valid locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHeader {
    /// `lbry://<path>` of the named claim.
    pub uri: String,
    pub top_claims_link: String,
    pub top_claims_label: String,
    pub winning_amount_label: String,
}

/// Everything rendered below the search bar for a non-empty query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsSection {
    /// Locator path, or the normalized term for free text.
    pub modified_query: String,
    pub header: Option<SearchHeader>,
    pub show_search_options: bool,
    pub inject_ad_slot: bool,
    pub feedback_question: String,
    pub feedback_yes: String,
    pub feedback_no: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPage {
    pub analysis: QueryAnalysis,
    /// `None` for an empty query.
    pub search_request: Option<SearchRequest>,
    pub results: Option<ResultsSection>,
}

/// Display settings for the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSettings {
    pub show_nsfw: bool,
    pub simple_site: bool,
    pub show_ads: bool,
    pub is_authenticated: bool,
}

impl PageSettings {
    pub fn from_config(cfg: &LbryqConfig, is_authenticated: bool) -> Self {
        Self {
            show_nsfw: cfg.show_nsfw,
            simple_site: cfg.simple_site,
            show_ads: cfg.show_ads,
            is_authenticated,
        }
    }
}

/// Value of `q` in a location query string (`?q=hello+world` → `hello world`).
pub fn query_from_location(search: &str) -> String {
    let pairs = search.strip_prefix('?').unwrap_or(search);
    url::form_urlencoded::parse(pairs.as_bytes())
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

/// Build the page model for a raw query.
pub fn build_page(query: &str, settings: &PageSettings, t: &dyn Translator) -> SearchPage {
    let analysis = analyze(query);
    if query.is_empty() {
        return SearchPage {
            analysis,
            search_request: None,
            results: None,
        };
    }

    let modified_query = analysis.classification.term().to_string();
    let header = analysis.is_locator().then(|| {
        let uri = lbry_url(&modified_query);
        SearchHeader {
            top_claims_label: t.translate_with(
                "View top claims for %normalized_uri%",
                &[("normalized_uri", uri.as_str())],
            ),
            top_claims_link: top_claims_path(&modified_query),
            winning_amount_label: t.translate("Current winning amount"),
            uri,
        }
    });

    SearchPage {
        search_request: Some(SearchRequest {
            query: query.to_string(),
            options: SearchOptions::new(settings.show_nsfw),
        }),
        results: Some(ResultsSection {
            modified_query,
            header,
            show_search_options: !settings.simple_site,
            inject_ad_slot: settings.show_ads && !settings.is_authenticated,
            feedback_question: t.translate("Find what you were looking for?"),
            feedback_yes: t.translate("Yes"),
            feedback_no: t.translate("No"),
            attribution: t.translate("These search results are provided by LBRY, Inc."),
        }),
        analysis,
    }
}

/// Result of one location change.
pub struct SessionUpdate {
    pub page: SearchPage,
    /// Background claim-id lookup, if one was started.
    pub lookup: Option<JoinHandle<RedirectOutcome>>,
}

/// Search page state across location changes.
pub struct SearchSession {
    settings: PageSettings,
    translator: Arc<dyn Translator>,
    redirector: Option<ClaimRedirector>,
}

impl SearchSession {
    pub fn new(settings: PageSettings, translator: Arc<dyn Translator>) -> Self {
        Self {
            settings,
            translator,
            redirector: None,
        }
    }

    pub fn with_redirector(mut self, redirector: ClaimRedirector) -> Self {
        self.redirector = Some(redirector);
        self
    }

    /// Handle a new location query string (e.g. `?q=foo`).
    pub fn navigate(&self, location_search: &str) -> SessionUpdate {
        self.update(&query_from_location(location_search))
    }

    /// Handle a raw query directly.
    pub fn update(&self, query: &str) -> SessionUpdate {
        let page = build_page(query, &self.settings, self.translator.as_ref());
        tracing::debug!(query, classification = ?page.analysis.classification, "search page built");
        let lookup = self
            .redirector
            .as_ref()
            .and_then(|r| r.observe(&page.analysis));
        SessionUpdate { page, lookup }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classification;
    use crate::i18n::Passthrough;

    fn page(query: &str) -> SearchPage {
        build_page(query, &PageSettings::default(), &Passthrough)
    }

    #[test]
    fn location_query_decoding() {
        assert_eq!(query_from_location("?q=hello+world"), "hello world");
        assert_eq!(query_from_location("q=a%23b&other=1"), "a#b");
        assert_eq!(query_from_location("?other=1"), "");
        assert_eq!(query_from_location(""), "");
    }

    #[test]
    fn empty_query_is_inert() {
        let p = page("");
        assert!(p.search_request.is_none());
        assert!(p.results.is_none());
        assert_eq!(p.analysis.classification, Classification::Inert);
    }

    #[test]
    fn locator_query_gets_header() {
        let p = page("hello world");
        let results = p.results.unwrap();
        assert_eq!(results.modified_query, "hello-world");
        let header = results.header.unwrap();
        assert_eq!(header.uri, "lbry://hello-world");
        assert_eq!(header.top_claims_link, "/$/top?name=hello-world");
        assert_eq!(
            header.top_claims_label,
            "View top claims for lbry://hello-world"
        );
        assert_eq!(p.search_request.unwrap().query, "hello world");
    }

    #[test]
    fn free_text_has_no_header() {
        let p = page("100% legit");
        let results = p.results.unwrap();
        assert!(results.header.is_none());
        assert_eq!(results.modified_query, "100-legit");
    }

    #[test]
    fn nsfw_option_and_layout_flags() {
        let p = page("x");
        let opts = &p.search_request.as_ref().unwrap().options;
        assert_eq!(opts.nsfw, Some(false));
        assert_eq!(
            serde_json::to_value(opts).unwrap(),
            serde_json::json!({ "isBackgroundSearch": false, "nsfw": false })
        );

        let settings = PageSettings {
            show_nsfw: true,
            simple_site: true,
            show_ads: true,
            is_authenticated: false,
        };
        let p = build_page("x", &settings, &Passthrough);
        let opts = &p.search_request.as_ref().unwrap().options;
        assert_eq!(
            serde_json::to_value(opts).unwrap(),
            serde_json::json!({ "isBackgroundSearch": false })
        );
        let results = p.results.unwrap();
        assert!(!results.show_search_options);
        assert!(results.inject_ad_slot);

        let signed_in = PageSettings {
            is_authenticated: true,
            ..settings
        };
        assert!(!build_page("x", &signed_in, &Passthrough)
            .results
            .unwrap()
            .inject_ad_slot);
    }

    #[test]
    fn session_without_redirector_never_looks_up() {
        let session = SearchSession::new(PageSettings::default(), Arc::new(Passthrough));
        let update = session.navigate("?q=0123456789abcdef0123456789abcdef01234567");
        assert!(update.lookup.is_none());
        assert!(update.page.analysis.claim_id.is_some());
    }
}
