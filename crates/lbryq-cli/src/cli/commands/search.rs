//! `lbryq search` – search page model plus claim-id redirect.

use anyhow::{Context, Result};
use lbryq_core::claim_search::DaemonClient;
use lbryq_core::config::LbryqConfig;
use lbryq_core::i18n;
use lbryq_core::redirect::ClaimRedirector;
use lbryq_core::search_page::{PageSettings, SearchPage, SearchSession};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct SearchArgs {
    pub query: Option<String>,
    pub location: Option<String>,
    pub no_lookup: bool,
    pub authenticated: bool,
    pub daemon_url: Option<String>,
}

fn print_page(page: &SearchPage) {
    let Some(results) = &page.results else {
        println!("Empty query; nothing to search.");
        return;
    };
    if let Some(req) = &page.search_request {
        println!("search: {:?} {}", req.query, serde_json::to_string(&req.options).unwrap_or_default());
    }
    if let Some(header) = &results.header {
        println!("{}", header.uri);
        println!("  {} -> {}", header.top_claims_label, header.top_claims_link);
    } else {
        println!("term: {}", results.modified_query);
    }
    println!("{}", results.attribution);
}

pub async fn run_search(cfg: &LbryqConfig, args: SearchArgs) -> Result<()> {
    let mut cfg = cfg.clone();
    if let Some(url) = args.daemon_url {
        cfg.daemon_url = url;
    }
    let translator: Arc<dyn i18n::Translator> =
        Arc::from(i18n::translator_for(cfg.locale_file.as_deref())?);
    let settings = PageSettings::from_config(&cfg, args.authenticated);

    let mut session = SearchSession::new(settings, translator);
    let mut redirects = None;
    if !args.no_lookup {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let redirector = ClaimRedirector::new(Arc::new(DaemonClient::from_config(&cfg)), Arc::new(tx))
            .cancel_stale(cfg.cancel_stale_lookups);
        session = session.with_redirector(redirector);
        redirects = Some(rx);
    }

    let update = match (&args.location, &args.query) {
        (Some(location), _) => session.navigate(location),
        (None, Some(query)) => session.update(query),
        (None, None) => session.update(""),
    };
    print_page(&update.page);

    if let Some(lookup) = update.lookup {
        let outcome = lookup.await.context("claim lookup task")?;
        tracing::info!(%outcome, "claim lookup finished");
        println!("claim lookup: {}", outcome);
    }
    if let Some(mut rx) = redirects {
        while let Ok(url) = rx.try_recv() {
            println!("navigate: {}", url);
        }
    }
    Ok(())
}
