pub mod config;
pub mod logging;

pub mod claim_search;
pub mod classify;
pub mod i18n;
pub mod publish_preview;
pub mod redirect;
pub mod retry;
pub mod search_page;
pub mod uri;
