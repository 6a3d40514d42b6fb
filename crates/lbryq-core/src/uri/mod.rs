//! LBRY locator model.
//!
//! Parses `lbry://` locators (stream, channel, or channel/stream pairs with
//! claim-id, sequence, or bid-position modifiers), checks claim-name
//! validity, and formats canonical URLs for the web router.

mod name;
mod parse;
mod web;

pub use name::{is_invalid_uri_char, is_name_valid, strip_invalid_uri_chars};
pub use parse::{parse_uri, LbryUri, UriError, CLAIM_ID_MAX_LENGTH};
pub use web::{format_lbry_url_for_web, lbry_url, top_claims_path, LBRY_PROTOCOL};
