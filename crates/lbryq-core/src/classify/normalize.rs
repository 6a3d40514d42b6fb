//! Free-text term normalization.

use crate::uri::is_invalid_uri_char;

/// Whitespace for query purposes: Unicode White_Space plus the BOM.
pub fn is_query_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Turns a raw query into a locator-safe search term.
///
/// Trims, collapses each whitespace run to a single `-`, then drops every
/// invalid locator character. The result never contains whitespace.
pub fn normalize_term(raw: &str) -> String {
    let trimmed = raw.trim_matches(is_query_whitespace);

    let mut out = String::with_capacity(trimmed.len());
    let mut in_space = false;
    for c in trimmed.chars() {
        if is_query_whitespace(c) {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if !is_invalid_uri_char(c) {
            out.push(c);
        }
    }
    out
}
