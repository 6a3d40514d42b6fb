//! Locator <-> web route formatting.

/// Scheme prefix of every locator.
pub const LBRY_PROTOCOL: &str = "lbry://";

/// Builds `lbry://<path>`.
pub fn lbry_url(path: &str) -> String {
    format!("{LBRY_PROTOCOL}{path}")
}

/// Converts a canonical locator into a web route.
///
/// - `lbry://@chan#a/video#b` → `/@chan:a/video:b`
/// - `lbry://?rewards` → `/$/rewards` (internal page link)
pub fn format_lbry_url_for_web(canonical_url: &str) -> String {
    let routed = canonical_url.replacen(LBRY_PROTOCOL, "/", 1).replace('#', ":");
    match routed.strip_prefix("/?") {
        Some(page) => format!("/$/{page}"),
        None => routed,
    }
}

/// Route of the "top claims for name" page.
pub fn top_claims_path(name: &str) -> String {
    format!("/$/top?name={name}")
}
