//! Search-query classification.
//!
//! Decides whether a raw search query names content directly (a locator),
//! is free text, and whether it additionally looks like a 40-character claim
//! id worth looking up. Classification is pure and infallible; every parse
//! failure simply rules out that interpretation.

mod normalize;

pub use normalize::{is_query_whitespace, normalize_term};

use serde::Serialize;

use crate::uri::{is_name_valid, parse_uri, CLAIM_ID_MAX_LENGTH};

/// Placeholder stream name used to parse a bare claim id.
const CLAIM_ID_PLACEHOLDER_NAME: &str = "x";

/// Synchronous interpretation of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Classification {
    /// Empty query: nothing to search.
    Inert,
    /// Query parses as a locator with a valid stream name; holds its path.
    Locator(String),
    /// Anything else; holds the normalized term.
    FreeText(String),
}

impl Classification {
    pub fn is_inert(&self) -> bool {
        matches!(self, Classification::Inert)
    }

    /// Locator path or normalized term (empty when inert).
    pub fn term(&self) -> &str {
        match self {
            Classification::Inert => "",
            Classification::Locator(path) => path,
            Classification::FreeText(term) => term,
        }
    }
}

/// Full analysis of one raw query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryAnalysis {
    pub raw: String,
    pub classification: Classification,
    /// `raw` normalized for locator use, computed regardless of classification.
    pub normalized_term: String,
    /// Claim id to look up, when the query has the claim-id shape and parses.
    pub claim_id: Option<String>,
}

impl QueryAnalysis {
    /// The locator interpretation passed parsing and name validation.
    pub fn is_locator(&self) -> bool {
        matches!(self.classification, Classification::Locator(_))
    }
}

/// Path of the locator interpretation, or `None` if it is invalid.
///
/// Spaces become hyphens and colons become claim-id separators before
/// parsing, so `hello world` reads as the name `hello-world`.
fn locator_path(raw: &str) -> Option<String> {
    let candidate = raw.replace(' ', "-").replace(':', "#");
    match parse_uri(&candidate) {
        Ok(uri) => {
            let name_ok = uri.stream_name.as_deref().map_or(true, is_name_valid);
            if name_ok && !uri.path.is_empty() {
                Some(uri.path)
            } else {
                tracing::trace!(query = raw, "locator rejected: invalid stream name");
                None
            }
        }
        Err(e) => {
            tracing::trace!(query = raw, error = %e, "locator parse failed");
            None
        }
    }
}

/// True when `raw` has no whitespace and is exactly a claim id long.
///
/// Length is counted in UTF-16 code units, as browsers measure query text.
pub fn has_claim_id_shape(raw: &str) -> bool {
    !raw.chars().any(is_query_whitespace) && raw.encode_utf16().count() == CLAIM_ID_MAX_LENGTH
}

/// Claim id extracted from `raw`, if it has the claim-id shape and parses.
///
/// Checked independently of the locator interpretation.
pub fn claim_id_candidate(raw: &str) -> Option<String> {
    if !has_claim_id_shape(raw) {
        return None;
    }
    match parse_uri(&format!("{CLAIM_ID_PLACEHOLDER_NAME}#{raw}")) {
        Ok(uri) => uri.claim_id,
        Err(e) => {
            tracing::trace!(query = raw, error = %e, "claim id parse failed");
            None
        }
    }
}

/// Classifies a raw query. Never fails.
pub fn classify(raw: &str) -> Classification {
    if raw.is_empty() {
        return Classification::Inert;
    }
    match locator_path(raw) {
        Some(path) => Classification::Locator(path),
        None => Classification::FreeText(normalize_term(raw)),
    }
}

/// Classifies `raw` and collects the normalized term and claim-id candidate.
pub fn analyze(raw: &str) -> QueryAnalysis {
    if raw.is_empty() {
        return QueryAnalysis {
            raw: String::new(),
            classification: Classification::Inert,
            normalized_term: String::new(),
            claim_id: None,
        };
    }
    QueryAnalysis {
        raw: raw.to_string(),
        classification: classify(raw),
        normalized_term: normalize_term(raw),
        claim_id: claim_id_candidate(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX40: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn empty_is_inert() {
        let a = analyze("");
        assert!(a.classification.is_inert());
        assert!(a.claim_id.is_none());
        assert_eq!(a.normalized_term, "");
    }

    #[test]
    fn spaces_read_as_hyphenated_name() {
        let a = analyze("hello world");
        assert_eq!(a.classification, Classification::Locator("hello-world".into()));
        assert_eq!(a.normalized_term, "hello-world");
        assert!(a.claim_id.is_none());
        // The trailing `?` is split off as a query string.
        assert_eq!(
            classify("what is lbry?"),
            Classification::Locator("what-is-lbry".into())
        );
    }

    #[test]
    fn plain_name_and_full_locator() {
        assert_eq!(classify("what"), Classification::Locator("what".into()));
        assert_eq!(
            classify("@chan#ab/video"),
            Classification::Locator("@chan#ab/video".into())
        );
        assert_eq!(classify("@chan"), Classification::Locator("@chan".into()));
    }

    #[test]
    fn protocol_prefix_does_not_survive_colon_substitution() {
        assert_eq!(
            classify("lbry://what"),
            Classification::FreeText("lbrywhat".into())
        );
    }

    #[test]
    fn colon_becomes_claim_id_separator() {
        assert_eq!(classify("video:abc"), Classification::Locator("video#abc".into()));
        // `xyz` is not hex, so the locator interpretation fails.
        assert_eq!(classify("foo:xyz"), Classification::FreeText("fooxyz".into()));
    }

    #[test]
    fn malformed_locators_fall_back_to_free_text() {
        assert_eq!(classify("#tag"), Classification::FreeText("tag".into()));
        assert_eq!(classify("a=b"), Classification::FreeText("ab".into()));
        assert_eq!(classify("100%"), Classification::FreeText("100".into()));
    }

    #[test]
    fn whitespace_other_than_space_is_not_substituted() {
        // Tabs survive substitution; the name stays valid per the character set
        // but the term normalizes the tab away.
        let a = analyze("hello\tworld");
        assert_eq!(a.classification, Classification::Locator("hello\tworld".into()));
        assert_eq!(a.normalized_term, "hello-world");
    }

    #[test]
    fn claim_id_shape_is_attempted_regardless_of_locator() {
        let a = analyze(HEX40);
        assert_eq!(a.claim_id.as_deref(), Some(HEX40));
        assert_eq!(a.classification, Classification::Locator(HEX40.into()));

        let upper = HEX40.to_uppercase();
        let b = analyze(&upper);
        assert!(b.claim_id.is_none(), "uppercase is not a claim id");
        assert!(b.is_locator());
    }

    #[test]
    fn whitespace_blocks_claim_id_branch() {
        let spaced = format!("{} {}", &HEX40[..20], &HEX40[21..]);
        assert_eq!(spaced.chars().count(), 40);
        assert!(claim_id_candidate(&spaced).is_none());
        let tabbed = format!("{}\t{}", &HEX40[..20], &HEX40[21..]);
        assert!(claim_id_candidate(&tabbed).is_none());
    }

    #[test]
    fn wrong_length_skips_claim_id_branch() {
        assert!(claim_id_candidate(&HEX40[..39]).is_none());
        assert!(claim_id_candidate(&format!("{HEX40}0")).is_none());
    }

    #[test]
    fn slash_in_claim_id_shape_keeps_prefix() {
        let q = format!("abc/{}", "d".repeat(36));
        assert_eq!(claim_id_candidate(&q).as_deref(), Some("abc"));
    }

    #[test]
    fn claim_id_shape_counts_utf16_units() {
        // 39 chars, 40 UTF-16 units.
        let q = format!("abc/{}\u{1F600}", "d".repeat(34));
        assert_eq!(q.chars().count(), 39);
        assert!(has_claim_id_shape(&q));
        assert_eq!(claim_id_candidate(&q).as_deref(), Some("abc"));

        // 40 chars, 41 UTF-16 units.
        let long = format!("abc/{}\u{1F600}", "d".repeat(35));
        assert!(!has_claim_id_shape(&long));
    }

    #[test]
    fn idempotent() {
        for q in ["", "hello world", HEX40, "foo:xyz", "@chan/vid"] {
            assert_eq!(analyze(q), analyze(q));
        }
    }
}
