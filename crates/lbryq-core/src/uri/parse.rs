//! Locator parsing: `[lbry://]name[mod]/[name[mod]][?query]`.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Claim ids are at most 40 lowercase hex characters.
pub const CLAIM_ID_MAX_LENGTH: usize = 40;

/// Channel names must have at least this many characters after `@`.
const CHANNEL_NAME_MIN_LENGTH: usize = 1;

static QUERY_STRING_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)(\?\S*)").expect("static regex"));

// protocol, name, modifier separator + value, path separator, second name,
// second modifier separator + value.
static COMPONENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:lbry://)?)([^:$#/]*)([:$#]?)([^/]*)(/?)([^:$#/]*)([:$#]?)([^/]*)")
        .expect("static regex")
});

static CLAIM_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]+$").expect("static regex"));

static SIGNED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[1-9][0-9]*$").expect("static regex"));

/// Malformed locator syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("URL does not include name")]
    MissingName,
    #[error("URL can not include a space")]
    ContainsSpace,
    #[error("no channel name after @")]
    EmptyChannelName,
    #[error("no modifier provided after separator {0}")]
    MissingModifier(char),
    #[error("invalid claim ID {0}")]
    InvalidClaimId(String),
    #[error("claim sequence must be a number: {0}")]
    InvalidClaimSequence(String),
    #[error("bid position must be a number: {0}")]
    InvalidBidPosition(String),
}

/// A parsed locator.
///
/// `path` is everything after the protocol that the grammar matched, so
/// `lbry://@chan#a/video#b` has path `@chan#a/video#b`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LbryUri {
    pub is_channel: bool,
    pub path: String,
    pub stream_name: Option<String>,
    pub stream_claim_id: Option<String>,
    pub channel_name: Option<String>,
    pub channel_claim_id: Option<String>,
    pub primary_claim_sequence: Option<i64>,
    pub secondary_claim_sequence: Option<i64>,
    pub primary_bid_position: Option<i64>,
    pub secondary_bid_position: Option<i64>,
    /// Playback offset from `?t=<secs>`.
    pub start_time: Option<u64>,
    /// First segment as written (channel names keep their `@`).
    pub claim_name: String,
    /// Claim id attached to the first segment.
    pub claim_id: Option<String>,
    pub query_string: Option<String>,
}

#[derive(Debug, Default)]
struct Modifier {
    claim_id: Option<String>,
    claim_sequence: Option<i64>,
    bid_position: Option<i64>,
}

fn non_empty(s: Option<regex::Match<'_>>) -> Option<&str> {
    s.map(|m| m.as_str()).filter(|s| !s.is_empty())
}

fn parse_modifier(separator: Option<&str>, value: Option<&str>) -> Result<Modifier, UriError> {
    let mut modifier = Modifier::default();
    let Some(separator) = separator.and_then(|s| s.chars().next()) else {
        return Ok(modifier);
    };
    let value = value.ok_or(UriError::MissingModifier(separator))?;

    match separator {
        '#' => {
            if value.len() > CLAIM_ID_MAX_LENGTH || !CLAIM_ID.is_match(value) {
                return Err(UriError::InvalidClaimId(value.to_string()));
            }
            modifier.claim_id = Some(value.to_string());
        }
        ':' => {
            if !SIGNED_NUMBER.is_match(value) {
                return Err(UriError::InvalidClaimSequence(value.to_string()));
            }
            modifier.claim_sequence = value.parse().ok();
        }
        '$' => {
            if !SIGNED_NUMBER.is_match(value) {
                return Err(UriError::InvalidBidPosition(value.to_string()));
            }
            modifier.bid_position = value.parse().ok();
        }
        _ => {}
    }
    Ok(modifier)
}

fn start_time_from(query_string: &str) -> Option<u64> {
    let pairs = query_string.trim_start_matches('?');
    url::form_urlencoded::parse(pairs.as_bytes())
        .find(|(k, _)| k == "t")
        .and_then(|(_, v)| v.parse().ok())
}

/// Parses a locator, with or without the `lbry://` prefix.
///
/// Anything after the second segment's modifier is ignored, as is text after
/// the first whitespace when a query string is present.
pub fn parse_uri(text: &str) -> Result<LbryUri, UriError> {
    let (clean, query_string) = match QUERY_STRING_SPLIT.captures(text) {
        Some(caps) => (
            caps.get(1).map_or(text, |m| m.as_str()),
            non_empty(caps.get(2)).map(str::to_string),
        ),
        None => (text, None),
    };

    let caps = COMPONENTS.captures(clean).ok_or(UriError::MissingName)?;
    let rest: Vec<Option<&str>> = (2..=8).map(|i| non_empty(caps.get(i))).collect();
    let path: String = rest.iter().flatten().copied().collect();
    let [first_name, primary_sep, primary_value, _path_sep, second_name, secondary_sep, secondary_value] =
        [rest[0], rest[1], rest[2], rest[3], rest[4], rest[5], rest[6]];

    let first_name = first_name.ok_or(UriError::MissingName)?;
    if rest.iter().flatten().any(|piece| piece.contains(' ')) {
        return Err(UriError::ContainsSpace);
    }

    let includes_channel = first_name.starts_with('@');
    let is_channel = includes_channel && second_name.is_none();
    let channel_name = if includes_channel {
        let name = &first_name[1..];
        if name.chars().count() < CHANNEL_NAME_MIN_LENGTH {
            return Err(UriError::EmptyChannelName);
        }
        Some(name.to_string())
    } else {
        None
    };

    let primary = parse_modifier(primary_sep, primary_value)?;
    let secondary = parse_modifier(secondary_sep, secondary_value)?;

    let stream_name = if includes_channel {
        second_name
    } else {
        Some(first_name)
    };
    let (stream_claim_id, channel_claim_id) = if includes_channel {
        (secondary.claim_id, primary.claim_id.clone())
    } else {
        (primary.claim_id.clone(), None)
    };

    Ok(LbryUri {
        is_channel,
        path,
        stream_name: stream_name.map(str::to_string),
        stream_claim_id,
        channel_name,
        channel_claim_id,
        primary_claim_sequence: primary.claim_sequence,
        secondary_claim_sequence: secondary.claim_sequence,
        primary_bid_position: primary.bid_position,
        secondary_bid_position: secondary.bid_position,
        start_time: query_string.as_deref().and_then(start_time_from),
        claim_name: first_name.to_string(),
        claim_id: primary.claim_id,
        query_string,
    })
}
