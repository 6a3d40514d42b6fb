//! Map lookup failures onto retry error kinds.

use crate::claim_search::LookupFailure;
use crate::retry::policy::ErrorKind;

pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

pub fn classify(e: &LookupFailure) -> ErrorKind {
    match e {
        LookupFailure::Transport(ce) => classify_curl_error(ce),
        LookupFailure::Http(code) => classify_http_status(*code),
        LookupFailure::Malformed(_) | LookupFailure::Rpc { .. } | LookupFailure::Task(_) => {
            ErrorKind::Other
        }
    }
}
