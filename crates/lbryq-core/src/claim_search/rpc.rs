//! JSON-RPC 2.0 envelopes for the lbrynet daemon.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::LookupFailure;

#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a, P: Serialize> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: P,
    pub id: u64,
}

impl<'a, P: Serialize> RpcRequest<'a, P> {
    pub fn new(method: &'a str, params: P, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct RpcResponse<T> {
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

/// Parse a response body into its `result`, mapping `error` to `LookupFailure::Rpc`.
pub(crate) fn parse_response<T: DeserializeOwned>(body: &[u8]) -> Result<T, LookupFailure> {
    let response: RpcResponse<T> = serde_json::from_slice(body)?;
    if let Some(err) = response.error {
        return Err(LookupFailure::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    response.result.ok_or_else(|| LookupFailure::Rpc {
        code: 0,
        message: "response has neither result nor error".to_string(),
    })
}
