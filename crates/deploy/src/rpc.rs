//! Minimal JSON-RPC client for talking to an Ethereum node over HTTP.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Timeout applied to every individual RPC request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Failure of a JSON-RPC exchange.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The endpoint is not a valid URL.
    #[error("invalid RPC endpoint '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    /// The request never produced a parseable response.
    #[error("{method} request failed")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    /// The node answered with a JSON-RPC error object.
    #[error("node rejected {method}: {message} (code {code})")]
    Node {
        method: &'static str,
        code: i64,
        message: String,
    },
    /// The response had no usable `result` payload.
    #[error("{method} returned an unexpected payload: {reason}")]
    UnexpectedPayload {
        method: &'static str,
        reason: String,
    },
}

/// HTTP JSON-RPC client bound to a single endpoint.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl RpcClient {
    /// Create a client for the given endpoint URL.
    pub fn new(endpoint: &str) -> Result<Self, RpcError> {
        let endpoint = Url::parse(endpoint).map_err(|source| RpcError::InvalidUrl {
            url: endpoint.to_string(),
            source,
        })?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(RpcError::Client)?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Issue a JSON-RPC call and deserialize its `result` field.
    ///
    /// Node-reported errors (the JSON-RPC `error` object) surface as
    /// [`RpcError::Node`] with the node's code and message preserved.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Vec<Value>,
    ) -> Result<T, RpcError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&serde_json::json!({
                "jsonrpc": "2.0",
                "method": method,
                "params": params,
                "id": 1
            }))
            .send()
            .await
            .map_err(|source| RpcError::Transport { method, source })?;

        let body: Value = response
            .json()
            .await
            .map_err(|source| RpcError::Transport { method, source })?;

        if let Some(error) = body.get("error") {
            return Err(RpcError::Node {
                method,
                code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
            });
        }

        let result = body
            .get("result")
            .cloned()
            .ok_or_else(|| RpcError::UnexpectedPayload {
                method,
                reason: "no result field".to_string(),
            })?;

        serde_json::from_value(result).map_err(|e| RpcError::UnexpectedPayload {
            method,
            reason: e.to_string(),
        })
    }
}

/// Parse a 0x-prefixed hex quantity into a u64.
pub fn parse_hex_u64(value: &str) -> Option<u64> {
    u64::from_str_radix(value.trim_start_matches("0x"), 16).ok()
}
