//! Transport-level error types.

use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors from talking to a chain node.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, reset, non-2xx status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The result did not have the expected shape.
    #[error("Unexpected response for {method}: {reason}")]
    UnexpectedResponse { method: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if this error is transient and the request may be resent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }
}
