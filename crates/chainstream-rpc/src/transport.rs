//! The `RpcTransport` trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// An async JSON-RPC transport to a chain node.
///
/// Object-safe, so connections hold it as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// The endpoint this transport talks to.
    fn url(&self) -> &str;

    /// Call `method` and return the raw result value.
    async fn call_value(
        &self,
        id: u64,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, TransportError> {
        let resp = self.send(JsonRpcRequest::new(id, method, params)).await?;
        resp.into_result().map_err(TransportError::Rpc)
    }
}
