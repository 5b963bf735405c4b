//! chainstream-rpc: the connection layer under the stream accessor.
//!
//! - [`RpcTransport`]: async trait every transport implements
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`]: JSON-RPC 2.0 wire types
//! - [`TransportError`]: structured error type
//! - [`RetryPolicy`]: exponential backoff for transient failures
//! - [`HttpRpcClient`]: `reqwest`-backed transport

pub mod error;
pub mod http;
pub mod request;
pub mod retry;
pub mod transport;

pub use error::TransportError;
pub use http::{HttpClientConfig, HttpRpcClient};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use retry::{RetryConfig, RetryPolicy};
pub use transport::RpcTransport;
