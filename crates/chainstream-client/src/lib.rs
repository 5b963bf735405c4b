//! chainstream-client: stream pallet operations against a live chain.
//!
//! Every operation takes a [`ChainContext`]: the connection provider and
//! the `tracing` span to log under. There is no process-wide state; the
//! caller owns the context and decides how long the connection lives.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chainstream_client::{stream, ChainContext, ClientConfig, RpcConnectionProvider};
//!
//! # async fn run() -> Result<(), chainstream_client::ClientError> {
//! let provider = RpcConnectionProvider::new(ClientConfig::default());
//! let ctx = ChainContext::new(Arc::new(provider));
//! if let Some(record) = stream::query(&ctx, "my-stream").await? {
//!     println!("controller: {}", record.controller);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod context;
pub mod error;
pub mod extrinsic;
pub mod metadata;
pub mod storage;
pub mod stream;

pub use config::{ClientConfig, PalletConfig};
pub use connection::{Connection, ConnectionProvider, RpcConnectionProvider, StaticConnection};
pub use context::ChainContext;
pub use error::ClientError;
pub use extrinsic::{CallDataBuilder, Extrinsic, ExtrinsicBuilder};
pub use metadata::{RuntimeTypes, MISSING_ENTRY_TYPE};
pub use storage::{storage_key, MemoryStore, RpcStoreReader, StorageMap, StoreReader};
