//! Connections and the providers that hand them out.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

use chainstream_core::StreamRecordCodec;
use chainstream_rpc::request::SYSTEM_CHAIN;
use chainstream_rpc::{HttpRpcClient, RpcTransport, TransportError};

use crate::config::ClientConfig;
use crate::extrinsic::{CallDataBuilder, ExtrinsicBuilder};
use crate::storage::{RpcStoreReader, StorageMap, StoreReader};

/// A live handle to one chain: storage reads, call construction, and the
/// codec configured for that chain's address format.
pub struct Connection {
    chain: Option<String>,
    store: Arc<dyn StoreReader>,
    tx: Arc<dyn ExtrinsicBuilder>,
    streams: StorageMap,
    codec: StreamRecordCodec,
}

impl Connection {
    pub fn new(
        store: Arc<dyn StoreReader>,
        tx: Arc<dyn ExtrinsicBuilder>,
        streams: StorageMap,
        codec: StreamRecordCodec,
    ) -> Self {
        Self {
            chain: None,
            store,
            tx,
            streams,
            codec,
        }
    }

    /// Wire up a connection from config around an existing store.
    pub fn from_config(config: &ClientConfig, store: Arc<dyn StoreReader>) -> Self {
        Self::new(
            store,
            Arc::new(CallDataBuilder::new(config.pallet.clone())),
            StorageMap::streams(&config.pallet),
            StreamRecordCodec::new(config.ss58_format),
        )
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    /// Chain name reported by the node, if known.
    pub fn chain(&self) -> Option<&str> {
        self.chain.as_deref()
    }

    pub fn store(&self) -> &dyn StoreReader {
        self.store.as_ref()
    }

    pub fn tx(&self) -> &dyn ExtrinsicBuilder {
        self.tx.as_ref()
    }

    pub fn streams(&self) -> &StorageMap {
        &self.streams
    }

    pub fn codec(&self) -> &StreamRecordCodec {
        &self.codec
    }
}

/// Returns the live connection, connecting first if needed.
/// Repeated and concurrent calls yield the same connection.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn get_connection_or_connect(&self) -> Result<Arc<Connection>, TransportError>;
}

/// Connects over HTTP JSON-RPC on first use.
pub struct RpcConnectionProvider {
    config: ClientConfig,
    conn: OnceCell<Arc<Connection>>,
}

impl RpcConnectionProvider {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            conn: OnceCell::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.initialized()
    }

    async fn connect(&self) -> Result<Arc<Connection>, TransportError> {
        let transport: Arc<dyn RpcTransport> = Arc::new(HttpRpcClient::new(
            &self.config.rpc_url,
            self.config.http_client_config(),
        )?);

        let chain = transport.call_value(0, SYSTEM_CHAIN, vec![]).await?;
        let chain = chain.as_str().unwrap_or_default().to_string();
        tracing::info!(url = %transport.url(), chain = %chain, "connected to chain");

        let store = Arc::new(RpcStoreReader::new(transport));
        Ok(Arc::new(
            Connection::from_config(&self.config, store).with_chain(chain),
        ))
    }
}

#[async_trait]
impl ConnectionProvider for RpcConnectionProvider {
    async fn get_connection_or_connect(&self) -> Result<Arc<Connection>, TransportError> {
        self.conn
            .get_or_try_init(|| self.connect())
            .await
            .cloned()
    }
}

/// Hands out a connection built up front.
pub struct StaticConnection(Arc<Connection>);

impl StaticConnection {
    pub fn new(conn: Connection) -> Self {
        Self(Arc::new(conn))
    }
}

#[async_trait]
impl ConnectionProvider for StaticConnection {
    async fn get_connection_or_connect(&self) -> Result<Arc<Connection>, TransportError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chainstream_rpc::RetryConfig;

    #[tokio::test]
    async fn static_provider_returns_same_connection() {
        let provider = StaticConnection::new(
            Connection::from_config(&ClientConfig::default(), Arc::new(MemoryStore::new()))
                .with_chain("dev"),
        );
        let a = provider.get_connection_or_connect().await.unwrap();
        let b = provider.get_connection_or_connect().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.chain(), Some("dev"));
        assert_eq!(a.streams().item, "Streams");
    }

    #[tokio::test]
    async fn failed_connect_is_not_cached() {
        let provider = RpcConnectionProvider::new(ClientConfig {
            rpc_url: "http://127.0.0.1:1".into(),
            request_timeout_ms: 2_000,
            retry: RetryConfig {
                max_retries: 0,
                ..Default::default()
            },
            ..Default::default()
        });
        assert!(provider.get_connection_or_connect().await.is_err());
        assert!(!provider.is_connected());
    }
}
