//! The context threaded through every stream operation.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::connection::{Connection, ConnectionProvider, StaticConnection};
use crate::error::ClientError;
use crate::storage::MemoryStore;

/// Connection provider plus the span operations log under.
/// Cheap to clone; clones share the provider.
#[derive(Clone)]
pub struct ChainContext {
    provider: Arc<dyn ConnectionProvider>,
    span: tracing::Span,
}

impl ChainContext {
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self {
            provider,
            span: tracing::info_span!("chainstream"),
        }
    }

    /// A context that never touches the network. Writes build call data
    /// from `config` alone; reads see an empty store.
    pub fn offline(config: &ClientConfig) -> Self {
        let conn = Connection::from_config(config, Arc::new(MemoryStore::new()));
        Self::new(Arc::new(StaticConnection::new(conn)))
    }

    /// Log under `span` instead of the default `chainstream` span.
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    pub async fn connection(&self) -> Result<Arc<Connection>, ClientError> {
        Ok(self.provider.get_connection_or_connect().await?)
    }
}
