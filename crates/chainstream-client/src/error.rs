//! Client-level errors.

use chainstream_core::{CodecError, StreamId};
use chainstream_rpc::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection or store read failed. Passed through untouched.
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The operation needs a record and the chain has none for this id.
    #[error("Stream not found: {stream_id}")]
    NotFound { stream_id: StreamId },

    #[error("Config error: {0}")]
    Config(String),
}

impl ClientError {
    /// `true` when the chain's wire format no longer matches this client.
    pub fn is_protocol_defect(&self) -> bool {
        matches!(self, Self::Codec(e) if e.is_protocol_defect())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
