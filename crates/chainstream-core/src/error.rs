//! Error types for the stream record codec.

use thiserror::Error;

/// Errors raised while decoding wire records or encoding call arguments.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The storage value's declared type is not the one this codec understands.
    /// Means the remote runtime changed incompatibly.
    #[error("Type mismatch: expected one of [{expected}], got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("SCALE decode failed: {0}")]
    Scale(#[from] codec::Error),

    #[error("Trailing bytes after record: {remaining} unread")]
    TrailingBytes { remaining: usize },

    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Invalid SS58 address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Invalid argument {index} for '{method}': {reason}")]
    InvalidArgument {
        method: String,
        index: usize,
        reason: String,
    },

    #[error("Unknown call '{method}'")]
    UnknownCall { method: String },
}

impl CodecError {
    /// Returns `true` if the error means the wire format no longer matches
    /// this codec. These are defects, not conditions to retry.
    pub fn is_protocol_defect(&self) -> bool {
        matches!(
            self,
            Self::TypeMismatch { .. } | Self::Scale(_) | Self::TrailingBytes { .. }
        )
    }
}
