//! Wire form of an anchored stream record, as stored by the `stream` pallet.

use codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::account::{AccountId32, H256};
use crate::error::CodecError;

/// Declared type of the `Stream.Streams` storage value.
pub const STREAM_DETAILS_TYPE: &str = "Option<PalletStreamStreamsStreamDetails>";

/// A raw value read from chain storage, before decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStorageValue {
    /// Runtime-declared type of the storage entry.
    pub type_name: String,
    /// SCALE bytes of the value; `None` when the key holds nothing.
    pub bytes: Option<Vec<u8>>,
}

impl RawStorageValue {
    pub fn present(type_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            type_name: type_name.into(),
            bytes: Some(bytes),
        }
    }

    pub fn absent(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            bytes: None,
        }
    }
}

/// Check that a raw value's declared type is one of `expected`.
pub fn assert_type(value: &RawStorageValue, expected: &[&str]) -> Result<(), CodecError> {
    if expected.iter().any(|t| *t == value.type_name) {
        Ok(())
    } else {
        Err(CodecError::TypeMismatch {
            expected: expected.join(", "),
            got: value.type_name.clone(),
        })
    }
}

/// The pallet's `StreamDetails` struct, field order as on chain.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct StreamDetails {
    pub stream_hash: H256,
    pub controller: AccountId32,
    pub holder: Option<AccountId32>,
    pub schema: Option<Vec<u8>>,
    pub link: Option<Vec<u8>>,
    pub revoked: bool,
}

impl StreamDetails {
    /// Decode from SCALE bytes. The whole input must be consumed.
    pub fn from_scale(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut input = bytes;
        let details = Self::decode(&mut input)?;
        if !input.is_empty() {
            return Err(CodecError::TrailingBytes {
                remaining: input.len(),
            });
        }
        Ok(details)
    }
}
