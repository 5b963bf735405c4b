//! `StreamRecordCodec`: shapes write requests into positional call
//! arguments and turns raw storage values into `StreamRecord`s.
//!
//! Nothing here validates content. Signatures, hashes and authorization
//! are checked by the runtime when the extrinsic lands; this layer only
//! orders and normalizes data.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::account::{self, AccountId32, DEFAULT_SS58_FORMAT};
use crate::error::CodecError;
use crate::identifier::{canonicalize, hex_to_identifier, StreamId, SCHEMA_PREFIX, STREAM_PREFIX};
use crate::record::{falsy_to_none, StreamRecord};
use crate::wire::{assert_type, RawStorageValue, StreamDetails, STREAM_DETAILS_TYPE};

/// Request to anchor a new stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamCreate {
    /// Creator account (SS58).
    pub creator: String,
    pub stream_hash: String,
    pub holder: Option<String>,
    /// Raw schema id, without namespace prefix.
    pub schema_id: String,
    /// Raw id of a prior stream this one links to.
    #[serde(default)]
    pub link_id: Option<String>,
    pub signature: String,
}

/// Request to replace a stream's content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamUpdate {
    /// Raw stream id, without namespace prefix.
    pub stream_id: String,
    pub stream_hash: String,
    pub signature: String,
}

/// Callable methods of the `stream` pallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamMethod {
    Create,
    Update,
    SetStatus,
}

impl StreamMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::SetStatus => "set_status",
        }
    }
}

impl fmt::Display for StreamMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One positional argument of a pallet call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CallArg {
    Text(String),
    Bool(bool),
    /// A real `None`, distinct from an empty string.
    Absent,
}

impl CallArg {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// A pallet method plus its arguments in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamCall {
    pub method: StreamMethod,
    pub args: Vec<CallArg>,
}

/// Bidirectional translation between domain values and the stream
/// pallet's call/storage shapes. Holds no state beyond the address format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRecordCodec {
    ss58_format: u16,
}

impl Default for StreamRecordCodec {
    fn default() -> Self {
        Self::new(DEFAULT_SS58_FORMAT)
    }
}

impl StreamRecordCodec {
    pub fn new(ss58_format: u16) -> Self {
        Self { ss58_format }
    }

    pub fn ss58_format(&self) -> u16 {
        self.ss58_format
    }

    /// `create(creator, hash, holder, schema, link, signature)`.
    pub fn build_create_args(&self, stream: &StreamCreate) -> StreamCall {
        let holder = match &stream.holder {
            Some(h) => CallArg::Text(h.clone()),
            None => CallArg::Absent,
        };
        let link = match &stream.link_id {
            Some(l) => CallArg::Text(canonicalize(l, STREAM_PREFIX)),
            None => CallArg::Absent,
        };
        StreamCall {
            method: StreamMethod::Create,
            args: vec![
                CallArg::Text(stream.creator.clone()),
                CallArg::Text(stream.stream_hash.clone()),
                holder,
                CallArg::Text(canonicalize(&stream.schema_id, SCHEMA_PREFIX)),
                link,
                CallArg::Text(stream.signature.clone()),
            ],
        }
    }

    /// `update(stream_id, hash, signature)`.
    pub fn build_update_args(&self, stream: &StreamUpdate) -> StreamCall {
        StreamCall {
            method: StreamMethod::Update,
            args: vec![
                CallArg::Text(canonicalize(&stream.stream_id, STREAM_PREFIX)),
                CallArg::Text(stream.stream_hash.clone()),
                CallArg::Text(stream.signature.clone()),
            ],
        }
    }

    /// `set_status(stream_id, status, tx_hash, tx_signature)`.
    pub fn build_status_args(
        &self,
        stream_id: &str,
        status: bool,
        tx_hash: &str,
        tx_signature: &str,
    ) -> StreamCall {
        StreamCall {
            method: StreamMethod::SetStatus,
            args: vec![
                CallArg::Text(canonicalize(stream_id, STREAM_PREFIX)),
                CallArg::Bool(status),
                CallArg::Text(tx_hash.to_string()),
                CallArg::Text(tx_signature.to_string()),
            ],
        }
    }

    /// Decode a raw `Stream.Streams` value.
    ///
    /// Absent values yield `Ok(None)`. The returned record's `stream_id`
    /// is always `stream_id`; the payload carries no id of its own.
    pub fn decode(
        &self,
        raw: &RawStorageValue,
        stream_id: &StreamId,
    ) -> Result<Option<StreamRecord>, CodecError> {
        assert_type(raw, &[STREAM_DETAILS_TYPE])?;

        let Some(bytes) = raw.bytes.as_deref() else {
            return Ok(None);
        };
        let details = StreamDetails::from_scale(bytes)?;
        self.normalize(details, stream_id).map(Some)
    }

    fn normalize(
        &self,
        details: StreamDetails,
        stream_id: &StreamId,
    ) -> Result<StreamRecord, CodecError> {
        let schema = hex_to_identifier(&render_bytes(details.schema.as_deref()))?;
        let link = hex_to_identifier(&render_bytes(details.link.as_deref()))?;

        Ok(StreamRecord {
            stream_id: stream_id.clone(),
            stream_hash: account::hash_to_hex(&details.stream_hash),
            controller: account::to_ss58(&details.controller, self.ss58_format),
            holder: falsy_to_none(self.render_account(details.holder.as_ref())),
            schema_id: falsy_to_none(schema),
            link_id: falsy_to_none(link),
            revoked: details.revoked,
        })
    }

    fn render_account(&self, who: Option<&AccountId32>) -> String {
        match who {
            Some(a) if !account::is_zero(a) => account::to_ss58(a, self.ss58_format),
            _ => String::new(),
        }
    }
}

// None, empty and all-zero payloads render as "".
fn render_bytes(bytes: Option<&[u8]>) -> String {
    match bytes {
        Some(b) if b.iter().any(|x| *x != 0) => format!("0x{}", hex::encode(b)),
        _ => String::new(),
    }
}
