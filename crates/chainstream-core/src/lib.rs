//! # chainstream-core
//!
//! Core types and the record codec for the chain's `stream` pallet.
//! Everything here is pure: no I/O, no shared state. The client crate
//! composes these pieces with a store reader and an extrinsic builder.

pub mod account;
pub mod error;
pub mod identifier;
pub mod record;
pub mod record_codec;
pub mod wire;

pub use account::{
    from_ss58, hash_to_hex, parse_account, parse_hash, to_ss58, AccountId32, H256,
    DEFAULT_SS58_FORMAT,
};
pub use error::CodecError;
pub use identifier::{canonicalize, hex_to_identifier, StreamId, SCHEMA_PREFIX, STREAM_PREFIX};
pub use record::StreamRecord;
pub use record_codec::{
    CallArg, StreamCall, StreamCreate, StreamMethod, StreamRecordCodec, StreamUpdate,
};
pub use wire::{assert_type, RawStorageValue, StreamDetails, STREAM_DETAILS_TYPE};
