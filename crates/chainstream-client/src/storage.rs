//! Store readers: fetch raw values from the chain's key-value storage.

use async_trait::async_trait;
use codec::Encode;
use serde_json::Value;
use sp_core::hashing::{blake2_128, twox_128};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

use chainstream_core::{RawStorageValue, STREAM_DETAILS_TYPE};
use chainstream_rpc::request::{STATE_GET_METADATA, STATE_GET_STORAGE};
use chainstream_rpc::{RpcTransport, TransportError};

use crate::config::PalletConfig;
use crate::metadata::{RuntimeTypes, MISSING_ENTRY_TYPE};

/// A storage map of some pallet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageMap {
    pub pallet: String,
    pub item: String,
}

impl StorageMap {
    pub fn new(pallet: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            pallet: pallet.into(),
            item: item.into(),
        }
    }

    /// The stream pallet's `Streams` map.
    pub fn streams(pallet: &PalletConfig) -> Self {
        Self::new(&pallet.name, &pallet.storage_item)
    }
}

/// Reads one value from a storage map, tagged with the type the runtime
/// declares for it.
#[async_trait]
pub trait StoreReader: Send + Sync {
    async fn read(&self, map: &StorageMap, key: &str) -> Result<RawStorageValue, TransportError>;
}

/// Final storage key for `key` in a `Blake2_128Concat` map.
///
/// `twox128(pallet) ++ twox128(item) ++ blake2_128(k) ++ k`, where `k` is
/// the SCALE encoding of the key's bytes.
pub fn storage_key(map: &StorageMap, key: &str) -> Vec<u8> {
    let encoded_key = key.as_bytes().to_vec().encode();
    let mut out = Vec::with_capacity(32 + 16 + encoded_key.len());
    out.extend_from_slice(&twox_128(map.pallet.as_bytes()));
    out.extend_from_slice(&twox_128(map.item.as_bytes()));
    out.extend_from_slice(&blake2_128(&encoded_key));
    out.extend_from_slice(&encoded_key);
    out
}

fn decode_hex_result(method: &str, s: &str) -> Result<Vec<u8>, TransportError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| TransportError::UnexpectedResponse {
        method: method.to_string(),
        reason: e.to_string(),
    })
}

/// Reads storage through `state_getStorage`.
///
/// Declared types come from `state_getMetadata`, fetched once per reader.
/// A runtime upgrade needs a fresh reader (a fresh connection).
pub struct RpcStoreReader {
    transport: Arc<dyn RpcTransport>,
    next_id: AtomicU64,
    runtime: OnceCell<RuntimeTypes>,
}

impl RpcStoreReader {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
            runtime: OnceCell::new(),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn runtime_types(&self) -> Result<&RuntimeTypes, TransportError> {
        self.runtime
            .get_or_try_init(|| async {
                let result = self
                    .transport
                    .call_value(self.next_id(), STATE_GET_METADATA, vec![])
                    .await?;
                let Value::String(s) = result else {
                    return Err(TransportError::UnexpectedResponse {
                        method: STATE_GET_METADATA.to_string(),
                        reason: format!("expected hex string, got {result}"),
                    });
                };
                let bytes = decode_hex_result(STATE_GET_METADATA, &s)?;
                let types = RuntimeTypes::from_metadata(&bytes).map_err(|reason| {
                    TransportError::UnexpectedResponse {
                        method: STATE_GET_METADATA.to_string(),
                        reason,
                    }
                })?;
                tracing::debug!(entries = types.len(), "loaded runtime storage types");
                Ok(types)
            })
            .await
    }
}

#[async_trait]
impl StoreReader for RpcStoreReader {
    async fn read(&self, map: &StorageMap, key: &str) -> Result<RawStorageValue, TransportError> {
        let type_name = self
            .runtime_types()
            .await?
            .declared_type(&map.pallet, &map.item)
            .unwrap_or(MISSING_ENTRY_TYPE)
            .to_string();

        let hashed = format!("0x{}", hex::encode(storage_key(map, key)));
        tracing::debug!(
            pallet = %map.pallet,
            item = %map.item,
            key,
            storage_key = %hashed,
            declared_type = %type_name,
            "reading storage"
        );

        let result = self
            .transport
            .call_value(self.next_id(), STATE_GET_STORAGE, vec![Value::String(hashed)])
            .await?;

        match result {
            Value::Null => Ok(RawStorageValue::absent(type_name)),
            Value::String(s) => {
                let bytes = decode_hex_result(STATE_GET_STORAGE, &s)?;
                Ok(RawStorageValue::present(type_name, bytes))
            }
            other => Err(TransportError::UnexpectedResponse {
                method: STATE_GET_STORAGE.to_string(),
                reason: format!("expected hex string or null, got {other}"),
            }),
        }
    }
}

/// In-process store. For tests and offline use.
///
/// Every map declares the stream record type unless told otherwise.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<(StorageMap, String), Vec<u8>>>,
    declared: Mutex<HashMap<StorageMap, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, map: &StorageMap, key: &str, bytes: Vec<u8>) {
        self.values
            .lock()
            .unwrap()
            .insert((map.clone(), key.to_string()), bytes);
    }

    pub fn remove(&self, map: &StorageMap, key: &str) -> Option<Vec<u8>> {
        self.values
            .lock()
            .unwrap()
            .remove(&(map.clone(), key.to_string()))
    }

    /// Report `type_name` for reads of `map`, as a node running another
    /// runtime would.
    pub fn set_declared_type(&self, map: &StorageMap, type_name: impl Into<String>) {
        self.declared
            .lock()
            .unwrap()
            .insert(map.clone(), type_name.into());
    }

    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StoreReader for MemoryStore {
    async fn read(&self, map: &StorageMap, key: &str) -> Result<RawStorageValue, TransportError> {
        let type_name = self
            .declared
            .lock()
            .unwrap()
            .get(map)
            .cloned()
            .unwrap_or_else(|| STREAM_DETAILS_TYPE.to_string());
        let bytes = self
            .values
            .lock()
            .unwrap()
            .get(&(map.clone(), key.to_string()))
            .cloned();
        Ok(RawStorageValue { type_name, bytes })
    }
}
