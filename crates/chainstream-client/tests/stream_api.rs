//! Stream operations end to end against an in-memory store.

use async_trait::async_trait;
use codec::Encode;
use frame_metadata::v14::{
    ExtrinsicMetadata, PalletMetadata, PalletStorageMetadata, RuntimeMetadataV14,
    StorageEntryMetadata, StorageEntryModifier, StorageEntryType, StorageHasher,
};
use frame_metadata::RuntimeMetadataPrefixed;
use scale_info::build::Fields;
use scale_info::{meta_type, MetaType, Path, Type, TypeInfo};
use serde_json::Value;
use std::sync::Arc;

use chainstream_client::{
    stream, ChainContext, ClientConfig, ClientError, Connection, MemoryStore, RpcStoreReader,
    StaticConnection, StorageMap, StoreReader,
};
use chainstream_core::{
    from_ss58, AccountId32, CodecError, RawStorageValue, StreamCreate, StreamDetails,
    StreamMethod, StreamUpdate, H256,
};
use chainstream_rpc::{JsonRpcRequest, JsonRpcResponse, RpcId, RpcTransport, TransportError};

// ─── Helpers ──────────────────────────────────────────────────────────────────

const ALICE_SS58: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
const BOB_SS58: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

fn config() -> ClientConfig {
    ClientConfig {
        ss58_format: 42,
        ..Default::default()
    }
}

fn streams() -> StorageMap {
    StorageMap::streams(&config().pallet)
}

fn account(ss58: &str) -> AccountId32 {
    from_ss58(ss58).unwrap().0
}

fn details(revoked: bool) -> StreamDetails {
    StreamDetails {
        stream_hash: H256::repeat_byte(0x5a),
        controller: account(ALICE_SS58),
        holder: Some(account(BOB_SS58)),
        schema: Some(b"schema:cord:kyc".to_vec()),
        link: Some(b"stream:cord:parent".to_vec()),
        revoked,
    }
}

fn context_with(store: Arc<MemoryStore>) -> ChainContext {
    let conn = Connection::from_config(&config(), store);
    ChainContext::new(Arc::new(StaticConnection::new(conn)))
}

fn seeded() -> (Arc<MemoryStore>, ChainContext) {
    let store = Arc::new(MemoryStore::new());
    store.insert(&streams(), "stream:cord:s1", details(false).encode());
    store.insert(&streams(), "stream:cord:s2", details(true).encode());
    let ctx = context_with(store.clone());
    (store, ctx)
}

// ─── Reads ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn query_missing_stream_is_none() {
    let (_, ctx) = seeded();
    assert_eq!(stream::query(&ctx, "nope").await.unwrap(), None);
    assert!(!stream::exists(&ctx, "nope").await.unwrap());
    assert_eq!(stream::is_revoked(&ctx, "nope").await.unwrap(), None);
}

#[tokio::test]
async fn query_returns_normalized_record() {
    let (_, ctx) = seeded();
    let record = stream::query(&ctx, "s1").await.unwrap().unwrap();

    assert_eq!(record.stream_id.as_str(), "stream:cord:s1");
    assert_eq!(record.stream_id.raw(), "s1");
    assert_eq!(record.stream_hash, format!("0x{}", "5a".repeat(32)));
    assert_eq!(record.controller, ALICE_SS58);
    assert_eq!(record.holder.as_deref(), Some(BOB_SS58));
    assert_eq!(record.schema_id.as_deref(), Some("schema:cord:kyc"));
    assert_eq!(record.link_id.as_deref(), Some("stream:cord:parent"));
    assert!(!record.revoked);
}

#[tokio::test]
async fn revocation_flag_is_exposed() {
    let (_, ctx) = seeded();
    assert_eq!(stream::is_revoked(&ctx, "s2").await.unwrap(), Some(true));
    assert_eq!(stream::is_revoked(&ctx, "s1").await.unwrap(), Some(false));
}

#[tokio::test]
async fn get_owner_projects_controller() {
    let (_, ctx) = seeded();
    assert_eq!(stream::get_owner(&ctx, "s1").await.unwrap(), ALICE_SS58);
}

#[tokio::test]
async fn get_owner_of_missing_stream_is_not_found() {
    let (_, ctx) = seeded();
    let err = stream::get_owner(&ctx, "ghost").await.unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert_eq!(err.to_string(), "Stream not found: stream:cord:ghost");
}

#[tokio::test]
async fn records_reflect_current_store_state() {
    let (store, ctx) = seeded();
    assert!(stream::exists(&ctx, "s1").await.unwrap());
    store.remove(&streams(), "stream:cord:s1");
    assert!(!stream::exists(&ctx, "s1").await.unwrap());
}

#[tokio::test]
async fn runtime_type_drift_is_a_protocol_defect() {
    let (store, ctx) = seeded();
    store.set_declared_type(&streams(), "Option<PalletStreamStreamsStreamDetailsV2>");
    let err = stream::query(&ctx, "s1").await.unwrap_err();
    assert!(err.is_protocol_defect(), "{err}");
}

#[tokio::test]
async fn malformed_payload_is_a_protocol_defect() {
    let store = Arc::new(MemoryStore::new());
    store.insert(&streams(), "stream:cord:bad", vec![1, 2, 3]);
    let err = stream::query(&context_with(store), "bad").await.unwrap_err();
    assert!(err.is_protocol_defect(), "{err}");
}

struct DownStore;

#[async_trait]
impl StoreReader for DownStore {
    async fn read(&self, _: &StorageMap, _: &str) -> Result<RawStorageValue, TransportError> {
        Err(TransportError::Http("connection refused".into()))
    }
}

#[tokio::test]
async fn transport_failures_pass_through() {
    let conn = Connection::from_config(&config(), Arc::new(DownStore));
    let ctx = ChainContext::new(Arc::new(StaticConnection::new(conn)));
    let err = stream::query(&ctx, "s1").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(TransportError::Http(_))), "{err}");
}

#[tokio::test]
async fn concurrent_queries_share_one_context() {
    let (_, ctx) = seeded();
    let ids = ["s1", "s2", "s3"];
    let results = futures::future::join_all(ids.iter().map(|id| stream::query(&ctx, id))).await;
    let found: Vec<bool> = results.into_iter().map(|r| r.unwrap().is_some()).collect();
    assert_eq!(found, vec![true, true, false]);
}

// ─── Against a node ───────────────────────────────────────────────────────────

struct Details;

impl TypeInfo for Details {
    type Identity = Self;

    fn type_info() -> Type {
        Type::builder()
            .path(Path::new("StreamDetails", "pallet_stream::streams"))
            .composite(Fields::named().field(|f| f.ty::<bool>().name("revoked").type_name("bool")))
    }
}

struct StreamEntryV2;

impl TypeInfo for StreamEntryV2 {
    type Identity = Self;

    fn type_info() -> Type {
        Type::builder()
            .path(Path::new("StreamEntry", "pallet_stream::streams"))
            .composite(Fields::named().field(|f| f.ty::<u32>().name("version").type_name("u32")))
    }
}

fn runtime_metadata(value: MetaType) -> Vec<u8> {
    let streams = StorageEntryMetadata {
        name: "Streams",
        modifier: StorageEntryModifier::Optional,
        ty: StorageEntryType::Map {
            hashers: vec![StorageHasher::Blake2_128Concat],
            key: meta_type::<Vec<u8>>(),
            value,
        },
        default: vec![0],
        docs: vec![],
    };
    let pallet = PalletMetadata {
        name: "Stream",
        storage: Some(PalletStorageMetadata {
            prefix: "Stream",
            entries: vec![streams],
        }),
        calls: None,
        event: None,
        constants: vec![],
        error: None,
        index: 33,
    };
    let extrinsic = ExtrinsicMetadata {
        ty: meta_type::<()>(),
        version: 4,
        signed_extensions: vec![],
    };
    RuntimeMetadataPrefixed::from(RuntimeMetadataV14::new(
        vec![pallet],
        extrinsic,
        meta_type::<()>(),
    ))
    .encode()
}

/// Serves fixed metadata and one stored record for every key.
struct Node {
    metadata: Vec<u8>,
    record: Vec<u8>,
}

#[async_trait]
impl RpcTransport for Node {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let bytes = match req.method.as_str() {
            "state_getMetadata" => &self.metadata,
            _ => &self.record,
        };
        Ok(JsonRpcResponse {
            jsonrpc: "2.0".into(),
            id: RpcId::Number(1),
            result: Some(Value::String(format!("0x{}", hex::encode(bytes)))),
            error: None,
        })
    }

    fn url(&self) -> &str {
        "node://"
    }
}

fn node_context(value: MetaType) -> ChainContext {
    let node = Node {
        metadata: runtime_metadata(value),
        record: details(false).encode(),
    };
    let store = Arc::new(RpcStoreReader::new(Arc::new(node)));
    let conn = Connection::from_config(&config(), store);
    ChainContext::new(Arc::new(StaticConnection::new(conn)))
}

#[tokio::test]
async fn node_declaring_the_known_type_decodes() {
    let ctx = node_context(meta_type::<Details>());
    let record = stream::query(&ctx, "s1").await.unwrap().unwrap();
    assert_eq!(record.controller, ALICE_SS58);
}

#[tokio::test]
async fn node_declaring_another_type_is_a_type_mismatch() {
    let ctx = node_context(meta_type::<StreamEntryV2>());
    let err = stream::query(&ctx, "s1").await.unwrap_err();
    assert!(err.is_protocol_defect(), "{err}");
    match err {
        ClientError::Codec(CodecError::TypeMismatch { got, .. }) => {
            assert_eq!(got, "Option<PalletStreamStreamsStreamEntry>");
        }
        other => panic!("expected a type mismatch, got {other}"),
    }
}

// ─── Writes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_builds_stream_call() {
    let (_, ctx) = seeded();
    let with_link = stream::create(
        &ctx,
        &StreamCreate {
            creator: ALICE_SS58.into(),
            stream_hash: format!("0x{}", "01".repeat(32)),
            holder: Some(BOB_SS58.into()),
            schema_id: "kyc".into(),
            link_id: Some("parent".into()),
            signature: "0xaabb".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(with_link.method, StreamMethod::Create);
    assert_eq!(with_link.pallet, "Stream");

    let without_link = stream::create(
        &ctx,
        &StreamCreate {
            creator: ALICE_SS58.into(),
            stream_hash: format!("0x{}", "01".repeat(32)),
            holder: Some(BOB_SS58.into()),
            schema_id: "kyc".into(),
            link_id: None,
            signature: "0xaabb".into(),
        },
    )
    .await
    .unwrap();

    let link = b"stream:cord:parent".to_vec();
    assert_eq!(
        with_link.call_data.len(),
        without_link.call_data.len() + link.encode().len()
    );
}

#[tokio::test]
async fn update_and_status_build_calls() {
    let (_, ctx) = seeded();
    let update = stream::update(
        &ctx,
        &StreamUpdate {
            stream_id: "s1".into(),
            stream_hash: format!("0x{}", "02".repeat(32)),
            signature: "0x01".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(update.method, StreamMethod::Update);

    let status = stream::set_status(&ctx, "s1", true, &format!("0x{}", "03".repeat(32)), "0x02")
        .await
        .unwrap();
    assert_eq!(status.method, StreamMethod::SetStatus);
    assert_eq!(status.call_data[1], config().pallet.set_status_call);
}

#[tokio::test]
async fn unencodable_write_is_rejected_before_submission() {
    let (_, ctx) = seeded();
    let err = stream::set_status(&ctx, "s1", true, "not-hex", "0x02")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Codec(_)));
    assert!(!err.is_protocol_defect());
}

#[tokio::test]
async fn offline_context_builds_calls_without_a_node() {
    let ctx = ChainContext::offline(&config());
    let tx = stream::set_status(&ctx, "s1", false, &format!("0x{}", "04".repeat(32)), "0x01")
        .await
        .unwrap();
    assert_eq!(tx.method, StreamMethod::SetStatus);
    assert_eq!(tx.call_data[0], config().pallet.pallet_index);
    assert_eq!(stream::query(&ctx, "s1").await.unwrap(), None);
}
