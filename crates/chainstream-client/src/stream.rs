//! Stream pallet operations.
//!
//! Writes return an unsigned [`Extrinsic`]; reads return normalized
//! [`StreamRecord`]s. Ids are passed raw and canonicalized here.

use tracing::Instrument;

use chainstream_core::{
    StreamCall, StreamCreate, StreamId, StreamRecord, StreamRecordCodec, StreamUpdate,
};

use crate::context::ChainContext;
use crate::error::ClientError;
use crate::extrinsic::Extrinsic;

async fn build(
    ctx: &ChainContext,
    make: impl FnOnce(&StreamRecordCodec) -> StreamCall,
) -> Result<Extrinsic, ClientError> {
    let conn = ctx.connection().await?;
    let call = make(conn.codec());
    let tx = conn.tx().build(call)?;
    tracing::debug!(
        pallet = %tx.pallet,
        method = %tx.method,
        call_len = tx.call_data.len(),
        "built extrinsic"
    );
    Ok(tx)
}

/// Build the call that anchors a new stream.
pub async fn create(ctx: &ChainContext, stream: &StreamCreate) -> Result<Extrinsic, ClientError> {
    build(ctx, |codec| codec.build_create_args(stream))
        .instrument(ctx.span().clone())
        .await
}

/// Build the call that replaces a stream's content hash.
pub async fn update(ctx: &ChainContext, stream: &StreamUpdate) -> Result<Extrinsic, ClientError> {
    build(ctx, |codec| codec.build_update_args(stream))
        .instrument(ctx.span().clone())
        .await
}

/// Build the call that revokes (`status = true`) or restores a stream.
/// Whether the signer may do so is decided by the runtime.
pub async fn set_status(
    ctx: &ChainContext,
    stream_id: &str,
    status: bool,
    tx_hash: &str,
    tx_signature: &str,
) -> Result<Extrinsic, ClientError> {
    build(ctx, |codec| {
        codec.build_status_args(stream_id, status, tx_hash, tx_signature)
    })
    .instrument(ctx.span().clone())
    .await
}

async fn fetch(ctx: &ChainContext, id: &StreamId) -> Result<Option<StreamRecord>, ClientError> {
    let conn = ctx.connection().await?;
    let raw = conn.store().read(conn.streams(), id.as_str()).await?;

    match conn.codec().decode(&raw, id) {
        Ok(record) => {
            tracing::debug!(stream_id = %id, found = record.is_some(), "queried stream");
            Ok(record)
        }
        Err(e) => {
            if e.is_protocol_defect() {
                tracing::error!(
                    stream_id = %id,
                    type_name = %raw.type_name,
                    error = %e,
                    "stream record does not match the runtime's wire format"
                );
            }
            Err(e.into())
        }
    }
}

/// Fetch a stream. `Ok(None)` when the chain holds no record for `stream_id`.
pub async fn query(ctx: &ChainContext, stream_id: &str) -> Result<Option<StreamRecord>, ClientError> {
    let id = StreamId::from_raw(stream_id);
    fetch(ctx, &id).instrument(ctx.span().clone()).await
}

/// Controller of a stream. A missing stream is `ClientError::NotFound`.
pub async fn get_owner(ctx: &ChainContext, stream_id: &str) -> Result<String, ClientError> {
    match query(ctx, stream_id).await? {
        Some(record) => Ok(record.controller),
        None => Err(ClientError::NotFound {
            stream_id: StreamId::from_raw(stream_id),
        }),
    }
}

/// Revocation flag, or `None` if the stream does not exist.
pub async fn is_revoked(ctx: &ChainContext, stream_id: &str) -> Result<Option<bool>, ClientError> {
    Ok(query(ctx, stream_id).await?.map(|r| r.revoked))
}

pub async fn exists(ctx: &ChainContext, stream_id: &str) -> Result<bool, ClientError> {
    Ok(query(ctx, stream_id).await?.is_some())
}
