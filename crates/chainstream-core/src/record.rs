//! The caller-facing stream record.

use serde::{Deserialize, Serialize};

use crate::identifier::StreamId;

/// A normalized snapshot of an anchored stream, as of the query that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRecord {
    /// The canonical id the record was queried with.
    pub stream_id: StreamId,
    /// Content hash, `0x`-hex.
    pub stream_hash: String,
    /// SS58 address of the account allowed to change the record's status.
    pub controller: String,
    pub holder: Option<String>,
    pub schema_id: Option<String>,
    pub link_id: Option<String>,
    pub revoked: bool,
}

/// The single absence test shared by every optional field: an empty
/// rendering means "not set".
pub(crate) fn falsy_to_none(rendered: String) -> Option<String> {
    if rendered.is_empty() {
        None
    } else {
        Some(rendered)
    }
}
