//! Namespaced identifiers.
//!
//! Storage keys and cross-references on chain always use the canonical
//! form `prefix + raw`. Streams and schemas live in separate namespaces.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CodecError;

/// Namespace tag for stream identifiers.
pub const STREAM_PREFIX: &str = "stream:cord:";

/// Namespace tag for schema identifiers.
pub const SCHEMA_PREFIX: &str = "schema:cord:";

/// Apply a namespace prefix to a raw identifier.
pub fn canonicalize(raw: &str, prefix: &str) -> String {
    format!("{prefix}{raw}")
}

/// Decode a `0x`-hex byte string into a readable identifier.
///
/// `""` and `"0x"` both decode to the empty string. Invalid UTF-8 is
/// replaced rather than rejected; the bytes come from chain state we
/// don't control.
pub fn hex_to_identifier(hex_str: &str) -> Result<String, CodecError> {
    let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    if digits.is_empty() {
        return Ok(String::new());
    }
    let bytes = hex::decode(digits)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// A stream identifier in canonical (prefixed) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(String);

impl StreamId {
    /// Canonicalize a raw stream identifier.
    pub fn from_raw(raw: &str) -> Self {
        Self(canonicalize(raw, STREAM_PREFIX))
    }

    /// Wrap a string that is already canonical.
    /// Returns `None` if it does not carry the stream prefix.
    pub fn from_canonical(canonical: impl Into<String>) -> Option<Self> {
        let canonical = canonical.into();
        canonical
            .starts_with(STREAM_PREFIX)
            .then_some(Self(canonical))
    }

    /// The canonical string, used as the storage key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier without its namespace prefix.
    pub fn raw(&self) -> &str {
        self.0.strip_prefix(STREAM_PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StreamId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
