//! Composite Keys and the Persisted Record Envelope
//!
//! The backend stores flat byte-string keys, so the store has to encode the
//! `(space, key)` composite into one backend key and the value-plus-metadata
//! record into one self-contained payload.
//!
//! ## Key layout
//!
//! ```text
//! <space bytes> 0x00 <key bytes>
//! ```
//!
//! NUL is rejected in space and key names, so the encoding is unambiguous
//! and `<space> 0x00` is a precise scan prefix for "every key in this
//! space". Keys in one space sort by key name; spaces sort relative to each
//! other by space name.
//!
//! ## Envelope layout
//!
//! A JSON document carrying the value (base64 of the payload bytes - the
//! canonical storage encoding for text transport) and the record metadata:
//!
//! ```json
//! {"value":"aGVsbG8=","created_at":1726000000000,"modified_at":1726000012345,"expired_at":1726099999999,"version":3}
//! ```
//!
//! `expired_at` is omitted entirely when the record has no expiration.
//! Decoding ignores unknown fields, and any field added to the envelope
//! later must carry `#[serde(default)]`, so payloads written by an older
//! build stay readable.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Separator byte between the space and key components of a backend key.
pub const KEY_SEPARATOR: u8 = 0x00;

/// Encodes `(space, key)` into a single backend key.
pub fn full_key(space: &str, key: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(space.len() + 1 + key.len());
    buf.extend_from_slice(space.as_bytes());
    buf.push(KEY_SEPARATOR);
    buf.extend_from_slice(key.as_bytes());
    buf
}

/// The scan prefix covering every key in `space`.
pub fn space_prefix(space: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(space.len() + 1);
    buf.extend_from_slice(space.as_bytes());
    buf.push(KEY_SEPARATOR);
    buf
}

/// Splits a backend key back into its `(space, key)` components.
///
/// Returns `None` for keys that do not follow the composite layout or are
/// not valid UTF-8. Such keys were not written by this store.
pub fn split_full_key(full: &[u8]) -> Option<(&str, &str)> {
    let sep = full.iter().position(|&b| b == KEY_SEPARATOR)?;
    let space = std::str::from_utf8(&full[..sep]).ok()?;
    let key = std::str::from_utf8(&full[sep + 1..]).ok()?;
    if space.is_empty() || key.is_empty() {
        return None;
    }
    Some((space, key))
}

/// The persisted representation of one record.
///
/// This is a storage-internal type; the store hands callers [`Record`] and
/// [`RecordMeta`] instead.
///
/// [`Record`]: crate::storage::Record
/// [`RecordMeta`]: crate::storage::RecordMeta
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEnvelope {
    /// Payload bytes, base64-encoded
    pub value: String,
    /// Creation instant, epoch milliseconds; immutable across updates
    pub created_at: i64,
    /// Last write instant, epoch milliseconds
    pub modified_at: i64,
    /// Absolute expiration instant, epoch milliseconds; absent = never
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<i64>,
    /// Write counter, starts at 1, +1 per successful write
    pub version: u64,
}

impl RecordEnvelope {
    /// Builds a fresh version-1 envelope.
    pub fn new(value: &[u8], now_ms: i64, expired_at: Option<i64>) -> Self {
        Self {
            value: BASE64.encode(value),
            created_at: now_ms,
            modified_at: now_ms,
            expired_at,
            version: 1,
        }
    }

    /// Builds the successor envelope for an in-place update.
    ///
    /// Keeps `created_at`, replaces the value and expiration, stamps
    /// `modified_at`, and bumps the version by exactly 1.
    pub fn updated(&self, value: &[u8], now_ms: i64, expired_at: Option<i64>) -> Self {
        Self {
            value: BASE64.encode(value),
            created_at: self.created_at,
            modified_at: now_ms,
            expired_at,
            version: self.version + 1,
        }
    }

    /// Checks whether this record is past its expiration instant.
    #[inline]
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expired_at.map(|exp| now_ms >= exp).unwrap_or(false)
    }

    /// Decodes the payload bytes out of the base64 storage form.
    pub fn decode_value(&self) -> Result<Bytes, base64::DecodeError> {
        Ok(Bytes::from(BASE64.decode(&self.value)?))
    }

    /// Serializes the envelope to its persisted JSON form.
    pub fn encode(&self) -> Bytes {
        // A struct of strings and integers cannot fail JSON serialization.
        Bytes::from(serde_json::to_vec(self).expect("envelope serialization"))
    }

    /// Deserializes an envelope from a persisted payload.
    pub fn decode(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}
