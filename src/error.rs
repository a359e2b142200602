//! Error Types for the Record Store
//!
//! The store distinguishes four failure classes, because the transport layer
//! sitting above it has to map them to different responses:
//!
//! - `NotFound`: the record is absent or expired. The two cases are never
//!   distinguished - an expired record answers exactly like one that never
//!   existed.
//! - `InvalidArgument`: a space or key name the store refuses to address.
//! - `Backend`: an I/O failure in the underlying storage engine, propagated
//!   unchanged. The store performs no retries; retry policy belongs to the
//!   transport layer.
//! - `CorruptEnvelope`: a persisted record that can no longer be decoded.
//!   This is a storage-class failure and is never silently dropped - data
//!   loss must stay visible to the caller.

use thiserror::Error;

use crate::storage::backend::BackendError;

/// Errors returned by record store and space directory operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record is absent, or present but past its expiration instant.
    #[error("record not found: {space}/{key}")]
    NotFound {
        /// Space component of the requested record
        space: String,
        /// Key component of the requested record
        key: String,
    },

    /// A space or key name the store cannot address.
    ///
    /// Names must be non-empty and must not contain the composite-key
    /// separator byte.
    #[error("invalid {what}: {reason}")]
    InvalidArgument {
        /// Which argument was rejected ("space" or "key")
        what: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// The underlying storage engine failed.
    #[error("storage backend failure")]
    Backend(#[from] BackendError),

    /// A persisted record envelope could not be decoded.
    #[error("corrupt record envelope at {full_key}: {reason}")]
    CorruptEnvelope {
        /// Printable form of the backend key holding the bad payload
        full_key: String,
        /// Decoder diagnostic
        reason: String,
    },
}

impl StoreError {
    /// Returns `true` if this error means "record absent", as opposed to
    /// "operation failed".
    ///
    /// The transport layer uses this to map absence and failure to distinct
    /// responses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub(crate) fn not_found(space: &str, key: &str) -> Self {
        StoreError::NotFound {
            space: space.to_string(),
            key: key.to_string(),
        }
    }
}
