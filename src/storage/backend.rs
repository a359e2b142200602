//! Storage Backend Abstraction
//!
//! The record store does not own durability. It writes through a backend - an
//! embedded ordered key-value library - and treats it as an abstract
//! collaborator exposing get/put/delete/scan-prefix. Each backend operation
//! is individually atomic and completes in bounded time; everything above
//! (composite keys, metadata envelopes, expiration, versioning) is layered on
//! by the store.
//!
//! `MemoryBackend` is the implementation shipped with the crate: an ordered
//! in-memory map behind an `RwLock`. It is what the tests and benches run
//! against, and it is good enough for embedding the store into a process that
//! does not need persistence across restarts.

use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::RwLock;
use thiserror::Error;

/// An I/O failure in the storage backend.
///
/// Backend errors bubble up through the store unchanged; the store never
/// retries.
#[derive(Debug, Error)]
#[error("backend error: {message}")]
pub struct BackendError {
    /// Human-readable failure description
    message: String,
    /// Underlying I/O error, when one exists
    #[source]
    source: Option<std::io::Error>,
}

impl BackendError {
    /// Creates a backend error from a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a backend error wrapping an I/O error.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self {
            message: message.into(),
            source: Some(source),
        }
    }
}

/// The embedded storage engine the record store writes through.
///
/// Implementations must guarantee:
///
/// - each operation is individually atomic and durable on return,
/// - `scan_prefix` yields pairs in the backend's natural key order, and that
///   order is stable for a given store state.
///
/// Keys are opaque byte strings; the store is responsible for encoding
/// `(space, key)` composites and metadata envelopes on top.
pub trait StorageBackend: Send + Sync + 'static {
    /// Reads the payload stored at `full_key`, or `None` if absent.
    fn fetch(&self, full_key: &[u8]) -> Result<Option<Bytes>, BackendError>;

    /// Writes `payload` at `full_key`, replacing any previous payload.
    fn store(&self, full_key: &[u8], payload: Bytes) -> Result<(), BackendError>;

    /// Removes the payload at `full_key`.
    ///
    /// # Returns
    ///
    /// Returns `true` if a payload was present and removed.
    fn remove(&self, full_key: &[u8]) -> Result<bool, BackendError>;

    /// Returns every `(full_key, payload)` pair whose key starts with
    /// `prefix`, in the backend's key order.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Bytes, Bytes)>, BackendError>;
}

/// An ordered in-memory backend.
///
/// Backed by a `BTreeMap` behind an `RwLock`: multiple concurrent readers,
/// exclusive writers, lexicographic key order for prefix scans.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: RwLock<BTreeMap<Vec<u8>, Bytes>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored payloads, expired records included.
    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryBackend {
    fn fetch(&self, full_key: &[u8]) -> Result<Option<Bytes>, BackendError> {
        let data = self.data.read().unwrap();
        Ok(data.get(full_key).cloned())
    }

    fn store(&self, full_key: &[u8], payload: Bytes) -> Result<(), BackendError> {
        let mut data = self.data.write().unwrap();
        data.insert(full_key.to_vec(), payload);
        Ok(())
    }

    fn remove(&self, full_key: &[u8]) -> Result<bool, BackendError> {
        let mut data = self.data.write().unwrap();
        Ok(data.remove(full_key).is_some())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Bytes, Bytes)>, BackendError> {
        let data = self.data.read().unwrap();
        let matches = data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (Bytes::from(k.clone()), v.clone()))
            .collect();
        Ok(matches)
    }
}
