//! The Record Store
//!
//! This module implements the record lifecycle over a [`StorageBackend`]:
//! create, read, update, expire, delete, with consistent metadata semantics.
//!
//! ## Record semantics
//!
//! Every `(space, key)` maps to at most one live record. A record carries
//! its payload plus metadata: `created_at` (set once), `modified_at`
//! (stamped per write), optional `expired_at`, and a `version` counter that
//! starts at 1 and grows by exactly 1 per successful write. The version is
//! exposed so callers can detect concurrent modification; the store itself
//! always overwrites.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      RecordStore                            │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Lock 0  │ │ Lock 1  │ │ Lock 2  │ │ Lock N  │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! │                           │                                 │
//! │                           ▼                                 │
//! │                    StorageBackend                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutations are serialized per key, not globally: the composite key hashes
//! to one of 64 lock shards, and `put`, `delete`, and every expired-record
//! purge run their read-modify-write inside that shard's mutex. Writes to
//! the same key are linearized; unrelated keys proceed concurrently. Reads
//! take no lock on the fast path and no snapshot across keys.
//!
//! ## Lazy Expiration
//!
//! Expiration is a state machine, not ad hoc deletion: Fresh (no
//! expiration) or Scheduled (future `expired_at`) records answer reads;
//! once `now >= expired_at` the record is Expired and the next touch by any
//! read, scan, or write path moves it to Deleted. All access paths share
//! one [`RecordStore::resolve_live_or_purge`] transition so the policy
//! lives in exactly one place. A write to an expired key restarts the
//! lifecycle at version 1.

use bytes::Bytes;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::error::StoreError;
use crate::storage::backend::StorageBackend;
use crate::storage::envelope::{
    full_key, space_prefix, split_full_key, RecordEnvelope, KEY_SEPARATOR,
};

/// Number of lock shards guarding per-key read-modify-write sections.
/// More shards = less contention between unrelated keys.
const NUM_LOCK_SHARDS: usize = 64;

/// Current wall-clock time as epoch milliseconds.
///
/// All record metadata and expiration instants use this timebase.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Metadata attached to every stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordMeta {
    /// Creation instant, epoch milliseconds; survives updates
    pub created_at: i64,
    /// Last successful write, epoch milliseconds
    pub modified_at: i64,
    /// Absolute expiration instant, epoch milliseconds; `None` = never
    pub expired_at: Option<i64>,
    /// Write counter, starts at 1
    pub version: u64,
}

/// A live record: payload plus metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The stored payload; may be empty
    pub value: Bytes,
    /// Record metadata
    pub meta: RecordMeta,
}

/// Operation counters, in the same spirit as a server INFO snapshot.
#[derive(Debug, Clone, Copy)]
pub struct StoreStats {
    /// Total `put` calls
    pub puts: u64,
    /// Total `get` calls
    pub gets: u64,
    /// Total `delete` calls
    pub deletes: u64,
    /// Expired records purged, lazily or by the sweeper
    pub purged_expired: u64,
}

/// Result of one eager sweep pass over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Records examined during the pass
    pub scanned: u64,
    /// Expired records removed during the pass
    pub purged: u64,
}

/// How a stored payload resolved against the expiration state machine.
enum Resolved {
    /// The record is live and may be returned to callers.
    Live(RecordEnvelope),
    /// The record was expired; this call removed it.
    Purged,
    /// The record disappeared under us (concurrent delete or purge).
    Absent,
}

/// The record store: a `(space, key) -> (value, metadata)` map layered over
/// an abstract storage backend.
///
/// # Thread Safety
///
/// Designed to be wrapped in an `Arc` and shared across request-handling
/// tasks. All operations are thread-safe; mutations to one key are
/// serialized through a per-key lock shard.
///
/// # Example
///
/// ```
/// use spacekv::storage::{MemoryBackend, RecordStore};
/// use bytes::Bytes;
///
/// let store = RecordStore::new(MemoryBackend::new());
///
/// let meta = store.put("tenant1", "cfg", Bytes::from("v1"), None).unwrap();
/// assert_eq!(meta.version, 1);
///
/// let record = store.get("tenant1", "cfg").unwrap();
/// assert_eq!(record.value, Bytes::from("v1"));
/// ```
pub struct RecordStore<B> {
    /// The storage engine this store writes through
    backend: B,

    /// Per-key lock shards for read-modify-write sections
    locks: Vec<Mutex<()>>,

    /// Statistics: total put operations
    put_count: AtomicU64,

    /// Statistics: total get operations
    get_count: AtomicU64,

    /// Statistics: total delete operations
    delete_count: AtomicU64,

    /// Statistics: expired records purged
    expired_count: AtomicU64,
}

impl<B> std::fmt::Debug for RecordStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("lock_shards", &self.locks.len())
            .field("puts", &self.put_count.load(Ordering::Relaxed))
            .field("gets", &self.get_count.load(Ordering::Relaxed))
            .field("deletes", &self.delete_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl<B: StorageBackend> RecordStore<B> {
    /// Creates a record store over the given backend.
    pub fn new(backend: B) -> Self {
        let locks = (0..NUM_LOCK_SHARDS).map(|_| Mutex::new(())).collect();

        Self {
            backend,
            locks,
            put_count: AtomicU64::new(0),
            get_count: AtomicU64::new(0),
            delete_count: AtomicU64::new(0),
            expired_count: AtomicU64::new(0),
        }
    }

    /// Borrows the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Determines which lock shard a composite key belongs to.
    #[inline]
    fn lock_index(&self, full_key: &[u8]) -> usize {
        let mut hasher = DefaultHasher::new();
        full_key.hash(&mut hasher);
        (hasher.finish() as usize) % NUM_LOCK_SHARDS
    }

    /// Gets the lock shard for a composite key.
    #[inline]
    fn lock_for(&self, full_key: &[u8]) -> &Mutex<()> {
        &self.locks[self.lock_index(full_key)]
    }

    /// Creates or updates the record at `(space, key)`.
    ///
    /// If no live record exists - the key is absent, or present but already
    /// expired - a fresh record is created at version 1 with
    /// `created_at = modified_at = now`. If a live record exists, its value
    /// is replaced, `modified_at` is stamped, the version grows by 1, and
    /// `expired_at` is overwritten with the given value. Passing `None`
    /// clears an existing expiration: omission means "no expiration", not
    /// "leave unchanged".
    ///
    /// `expired_at` may lie in the past; the record is then written already
    /// expired and the next read will report it absent. An empty `value` is
    /// legal and stores an empty payload.
    ///
    /// # Returns
    ///
    /// Returns the metadata of the record as written.
    pub fn put(
        &self,
        space: &str,
        key: &str,
        value: Bytes,
        expired_at: Option<i64>,
    ) -> Result<RecordMeta, StoreError> {
        validate_name("space", space)?;
        validate_name("key", key)?;
        self.put_count.fetch_add(1, Ordering::Relaxed);

        let full = full_key(space, key);
        let _guard = self.lock_for(&full).lock().unwrap();

        let now = now_millis();
        let previous = match self.backend.fetch(&full)? {
            Some(payload) => Some(decode_envelope(&full, &payload)?),
            None => None,
        };

        let envelope = match previous {
            Some(prev) if !prev.is_expired(now) => prev.updated(&value, now, expired_at),
            // Absent or expired: the lifecycle restarts at version 1.
            _ => RecordEnvelope::new(&value, now, expired_at),
        };

        self.backend.store(&full, envelope.encode())?;
        Ok(meta_of(&envelope))
    }

    /// Reads the record at `(space, key)`.
    ///
    /// Only live records are returned. A record past its expiration instant
    /// is purged as a side effect and reported as [`StoreError::NotFound`],
    /// indistinguishable from a key that never existed.
    pub fn get(&self, space: &str, key: &str) -> Result<Record, StoreError> {
        validate_name("space", space)?;
        validate_name("key", key)?;
        self.get_count.fetch_add(1, Ordering::Relaxed);

        let full = full_key(space, key);
        let payload = self
            .backend
            .fetch(&full)?
            .ok_or_else(|| StoreError::not_found(space, key))?;
        let envelope = decode_envelope(&full, &payload)?;

        match self.resolve_live_or_purge(&full, envelope)? {
            Resolved::Live(env) => {
                let value = env.decode_value().map_err(|e| StoreError::CorruptEnvelope {
                    full_key: printable_key(&full),
                    reason: e.to_string(),
                })?;
                Ok(Record {
                    value,
                    meta: meta_of(&env),
                })
            }
            Resolved::Purged | Resolved::Absent => Err(StoreError::not_found(space, key)),
        }
    }

    /// Removes the record at `(space, key)` unconditionally - live, expired,
    /// or undecodable payloads alike.
    ///
    /// Idempotent: deleting an absent key is not an error.
    ///
    /// # Returns
    ///
    /// Returns `true` if a record was present and removed.
    pub fn delete(&self, space: &str, key: &str) -> Result<bool, StoreError> {
        validate_name("space", space)?;
        validate_name("key", key)?;
        self.delete_count.fetch_add(1, Ordering::Relaxed);

        let full = full_key(space, key);
        let _guard = self.lock_for(&full).lock().unwrap();

        // No decode: a corrupt record must always stay deletable.
        Ok(self.backend.remove(&full)?)
    }

    /// Lists the live key names in `space`, in the backend's key order.
    ///
    /// Expired records encountered during the scan are purged, the same
    /// lazy-expiry behavior as [`RecordStore::get`].
    pub fn list_keys(&self, space: &str) -> Result<Vec<String>, StoreError> {
        validate_name("space", space)?;

        let prefix = space_prefix(space);
        let mut keys = Vec::new();
        for (full, payload) in self.backend.scan_prefix(&prefix)? {
            let envelope = decode_envelope(&full, &payload)?;
            if let Resolved::Live(_) = self.resolve_live_or_purge(&full, envelope)? {
                if let Some((_, key)) = split_full_key(&full) {
                    keys.push(key.to_string());
                }
            }
        }
        Ok(keys)
    }

    /// Counts the live keys in `space`, applying the same lazy-expiration
    /// filter as [`RecordStore::list_keys`].
    pub fn count_live_keys(&self, space: &str) -> Result<usize, StoreError> {
        Ok(self.list_keys(space)?.len())
    }

    /// Scans the whole store and removes every expired record.
    ///
    /// This is the eager counterpart to lazy expiration, called by the
    /// background sweeper. Lazy expiration alone never reclaims a record
    /// that is not accessed again.
    ///
    /// # Returns
    ///
    /// Returns how many records were scanned and how many were purged.
    pub fn purge_expired(&self) -> Result<SweepOutcome, StoreError> {
        let mut outcome = SweepOutcome::default();
        for (full, payload) in self.backend.scan_prefix(b"")? {
            outcome.scanned += 1;
            let envelope = decode_envelope(&full, &payload)?;
            if let Resolved::Purged = self.resolve_live_or_purge(&full, envelope)? {
                outcome.purged += 1;
            }
        }
        if outcome.purged > 0 {
            debug!(
                scanned = outcome.scanned,
                purged = outcome.purged,
                "Expired records purged"
            );
        }
        Ok(outcome)
    }

    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            puts: self.put_count.load(Ordering::Relaxed),
            gets: self.get_count.load(Ordering::Relaxed),
            deletes: self.delete_count.load(Ordering::Relaxed),
            purged_expired: self.expired_count.load(Ordering::Relaxed),
        }
    }

    /// The single Expired -> Deleted transition shared by every access path.
    ///
    /// The caller passes the envelope it already fetched. If it is live, it
    /// is returned as-is without locking. If it looks expired, the purge is
    /// performed under the per-key lock with a re-read, so a concurrent
    /// writer that just revived the key is never clobbered - the revived
    /// record is returned instead.
    fn resolve_live_or_purge(
        &self,
        full: &[u8],
        envelope: RecordEnvelope,
    ) -> Result<Resolved, StoreError> {
        if !envelope.is_expired(now_millis()) {
            return Ok(Resolved::Live(envelope));
        }

        let _guard = self.lock_for(full).lock().unwrap();
        let payload = match self.backend.fetch(full)? {
            Some(payload) => payload,
            None => return Ok(Resolved::Absent),
        };
        let current = decode_envelope(full, &payload)?;
        if !current.is_expired(now_millis()) {
            // Lost the race to a writer; the key is live again.
            return Ok(Resolved::Live(current));
        }

        self.backend.remove(full)?;
        self.expired_count.fetch_add(1, Ordering::Relaxed);
        debug!(key = %printable_key(full), "Purged expired record");
        Ok(Resolved::Purged)
    }

    /// Removes every record whose composite key lies in `space`'s prefix,
    /// each under its per-key lock. Shared by the space directory.
    pub(crate) fn remove_all_in_prefix(&self, prefix: &[u8]) -> Result<u64, StoreError> {
        let mut removed = 0u64;
        for (full, _) in self.backend.scan_prefix(prefix)? {
            let _guard = self.lock_for(&full).lock().unwrap();
            if self.backend.remove(&full)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Scans the whole store and hands each entry to `visit` after lazy
    /// expiration filtering. Shared by the space directory.
    pub(crate) fn for_each_live(
        &self,
        mut visit: impl FnMut(&str, &str),
    ) -> Result<(), StoreError> {
        for (full, payload) in self.backend.scan_prefix(b"")? {
            let envelope = decode_envelope(&full, &payload)?;
            if let Resolved::Live(_) = self.resolve_live_or_purge(&full, envelope)? {
                if let Some((space, key)) = split_full_key(&full) {
                    visit(space, key);
                }
            }
        }
        Ok(())
    }
}

/// Builds the caller-facing metadata view of an envelope.
fn meta_of(envelope: &RecordEnvelope) -> RecordMeta {
    RecordMeta {
        created_at: envelope.created_at,
        modified_at: envelope.modified_at,
        expired_at: envelope.expired_at,
        version: envelope.version,
    }
}

/// Decodes a persisted envelope, surfacing failures as storage-class errors.
fn decode_envelope(full: &[u8], payload: &[u8]) -> Result<RecordEnvelope, StoreError> {
    RecordEnvelope::decode(payload).map_err(|e| StoreError::CorruptEnvelope {
        full_key: printable_key(full),
        reason: e.to_string(),
    })
}

/// Printable `space/key` form of a composite key, for logs and errors.
fn printable_key(full: &[u8]) -> String {
    match split_full_key(full) {
        Some((space, key)) => format!("{}/{}", space, key),
        None => String::from_utf8_lossy(full).into_owned(),
    }
}

/// Rejects names the store cannot address.
pub(crate) fn validate_name(what: &'static str, name: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::InvalidArgument {
            what,
            reason: "must not be empty".to_string(),
        });
    }
    if name.bytes().any(|b| b == KEY_SEPARATOR) {
        return Err(StoreError::InvalidArgument {
            what,
            reason: "must not contain NUL".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::MemoryBackend;
    use std::sync::Arc;

    fn store() -> RecordStore<MemoryBackend> {
        RecordStore::new(MemoryBackend::new())
    }

    #[test]
    fn test_get_never_written() {
        let store = store();
        let err = store.get("tenant1", "missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_put_and_get() {
        let store = store();

        let meta = store
            .put("tenant1", "cfg", Bytes::from("v1"), None)
            .unwrap();
        assert_eq!(meta.version, 1);
        assert_eq!(meta.created_at, meta.modified_at);

        let record = store.get("tenant1", "cfg").unwrap();
        assert_eq!(record.value, Bytes::from("v1"));
        assert_eq!(record.meta.version, 1);
        assert_eq!(record.meta.expired_at, None);
    }

    #[test]
    fn test_update_bumps_version_and_keeps_created_at() {
        let store = store();

        let first = store
            .put("tenant1", "cfg", Bytes::from("v1"), None)
            .unwrap();
        let second = store
            .put("tenant1", "cfg", Bytes::from("v2"), None)
            .unwrap();

        assert_eq!(second.version, 2);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.modified_at >= first.modified_at);

        let record = store.get("tenant1", "cfg").unwrap();
        assert_eq!(record.value, Bytes::from("v2"));
    }

    #[test]
    fn test_update_clears_expiration_when_omitted() {
        let store = store();
        let later = now_millis() + 60_000;

        store
            .put("tenant1", "cfg", Bytes::from("v1"), Some(later))
            .unwrap();
        let meta = store
            .put("tenant1", "cfg", Bytes::from("v2"), None)
            .unwrap();

        // Omission means "no expiration", not "unchanged"
        assert_eq!(meta.expired_at, None);
        assert_eq!(meta.version, 2);
    }

    #[test]
    fn test_past_expiration_is_immediately_expired() {
        let store = store();

        store
            .put("tenant1", "cfg", Bytes::from("v"), Some(now_millis() - 1_000))
            .unwrap();
        assert!(store.get("tenant1", "cfg").unwrap_err().is_not_found());

        // The lazy purge removed the stale payload
        assert!(store.backend().is_empty());
    }

    #[test]
    fn test_expired_at_zero_is_a_past_instant() {
        let store = store();

        store
            .put("tenant1", "cfg", Bytes::from("v"), Some(0))
            .unwrap();
        assert!(store.get("tenant1", "cfg").unwrap_err().is_not_found());
    }

    #[test]
    fn test_write_to_expired_key_restarts_at_version_one() {
        let store = store();

        let dying = store
            .put("tenant1", "cfg", Bytes::from("old"), Some(now_millis() - 1))
            .unwrap();
        assert_eq!(dying.version, 1);

        let reborn = store
            .put("tenant1", "cfg", Bytes::from("new"), None)
            .unwrap();
        assert_eq!(reborn.version, 1);

        let record = store.get("tenant1", "cfg").unwrap();
        assert_eq!(record.value, Bytes::from("new"));
    }

    #[test]
    fn test_future_expiration_stays_live() {
        let store = store();
        let later = now_millis() + 60_000;

        store
            .put("tenant1", "cfg", Bytes::from("v"), Some(later))
            .unwrap();
        let record = store.get("tenant1", "cfg").unwrap();
        assert_eq!(record.meta.expired_at, Some(later));
    }

    #[test]
    fn test_empty_value_is_legal() {
        let store = store();

        store.put("tenant1", "marker", Bytes::new(), None).unwrap();
        let record = store.get("tenant1", "marker").unwrap();
        assert!(record.value.is_empty());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = store();

        assert!(!store.delete("tenant1", "cfg").unwrap());

        store.put("tenant1", "cfg", Bytes::from("v"), None).unwrap();
        assert!(store.delete("tenant1", "cfg").unwrap());
        assert!(!store.delete("tenant1", "cfg").unwrap());
        assert!(store.get("tenant1", "cfg").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_removes_expired_records_too() {
        let store = store();

        store
            .put("tenant1", "cfg", Bytes::from("v"), Some(now_millis() - 1))
            .unwrap();
        // Still physically present (no read has purged it yet)
        assert!(store.delete("tenant1", "cfg").unwrap());
    }

    #[test]
    fn test_empty_names_are_invalid() {
        let store = store();

        assert!(matches!(
            store.put("", "k", Bytes::new(), None),
            Err(StoreError::InvalidArgument { what: "space", .. })
        ));
        assert!(matches!(
            store.put("s", "", Bytes::new(), None),
            Err(StoreError::InvalidArgument { what: "key", .. })
        ));
        assert!(matches!(
            store.get("", "k"),
            Err(StoreError::InvalidArgument { .. })
        ));
        assert!(matches!(
            store.list_keys(""),
            Err(StoreError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_separator_in_names_is_invalid() {
        let store = store();

        assert!(matches!(
            store.put("bad\0space", "k", Bytes::new(), None),
            Err(StoreError::InvalidArgument { what: "space", .. })
        ));
        assert!(matches!(
            store.put("s", "bad\0key", Bytes::new(), None),
            Err(StoreError::InvalidArgument { what: "key", .. })
        ));
    }

    #[test]
    fn test_list_keys_filters_and_purges_expired() {
        let store = store();

        store.put("s", "alive", Bytes::from("1"), None).unwrap();
        store
            .put("s", "dead", Bytes::from("2"), Some(now_millis() - 1))
            .unwrap();
        store.put("other", "x", Bytes::from("3"), None).unwrap();

        let keys = store.list_keys("s").unwrap();
        assert_eq!(keys, vec!["alive".to_string()]);

        // The expired record was opportunistically deleted by the scan
        assert_eq!(store.backend().len(), 2);
        assert_eq!(store.count_live_keys("s").unwrap(), 1);
    }

    #[test]
    fn test_list_keys_order_is_stable() {
        let store = store();

        store.put("s", "b", Bytes::from("1"), None).unwrap();
        store.put("s", "a", Bytes::from("2"), None).unwrap();
        store.put("s", "c", Bytes::from("3"), None).unwrap();

        let first = store.list_keys("s").unwrap();
        let second = store.list_keys("s").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_similar_space_names_do_not_alias() {
        let store = store();

        store.put("a", "k", Bytes::from("1"), None).unwrap();
        store.put("ab", "k", Bytes::from("2"), None).unwrap();

        assert_eq!(store.list_keys("a").unwrap(), vec!["k"]);
        assert_eq!(store.get("a", "k").unwrap().value, Bytes::from("1"));
        assert_eq!(store.get("ab", "k").unwrap().value, Bytes::from("2"));
    }

    #[test]
    fn test_purge_expired_reports_counts() {
        let store = store();

        store.put("s", "live", Bytes::from("1"), None).unwrap();
        store
            .put("s", "dead1", Bytes::from("2"), Some(now_millis() - 1))
            .unwrap();
        store
            .put("s", "dead2", Bytes::from("3"), Some(0))
            .unwrap();

        let outcome = store.purge_expired().unwrap();
        assert_eq!(outcome.scanned, 3);
        assert_eq!(outcome.purged, 2);
        assert_eq!(store.backend().len(), 1);

        // Second pass finds nothing left to purge
        let outcome = store.purge_expired().unwrap();
        assert_eq!(outcome.purged, 0);
    }

    #[test]
    fn test_corrupt_envelope_is_loud() {
        let store = store();
        let full = full_key("s", "bad");
        store
            .backend()
            .store(&full, Bytes::from("not an envelope"))
            .unwrap();

        assert!(matches!(
            store.get("s", "bad"),
            Err(StoreError::CorruptEnvelope { .. })
        ));
        assert!(matches!(
            store.list_keys("s"),
            Err(StoreError::CorruptEnvelope { .. })
        ));

        // Delete never decodes, so a poisoned key can always be cleared
        assert!(store.delete("s", "bad").unwrap());
        assert!(store.list_keys("s").unwrap().is_empty());
    }

    #[test]
    fn test_stats_track_operations() {
        let store = store();

        store.put("s", "k", Bytes::from("v"), None).unwrap();
        let _ = store.get("s", "k");
        let _ = store.get("s", "missing");
        store.delete("s", "k").unwrap();

        let stats = store.stats();
        assert_eq!(stats.puts, 1);
        assert_eq!(stats.gets, 2);
        assert_eq!(stats.deletes, 1);
    }

    #[test]
    fn test_concurrent_puts_serialize_version_increments() {
        use std::thread;

        let store = Arc::new(store());
        const WRITERS: usize = 16;

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .put("s", "contended", Bytes::from(format!("w{}", i)), None)
                        .unwrap()
                })
            })
            .collect();

        let mut versions: Vec<u64> = handles
            .into_iter()
            .map(|h| h.join().unwrap().version)
            .collect();
        versions.sort_unstable();

        // Exactly N increments: every writer observed a distinct prior version
        let expected: Vec<u64> = (1..=WRITERS as u64).collect();
        assert_eq!(versions, expected);
        assert_eq!(
            store.get("s", "contended").unwrap().meta.version,
            WRITERS as u64
        );
    }

    #[test]
    fn test_concurrent_distinct_keys_proceed_independently() {
        use std::thread;

        let store = Arc::new(store());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..50 {
                        let key = format!("key-{}-{}", t, i);
                        store
                            .put("s", &key, Bytes::from("value"), None)
                            .unwrap();
                        store.get("s", &key).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.count_live_keys("s").unwrap(), 400);
    }
}
