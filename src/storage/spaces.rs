//! The Space Directory
//!
//! Spaces are derived, not stored: a space exists iff at least one live
//! record carries it as the space component of its key. There is no
//! persisted space entity and therefore no second source of truth -
//! deleting the last live record in a space removes the space from
//! enumeration by itself.
//!
//! The price is that enumeration costs a scan proportional to the total
//! record count. Callers needing cheap enumeration can maintain their own
//! index; correctness never depends on one.
//!
//! Creating a space under these rules means making at least one record
//! exist: `create_space` writes a sentinel record with an empty payload,
//! the same trick the administrative UI uses.

use bytes::Bytes;
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::StoreError;
use crate::storage::backend::StorageBackend;
use crate::storage::envelope::space_prefix;
use crate::storage::store::{validate_name, RecordMeta, RecordStore};

/// Key of the sentinel record written by [`RecordStore::create_space`].
///
/// The name documents its purpose: once real keys exist in the space, the
/// sentinel is safe to delete.
pub const SPACE_SENTINEL_KEY: &str = "to-delete";

impl<B: StorageBackend> RecordStore<B> {
    /// Enumerates every space with at least one live record, sorted.
    ///
    /// Scans all records, applying the same lazy expiration as
    /// [`RecordStore::get`] - expired records encountered are purged and do
    /// not keep their space alive.
    pub fn list_spaces(&self) -> Result<Vec<String>, StoreError> {
        let mut spaces = BTreeSet::new();
        self.for_each_live(|space, _key| {
            spaces.insert(space.to_string());
        })?;
        Ok(spaces.into_iter().collect())
    }

    /// Creates `space` by writing an empty sentinel record into it.
    ///
    /// The sentinel has no expiration; otherwise the new space would never
    /// become enumerable. Creating a space that already exists just writes
    /// (or revives) the sentinel and leaves other records alone.
    ///
    /// # Returns
    ///
    /// Returns the metadata of the sentinel record.
    pub fn create_space(&self, space: &str) -> Result<RecordMeta, StoreError> {
        let meta = self.put(space, SPACE_SENTINEL_KEY, Bytes::new(), None)?;
        debug!(space = %space, "Space created via sentinel record");
        Ok(meta)
    }

    /// Deletes every record in `space`, live and expired alike.
    ///
    /// Each key is removed atomically under its per-key lock, but the space
    /// as a whole is not deleted atomically: a concurrent reader may observe
    /// some keys already gone and others still present.
    ///
    /// # Returns
    ///
    /// Returns the number of records removed. Zero means the space did not
    /// exist; that is not an error.
    pub fn delete_space(&self, space: &str) -> Result<u64, StoreError> {
        validate_name("space", space)?;

        let removed = self.remove_all_in_prefix(&space_prefix(space))?;
        if removed > 0 {
            debug!(space = %space, removed = removed, "Space deleted");
        }
        Ok(removed)
    }
}
