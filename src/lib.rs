//! # spacekv - A Multi-Tenant, Space-Partitioned Key-Value Record Store
//!
//! spacekv is the storage core of an administrative key-value browser. Data
//! is organized into named "spaces" (tenant-like namespaces); within a
//! space, keys map to binary values carrying metadata: creation and
//! modification instants, an optional absolute expiration, and a version
//! counter for optimistic concurrency detection.
//!
//! ## Features
//!
//! - **Spaces**: derived from live keys - a space exists iff it has at
//!   least one live record, with no separate persisted entity
//! - **Versioned writes**: every successful write bumps the record version
//!   by exactly 1; a fresh or revived key restarts at 1
//! - **Expiration**: absolute instants, lazy purge on every access path
//!   plus an optional background sweeper
//! - **Pluggable persistence**: the store writes through a small backend
//!   trait; an ordered in-memory backend ships with the crate
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                              spacekv                                │
//! │                                                                     │
//! │  ┌──────────────┐      ┌──────────────────────────────────────────┐ │
//! │  │  Value Codec │      │              RecordStore                 │ │
//! │  │ (view module)│      │  put/get/delete · list_keys · spaces     │ │
//! │  └──────────────┘      │  ┌────────┐ ┌────────┐ ┌────────┐        │ │
//! │                        │  │Lock 0  │ │Lock 1  │ │...64   │        │ │
//! │                        │  └────────┘ └────────┘ └────────┘        │ │
//! │                        └──────────────────┬───────────────────────┘ │
//! │                                           │ JSON envelope           │
//! │                                           ▼                         │
//! │                        ┌──────────────────────────────────────────┐ │
//! │                        │        StorageBackend (trait)            │ │
//! │                        │   fetch / store / remove / scan_prefix   │ │
//! │                        └──────────────────────────────────────────┘ │
//! │                                           ▲                         │
//! │                        ┌──────────────────┴───────────────────────┐ │
//! │                        │          ExpirationSweeper               │ │
//! │                        │       (Background Tokio Task)            │ │
//! │                        └──────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use spacekv::storage::{MemoryBackend, RecordStore};
//! use bytes::Bytes;
//!
//! let store = RecordStore::new(MemoryBackend::new());
//!
//! // First write creates the record at version 1
//! let meta = store.put("tenant1", "cfg", Bytes::from("v1"), None).unwrap();
//! assert_eq!(meta.version, 1);
//!
//! // Updates keep created_at and bump the version
//! let meta = store.put("tenant1", "cfg", Bytes::from("v2"), None).unwrap();
//! assert_eq!(meta.version, 2);
//!
//! // Spaces are derived from live keys
//! assert_eq!(store.list_spaces().unwrap(), vec!["tenant1"]);
//!
//! store.delete("tenant1", "cfg").unwrap();
//! assert!(store.get("tenant1", "cfg").unwrap_err().is_not_found());
//! ```
//!
//! ## Module Overview
//!
//! - [`storage`]: record store, space directory, backend trait, sweeper
//! - [`view`]: display transcoding between base64 and raw text views
//! - [`error`]: the error taxonomy shared by all operations
//!
//! ## Design Highlights
//!
//! ### Per-Key Locking
//!
//! Read-modify-write sections hash the composite key onto one of 64 lock
//! shards. Writes to the same key are linearized; unrelated keys never
//! contend on a global lock.
//!
//! ### Lazy + Active Expiration
//!
//! Records with an expiration are removed in two ways:
//! 1. **Lazy**: any read, scan, or write that touches an expired record
//!    purges it and reports it absent
//! 2. **Active**: a background task periodically sweeps the whole store
//!
//! Both paths run the same state transition, so an expired record is
//! indistinguishable from one that never existed.
//!
//! ### Forward-Compatible Persistence
//!
//! Records are stored as self-contained JSON envelopes. Unknown fields are
//! ignored on read and added fields default when absent, so envelopes
//! written by an older build stay readable.

pub mod error;
pub mod storage;
pub mod view;

// Re-export commonly used types for convenience
pub use error::StoreError;
pub use storage::{
    start_sweeper, ExpirationSweeper, MemoryBackend, Record, RecordMeta, RecordStore,
    StorageBackend, SweepConfig,
};
pub use view::{from_display, to_display, ViewType, INVALID_BASE64_PLACEHOLDER};

/// Version of spacekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
