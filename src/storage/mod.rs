//! Storage Module
//!
//! This module provides the storage core of spacekv: the record store and
//! space directory layered over an abstract backend, plus the background
//! expiration sweeper.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      RecordStore                            │
//! │   put / get / delete / list_keys / count_live_keys          │
//! │   list_spaces / create_space / delete_space                 │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Lock 0  │ │ Lock 1  │ │ Lock 2  │ │...64    │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │ envelope codec
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              StorageBackend (trait)                         │
//! │        fetch / store / remove / scan_prefix                 │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                            │
//!              ┌─────────────┴─────────────┐
//!              │    ExpirationSweeper      │
//!              │  (Background Tokio Task)  │
//!              └───────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Spaces**: tenant-like namespaces, derived from live keys
//! - **Versioned metadata**: created/modified instants plus a write counter
//! - **Lazy expiration**: expired records are purged on access
//! - **Active expiration**: the sweeper reclaims records nobody touches
//! - **Per-key locking**: 64 lock shards keep unrelated keys concurrent
//!
//! ## Example
//!
//! ```
//! use spacekv::storage::{MemoryBackend, RecordStore};
//! use bytes::Bytes;
//! use std::sync::Arc;
//!
//! let store = Arc::new(RecordStore::new(MemoryBackend::new()));
//!
//! store.put("tenant1", "cfg", Bytes::from("v1"), None).unwrap();
//! assert_eq!(store.list_spaces().unwrap(), vec!["tenant1"]);
//!
//! store.delete_space("tenant1").unwrap();
//! assert!(store.list_spaces().unwrap().is_empty());
//! ```

pub mod backend;
pub mod envelope;
pub mod spaces;
pub mod store;
pub mod sweeper;

// Re-export commonly used types
pub use backend::{BackendError, MemoryBackend, StorageBackend};
pub use envelope::{full_key, space_prefix, split_full_key, RecordEnvelope, KEY_SEPARATOR};
pub use spaces::SPACE_SENTINEL_KEY;
pub use store::{now_millis, Record, RecordMeta, RecordStore, StoreStats, SweepOutcome};
pub use sweeper::{start_sweeper, ExpirationSweeper, SweepConfig};
