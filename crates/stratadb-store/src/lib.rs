//! # stratadb-store
//!
//! Typed logical tables over one shared, ordered key-value keyspace.
//! Each record is stored under `table_prefix || encoded_key`, so
//! arbitrary tables share a single physical store and still get
//! efficient per-table range walks.
//!
//! ## Architecture
//!
//! ```text
//! Table<K, V>          ← typed get/put/remove/walk/id-counter facade
//!     ↓
//! Keyspace             ← shared write buffer, commit, lifecycle
//!     ↓
//! StorageEngine        ← ordered engine abstraction
//!     ↓
//! RocksDB / in-memory  ← concrete bindings
//! ```
//!
//! ## Write model
//!
//! Writes are buffered between `begin_write` and `commit` and applied to
//! the engine as one atomic batch; deletions stage tombstones. Reads go
//! buffer-then-engine while a write cycle is active, so a writer sees
//! its own uncommitted changes. Range walks scan committed engine state
//! directly.

pub mod engine;
pub mod key_encoding;
pub mod keyspace;
pub mod rocksdb_impl;
pub mod table;
pub mod test_utils;
mod walk;
pub mod write_buffer;

pub use engine::{ScanCursor, SeekMode, StorageEngine};
pub use keyspace::Keyspace;
pub use rocksdb_impl::RocksDbEngine;
pub use table::Table;
pub use write_buffer::{Staged, WriteBuffer};

// Re-export the commons surface so dependents need a single import path.
pub use stratadb_commons::{Composite, Result, StoreError, TableKey};
