//! Ordered storage engine abstraction.
//!
//! This module defines the contract the table layer needs from an
//! underlying engine, so that StrataDB can sit on RocksDB, an in-memory
//! map, or any other ordered key-value store without changing core logic.
//!
//! ## Architecture
//!
//! ```text
//! Table<K, V>              ← typed facade (table.rs)
//!     ↓
//! Keyspace                 ← write buffer + commit (keyspace.rs)
//!     ↓
//! StorageEngine            ← this trait
//!     ↓
//! RocksDB / MemoryEngine   ← concrete bindings
//! ```
//!
//! The engine is assumed to keep keys in byte-wise lexicographic order,
//! to apply a batch of writes atomically, and to be crash-consistent.
//! Durability is entirely its responsibility; the table layer never
//! retries or rolls back.

use stratadb_commons::Result;

/// Seek position relative to the seek key, combining walk direction and
/// boundary inclusivity:
///
/// - forward scans seek `Ge` (inclusive) or `Gt` (exclusive) the lower
///   bound and step forward;
/// - reverse scans seek `Le` (inclusive) or `Lt` (exclusive) the upper
///   bound and step backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekMode {
    Lt,
    Le,
    Ge,
    Gt,
}

/// A positioned cursor over the engine's ordered keyspace.
///
/// After a seek the cursor sits on the first matching key, or on nothing
/// if no key matches (`key()` returns `None`). Stepping past either end
/// leaves the cursor exhausted. The cursor is released when dropped,
/// on every exit path.
pub trait ScanCursor {
    /// The key at the current position, or `None` when exhausted.
    fn key(&self) -> Option<&[u8]>;

    /// The value at the current position.
    ///
    /// Only meaningful while `key()` returns `Some`; calling it on an
    /// exhausted cursor is an engine error.
    fn value(&self) -> Result<Vec<u8>>;

    /// Advances to the next key in ascending order.
    fn step_forward(&mut self);

    /// Moves back to the previous key in ascending order.
    fn step_backward(&mut self);
}

/// Trait for ordered key-value engine implementations.
///
/// Implementations must be thread-safe (`Send + Sync`), and `get` must
/// not contend across concurrent readers; the read path of the table
/// layer calls it without any locking of its own.
pub trait StorageEngine: Send + Sync {
    /// Point lookup. Returns `Ok(None)` if the key doesn't exist.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Applies a batch of writes as one atomic unit.
    ///
    /// `Some(value)` upserts, `None` deletes. Either all entries are
    /// applied or none.
    fn write_batch(&self, entries: Vec<(Vec<u8>, Option<Vec<u8>>)>) -> Result<()>;

    /// Opens a cursor positioned relative to `key` per `mode`.
    fn scan(&self, key: &[u8], mode: SeekMode) -> Result<Box<dyn ScanCursor + '_>>;
}
