//! Keyspace lifecycle: engine handle, write cycle, commit.
//!
//! A `Keyspace` owns the engine handle, the shared write buffer, and the
//! write-in-progress flag. Tables opened from it are thin typed facades
//! over this shared state.
//!
//! ## Write cycle
//!
//! Between `begin_write` and `commit`, every table's `put`/`remove`
//! stages into the buffer; nothing touches the engine. `commit` issues
//! exactly one atomic engine batch. At most one writer sequence is
//! active at a time by external convention; this layer does not enforce
//! it with locks.
//!
//! ## Commit failure contract
//!
//! A failed engine batch is logged and the buffer cleared anyway; no
//! retry, no rollback. Durability is delegated to the engine's batch
//! atomicity; callers that need stronger guarantees must verify
//! externally.

use crate::engine::StorageEngine;
use crate::table::Table;
use crate::write_buffer::{Staged, WriteBuffer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use stratadb_commons::{Result, StoreError, TableKey};

/// Shared state behind a keyspace and all of its tables.
pub(crate) struct KeyspaceInner {
    /// Engine handle; reset to `None` on close.
    engine: RwLock<Option<Arc<dyn StorageEngine>>>,
    pub(crate) buffer: WriteBuffer,
    writing: AtomicBool,
}

impl KeyspaceInner {
    /// Clones out the engine handle, failing once the keyspace is closed.
    pub(crate) fn engine(&self) -> Result<Arc<dyn StorageEngine>> {
        self.engine
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?
            .as_ref()
            .cloned()
            .ok_or(StoreError::Closed)
    }

    /// Read path: staged entry first while a write cycle is active, then
    /// the engine. A staged tombstone masks the engine's stale copy.
    pub(crate) fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if self.writing.load(Ordering::Acquire) {
            match self.buffer.get(key) {
                Some(Staged::Tombstone) => return Ok(None),
                Some(Staged::Record(bytes)) => return Ok(Some(bytes)),
                None => {}
            }
        }
        self.engine()?.get(key)
    }
}

/// A set of typed tables sharing one ordered physical keyspace.
pub struct Keyspace {
    inner: Arc<KeyspaceInner>,
}

impl Keyspace {
    /// Creates a keyspace over an already-open engine.
    pub fn new(engine: Arc<dyn StorageEngine>) -> Self {
        Self {
            inner: Arc::new(KeyspaceInner {
                engine: RwLock::new(Some(engine)),
                buffer: WriteBuffer::new(),
                writing: AtomicBool::new(false),
            }),
        }
    }

    /// Opens a typed table bound to `table_id`. The key strategy is
    /// selected by the `K` type parameter at open time.
    pub fn open_table<K, V>(&self, table_id: u32, name: &str) -> Table<K, V>
    where
        K: TableKey,
        V: Serialize + DeserializeOwned,
    {
        Table::new(Arc::clone(&self.inner), table_id, name)
    }

    /// Marks a write cycle as active. From here on, reads prefer the
    /// write buffer for any key it holds.
    pub fn begin_write(&self) {
        self.inner.writing.store(true, Ordering::Release);
    }

    /// Atomically flushes the write buffer into the engine and ends the
    /// write cycle.
    ///
    /// Failures are logged, never returned: a failed batch still clears
    /// the buffer (see the module docs for the rationale). An empty
    /// buffer skips the engine call entirely. The write-in-progress flag
    /// is cleared last, so concurrent reads keep preferring the buffer
    /// until it is emptied.
    pub fn commit(&self) {
        if self.inner.buffer.is_empty() {
            self.inner.writing.store(false, Ordering::Release);
            return;
        }
        match self.inner.engine() {
            Ok(engine) => {
                let entries = self.inner.buffer.snapshot();
                if let Err(e) = engine.write_batch(entries) {
                    log::error!("commit: engine batch write failed: {}", e);
                }
                self.inner.buffer.clear();
                self.inner.writing.store(false, Ordering::Release);
            }
            Err(e) => {
                // Keep the buffer; a reopened keyspace could still flush it.
                log::error!("commit: keyspace unavailable ({}), buffer retained", e);
            }
        }
    }

    /// Number of writes staged in the current cycle.
    pub fn staged_len(&self) -> usize {
        self.inner.buffer.len()
    }

    /// Commits any pending buffer, then releases the engine handle.
    /// Subsequent operations fail with [`StoreError::Closed`].
    pub fn close(&self) {
        self.commit();
        if let Ok(mut guard) = self.inner.engine.write() {
            *guard = None;
        }
        self.inner.buffer.clear();
        self.inner.writing.store(false, Ordering::Release);
    }
}
