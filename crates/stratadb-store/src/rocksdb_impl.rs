//! RocksDB implementation of the StorageEngine trait.
//!
//! All tables share the default column family; the table layer's prefix
//! encoding does the namespacing, so no per-table column families are
//! needed. Batches go through `rocksdb::WriteBatch`, which RocksDB
//! applies atomically, and scans ride on raw iterators which support
//! both seek directions.

use crate::engine::{ScanCursor, SeekMode, StorageEngine};
use rocksdb::{DBRawIteratorWithThreadMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;
use stratadb_commons::{Result, StoreError};

/// RocksDB-backed storage engine.
#[derive(Debug)]
pub struct RocksDbEngine {
    db: Arc<DB>,
}

impl RocksDbEngine {
    /// Opens (or creates) a database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path).map_err(|e| StoreError::EngineOpen(e.to_string()))?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Wraps an already-open database handle.
    pub fn new(db: Arc<DB>) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    pub fn db(&self) -> &Arc<DB> {
        &self.db
    }
}

impl StorageEngine for RocksDbEngine {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.db
            .get(key)
            .map_err(|e| StoreError::Engine(e.to_string()))
    }

    fn write_batch(&self, entries: Vec<(Vec<u8>, Option<Vec<u8>>)>) -> Result<()> {
        let mut batch = WriteBatch::default();
        for (key, value) in entries {
            match value {
                Some(value) => batch.put(key, value),
                None => batch.delete(key),
            }
        }
        self.db
            .write(batch)
            .map_err(|e| StoreError::Engine(e.to_string()))
    }

    fn scan(&self, key: &[u8], mode: SeekMode) -> Result<Box<dyn ScanCursor + '_>> {
        let mut it = self.db.raw_iterator();
        match mode {
            SeekMode::Ge => it.seek(key),
            SeekMode::Gt => {
                it.seek(key);
                if it.valid() && it.key() == Some(key) {
                    it.next();
                }
            }
            SeekMode::Le => it.seek_for_prev(key),
            SeekMode::Lt => {
                it.seek_for_prev(key);
                if it.valid() && it.key() == Some(key) {
                    it.prev();
                }
            }
        }
        Ok(Box::new(RocksCursor { it }))
    }
}

struct RocksCursor<'a> {
    it: DBRawIteratorWithThreadMode<'a, DB>,
}

impl ScanCursor for RocksCursor<'_> {
    fn key(&self) -> Option<&[u8]> {
        self.it.key()
    }

    fn value(&self) -> Result<Vec<u8>> {
        self.it
            .value()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| StoreError::engine("cursor value read past end of scan"))
    }

    fn step_forward(&mut self) {
        // RocksDB requires a valid position before stepping.
        if self.it.valid() {
            self.it.next();
        }
    }

    fn step_backward(&mut self) {
        if self.it.valid() {
            self.it.prev();
        }
    }
}
