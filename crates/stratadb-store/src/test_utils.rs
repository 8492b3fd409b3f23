//! Test utilities for stratadb-store.
//!
//! Provides an in-memory ordered engine for table-layer tests and a
//! tempdir-backed RocksDB helper, both available to dependent crates.

use crate::engine::{ScanCursor, SeekMode, StorageEngine};
use crate::rocksdb_impl::RocksDbEngine;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use stratadb_commons::{Result, StoreError};
use tempfile::TempDir;

/// In-memory ordered engine backed by a `BTreeMap`.
///
/// Scans take a point-in-time snapshot of the map, so a cursor stays
/// consistent while other threads keep writing. Batches apply under one
/// write lock, which makes them atomic with respect to readers.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageEngine for MemoryEngine {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write_batch(&self, batch: Vec<(Vec<u8>, Option<Vec<u8>>)>) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        for (key, value) in batch {
            match value {
                Some(value) => {
                    entries.insert(key, value);
                }
                None => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn scan(&self, key: &[u8], mode: SeekMode) -> Result<Box<dyn ScanCursor + '_>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let snapshot: Vec<(Vec<u8>, Vec<u8>)> =
            entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        drop(entries);

        // Index of the first key >= / > the seek key.
        let first_ge = snapshot.partition_point(|(k, _)| k.as_slice() < key);
        let first_gt = snapshot.partition_point(|(k, _)| k.as_slice() <= key);
        let pos = match mode {
            SeekMode::Ge => first_ge as isize,
            SeekMode::Gt => first_gt as isize,
            SeekMode::Le => first_gt as isize - 1,
            SeekMode::Lt => first_ge as isize - 1,
        };
        Ok(Box::new(MemoryCursor { snapshot, pos }))
    }
}

struct MemoryCursor {
    snapshot: Vec<(Vec<u8>, Vec<u8>)>,
    // -1 = before the first key, snapshot.len() = past the last one.
    pos: isize,
}

impl MemoryCursor {
    fn current(&self) -> Option<&(Vec<u8>, Vec<u8>)> {
        usize::try_from(self.pos)
            .ok()
            .and_then(|i| self.snapshot.get(i))
    }
}

impl ScanCursor for MemoryCursor {
    fn key(&self) -> Option<&[u8]> {
        self.current().map(|(k, _)| k.as_slice())
    }

    fn value(&self) -> Result<Vec<u8>> {
        self.current()
            .map(|(_, v)| v.clone())
            .ok_or_else(|| StoreError::engine("cursor value read past end of scan"))
    }

    fn step_forward(&mut self) {
        if self.pos < self.snapshot.len() as isize {
            self.pos += 1;
        }
    }

    fn step_backward(&mut self) {
        if self.pos >= 0 {
            self.pos -= 1;
        }
    }
}

/// Tempdir-backed RocksDB engine that cleans up on drop.
pub struct TestDb {
    pub engine: Arc<RocksDbEngine>,
    #[allow(dead_code)]
    temp_dir: TempDir,
}

impl TestDb {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let engine = Arc::new(RocksDbEngine::open(temp_dir.path())?);
        Ok(Self { engine, temp_dir })
    }
}
