//! Shared staging buffer for one write cycle.
//!
//! All tables of a keyspace stage their writes into a single concurrent
//! map keyed by physical key, so one commit applies every table's changes
//! as one atomic engine batch. Deletions stage a tombstone instead of
//! removing anything; the engine only sees the delete at commit time.
//!
//! Within a cycle the semantics are last-writer-wins: repeated puts and
//! removes of the same key collapse to the final entry.

use dashmap::DashMap;

/// A staged write: the record bytes to upsert, or a tombstone meaning
/// "delete on commit".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staged {
    Record(Vec<u8>),
    Tombstone,
}

/// Concurrent map from physical key to staged value, shared across all
/// open tables. Lives for one write cycle (`begin_write` … `commit`).
#[derive(Debug, Default)]
pub struct WriteBuffer {
    entries: DashMap<Vec<u8>, Staged>,
}

impl WriteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages record bytes for `key`, replacing any earlier staged entry.
    pub fn stage_record(&self, key: Vec<u8>, bytes: Vec<u8>) {
        self.entries.insert(key, Staged::Record(bytes));
    }

    /// Stages a deletion for `key`, replacing any earlier staged entry.
    pub fn stage_tombstone(&self, key: Vec<u8>) {
        self.entries.insert(key, Staged::Tombstone);
    }

    /// Looks up the staged entry for `key`, if any.
    pub fn get(&self, key: &[u8]) -> Option<Staged> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of staged writes in the current cycle.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Snapshot of all staged entries in engine batch form
    /// (`None` = delete). Does not clear the buffer; reads racing with
    /// a commit keep seeing staged entries until `clear` runs.
    pub fn snapshot(&self) -> Vec<(Vec<u8>, Option<Vec<u8>>)> {
        self.entries
            .iter()
            .map(|e| {
                let value = match e.value() {
                    Staged::Record(bytes) => Some(bytes.clone()),
                    Staged::Tombstone => None,
                };
                (e.key().clone(), value)
            })
            .collect()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_writer_wins() {
        let buffer = WriteBuffer::new();
        buffer.stage_record(b"k".to_vec(), b"v1".to_vec());
        buffer.stage_record(b"k".to_vec(), b"v2".to_vec());
        assert_eq!(buffer.get(b"k"), Some(Staged::Record(b"v2".to_vec())));
        assert_eq!(buffer.len(), 1);

        buffer.stage_tombstone(b"k".to_vec());
        assert_eq!(buffer.get(b"k"), Some(Staged::Tombstone));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_snapshot_maps_tombstones_to_deletes() {
        let buffer = WriteBuffer::new();
        buffer.stage_record(b"a".to_vec(), b"v".to_vec());
        buffer.stage_tombstone(b"b".to_vec());

        let mut snapshot = buffer.snapshot();
        snapshot.sort();
        assert_eq!(
            snapshot,
            vec![
                (b"a".to_vec(), Some(b"v".to_vec())),
                (b"b".to_vec(), None),
            ]
        );
        // Snapshot must not drain the buffer.
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_concurrent_staging() {
        use std::sync::Arc;

        let buffer = Arc::new(WriteBuffer::new());
        let handles: Vec<_> = (0..4u8)
            .map(|t| {
                let buffer = Arc::clone(&buffer);
                std::thread::spawn(move || {
                    for i in 0..100u8 {
                        buffer.stage_record(vec![t, i], vec![i]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(buffer.len(), 400);
    }
}
