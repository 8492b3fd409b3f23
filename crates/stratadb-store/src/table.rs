//! Typed table facade over the shared keyspace.
//!
//! A `Table<K, V>` binds a key strategy (`K: TableKey`), a serde value
//! type and a table id. Records are stored under
//! `prefix || encoded_key`, where the prefix is the table id's
//! order-preserving encoding, computed once at open time. Values carry a
//! one-byte format tag in front of the serde_json payload; tag `0x00` is
//! the only recognized format and anything else is treated as data
//! corruption.
//!
//! `put` and `remove` stage into the keyspace's write buffer; `get`
//! reads buffer-then-engine; walks scan the engine directly and never
//! consult the buffer.

use crate::key_encoding::{id_counter_key, table_prefix, table_upper_bound};
use crate::keyspace::KeyspaceInner;
use crate::walk::walk_range;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use stratadb_commons::keys::{decode_i64, encode_i64};
use stratadb_commons::{Result, StoreError, TableKey};

/// The only recognized record format tag.
const RECORD_FORMAT: u8 = 0x00;

/// A typed logical table over the shared physical keyspace.
pub struct Table<K, V> {
    shared: Arc<KeyspaceInner>,
    table_id: u32,
    name: String,
    /// Encoded table id; constant length per table instance.
    prefix: Vec<u8>,
    /// Next table's prefix, or the escape sentinel for the maximum id.
    upper_bound: Vec<u8>,
    /// Reserved key of this table's id counter.
    counter_key: Vec<u8>,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Table<K, V>
where
    K: TableKey,
    V: Serialize + DeserializeOwned,
{
    pub(crate) fn new(shared: Arc<KeyspaceInner>, table_id: u32, name: &str) -> Self {
        Self {
            shared,
            table_id,
            name: name.to_string(),
            prefix: table_prefix(table_id),
            upper_bound: table_upper_bound(table_id),
            counter_key: id_counter_key(table_id),
            _marker: PhantomData,
        }
    }

    pub fn table_id(&self) -> u32 {
        self.table_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn physical_key(&self, key: &K) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.prefix.len() + 16);
        buf.extend_from_slice(&self.prefix);
        key.encode_key(&mut buf);
        buf
    }

    fn encode_record(&self, value: &V) -> Result<Vec<u8>> {
        let payload =
            serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut record = Vec::with_capacity(1 + payload.len());
        record.push(RECORD_FORMAT);
        record.extend_from_slice(&payload);
        Ok(record)
    }

    fn decode_record(&self, bytes: &[u8]) -> Result<V> {
        match bytes.first() {
            Some(&RECORD_FORMAT) => serde_json::from_slice(&bytes[1..]).map_err(|e| {
                StoreError::CorruptRecord {
                    table: self.name.clone(),
                    table_id: self.table_id,
                    detail: e.to_string(),
                }
            }),
            Some(&tag) => Err(StoreError::CorruptRecord {
                table: self.name.clone(),
                table_id: self.table_id,
                detail: format!("unknown record format tag {}", tag),
            }),
            None => Err(StoreError::CorruptRecord {
                table: self.name.clone(),
                table_id: self.table_id,
                detail: "empty record".to_string(),
            }),
        }
    }

    /// Retrieves a record, reading through the write buffer first while a
    /// write cycle is active. Returns `Ok(None)` for absent keys; corrupt
    /// stored data is a hard error, never skipped.
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        match self.shared.get_raw(&self.physical_key(key))? {
            Some(bytes) => self.decode_record(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Stages an upsert into the write buffer. The engine is untouched
    /// until `commit`.
    pub fn put(&self, key: &K, value: &V) -> Result<()> {
        let record = self.encode_record(value)?;
        self.shared.buffer.stage_record(self.physical_key(key), record);
        Ok(())
    }

    /// Stages a deletion (tombstone) into the write buffer.
    pub fn remove(&self, key: &K) {
        self.shared.buffer.stage_tombstone(self.physical_key(key));
    }

    fn bounds(&self, from: Option<&K>, to: Option<&K>) -> (Vec<u8>, Vec<u8>) {
        let key_from = from
            .map(|k| self.physical_key(k))
            .unwrap_or_else(|| self.prefix.clone());
        let key_to = to
            .map(|k| self.physical_key(k))
            .unwrap_or_else(|| self.upper_bound.clone());
        (key_from, key_to)
    }

    /// Walks this table's key range in order, feeding each decoded key to
    /// the visitor.
    ///
    /// Absent bounds default to the table's full range; bounds arriving
    /// in the wrong order are swapped, with direction controlled solely
    /// by `reverse`. The visitor returns `false` to stop early, which
    /// makes `walk` return `Ok(false)` (vs `Ok(true)` on exhaustion).
    /// Walks scan committed engine state only, bypassing the write
    /// buffer. A corrupt key aborts the walk with a hard error.
    pub fn walk<F>(
        &self,
        from: Option<&K>,
        to: Option<&K>,
        inclusive: bool,
        reverse: bool,
        mut visit: F,
    ) -> Result<bool>
    where
        F: FnMut(K) -> bool,
    {
        let (key_from, key_to) = self.bounds(from, to);
        let engine = self.shared.engine()?;
        let prefix_len = self.prefix.len();
        walk_range(
            engine.as_ref(),
            key_from,
            key_to,
            inclusive,
            reverse,
            |physical, _cursor| {
                let key = K::decode_key(&physical[prefix_len..])
                    .map_err(StoreError::KeyDecode)?;
                Ok(visit(key))
            },
        )
    }

    /// Like [`walk`](Self::walk), but also materializes and decodes each
    /// record for the visitor.
    pub fn walk_records<F>(
        &self,
        from: Option<&K>,
        to: Option<&K>,
        inclusive: bool,
        reverse: bool,
        mut visit: F,
    ) -> Result<bool>
    where
        F: FnMut(K, V) -> bool,
    {
        let (key_from, key_to) = self.bounds(from, to);
        let engine = self.shared.engine()?;
        let prefix_len = self.prefix.len();
        walk_range(
            engine.as_ref(),
            key_from,
            key_to,
            inclusive,
            reverse,
            |physical, cursor| {
                let key = K::decode_key(&physical[prefix_len..])
                    .map_err(StoreError::KeyDecode)?;
                let value = self.decode_record(&cursor.value()?)?;
                Ok(visit(key, value))
            },
        )
    }

    /// Reads this table's id counter, used for integer-key
    /// auto-increment. A never-set counter reads as 0; a corrupt counter
    /// is logged and also reads as 0, since losing it only affects
    /// future id allocation, not stored data.
    pub fn id_counter(&self) -> Result<i64> {
        match self.shared.get_raw(&self.counter_key)? {
            Some(bytes) => match decode_i64(&bytes) {
                Ok(v) => Ok(v),
                Err(e) => {
                    log::warn!(
                        "table({},{}): corrupt id counter ({}), defaulting to 0",
                        self.name,
                        self.table_id,
                        e
                    );
                    Ok(0)
                }
            },
            None => Ok(0),
        }
    }

    /// Stages a new id counter value. A no-op when the value is
    /// unchanged, to avoid needless writes.
    pub fn set_id_counter(&self, value: i64) -> Result<()> {
        if value != self.id_counter()? {
            let mut bytes = Vec::new();
            encode_i64(value, &mut bytes);
            self.shared.buffer.stage_record(self.counter_key.clone(), bytes);
        }
        Ok(())
    }
}
