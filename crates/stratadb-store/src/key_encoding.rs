//! Physical key layout for the shared keyspace.
//!
//! Every logical record is stored under `varuint(table_id) || encoded_key`,
//! so arbitrary tables share one ordered keyspace and a per-table range
//! scan is just a scan between that table's prefix and the next one.
//!
//! Two properties make the boundary arithmetic work:
//!
//! - the variable-length table-id encoding is order-preserving *and*
//!   prefix-free across ids, so no table's keys ever sort inside another
//!   table's range;
//! - the encoded prefix length is constant for a given id, so stripping
//!   it off a scanned key is a fixed-offset slice.
//!
//! Id-counter records live under a reserved escape prefix ([`ESCAPE_PREFIX`])
//! that sorts after every valid table prefix, which keeps them out of all
//! walk ranges and also serves as the upper scan bound for the maximum
//! representable table id.

/// Reserved byte sorting after every encoded table id (max first byte of
/// a valid encoding is `0xf0`).
pub const ESCAPE_PREFIX: u8 = 0xf1;

/// Appends the variable-length order-preserving encoding of a table id.
///
/// Layout by magnitude:
///
/// ```text
/// id < 0x80        → 1 byte:  id
/// id < 0x4000      → 2 bytes: 0x80|id>>8, id
/// id < 0x20_0000   → 3 bytes: 0xc0|id>>16, id>>8, id
/// id < 0x1000_0000 → 4 bytes: 0xe0|id>>24, …
/// otherwise        → 5 bytes: 0xf0, id as big-endian u32
/// ```
///
/// Longer encodings start with strictly higher lead bytes, so encoded
/// ids compare like the ids themselves and no encoding is a prefix of
/// another.
pub fn encode_table_id(id: u32, buf: &mut Vec<u8>) {
    if id < 0x80 {
        buf.push(id as u8);
    } else if id < 0x4000 {
        buf.extend_from_slice(&[0x80 | (id >> 8) as u8, id as u8]);
    } else if id < 0x20_0000 {
        buf.extend_from_slice(&[0xc0 | (id >> 16) as u8, (id >> 8) as u8, id as u8]);
    } else if id < 0x1000_0000 {
        buf.extend_from_slice(&[
            0xe0 | (id >> 24) as u8,
            (id >> 16) as u8,
            (id >> 8) as u8,
            id as u8,
        ]);
    } else {
        buf.push(0xf0);
        buf.extend_from_slice(&id.to_be_bytes());
    }
}

/// Encoded byte length of a table id. Computed once at table-open time;
/// all keys of one table share a prefix of exactly this length.
pub fn table_id_encoded_len(id: u32) -> usize {
    if id < 0x80 {
        1
    } else if id < 0x4000 {
        2
    } else if id < 0x20_0000 {
        3
    } else if id < 0x1000_0000 {
        4
    } else {
        5
    }
}

/// The table's prefix, which is also its lower scan bound: it sorts
/// before every key of the table and after every key of any table with
/// a smaller id.
pub fn table_prefix(id: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(table_id_encoded_len(id));
    encode_table_id(id, &mut buf);
    buf
}

/// The table's upper scan bound: the next table's prefix, or the escape
/// sentinel when the id cannot be incremented.
pub fn table_upper_bound(id: u32) -> Vec<u8> {
    match id.checked_add(1) {
        Some(next) => table_prefix(next),
        None => vec![ESCAPE_PREFIX],
    }
}

/// The reserved key of a table's id counter: escape prefix plus the
/// encoded table id. Sorts after every table range, so no walk ever
/// sees it.
pub fn id_counter_key(id: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + table_id_encoded_len(id));
    buf.push(ESCAPE_PREFIX);
    encode_table_id(id, &mut buf);
    buf
}
