//! Logical key codecs with lexicographic ordering guarantees.
//!
//! The physical store keeps keys in byte-by-byte lexicographic order, so
//! every logical key type must encode such that logical ordering maps to
//! byte ordering. Naive encodings break this:
//!
//! - `i64::to_be_bytes` alone puts `-1` after `i64::MAX`, because the
//!   two's-complement sign bit makes negatives compare high.
//! - UTF-8 bytes preserve codepoint order but are variable-width, which
//!   complicates decoding a key suffix back into text.
//!
//! The codecs here fix both: integers carry an explicit sign byte in
//! front of their big-endian payload, and text is encoded as fixed
//! 3-byte big-endian code points.
//!
//! # The `TableKey` trait
//!
//! Each supported key type implements [`TableKey`]: encode into a byte
//! buffer (appended after the table prefix), decode from the suffix that
//! a range walk hands back. The set of key strategies is closed; a table
//! picks one at open time via its type parameter:
//!
//! ```rust,ignore
//! let accounts: Table<i64, Account> = keyspace.open_table(1, "accounts");
//! let sessions: Table<String, Session> = keyspace.open_table(2, "sessions");
//! ```
//!
//! Composite keys wrap a bincode-encodable struct in [`Composite`]. Their
//! byte ordering is whatever field-by-field bincode serialization yields;
//! callers relying on range walks over composite keys own that contract.

use bincode::{Decode, Encode};

/// Encoded width of an `i64` key: one sign byte plus eight payload bytes.
pub const I64_KEY_LEN: usize = 9;

/// Encodes an `i64` into 9 order-preserving bytes.
///
/// The leading byte is `0x00` for negative values and `0x01` otherwise,
/// followed by the big-endian two's-complement payload. Within one sign
/// class the payload already sorts numerically; the sign byte fixes the
/// cross-sign ordering.
///
/// ```
/// use stratadb_commons::keys::encode_i64;
///
/// let mut a = Vec::new();
/// let mut b = Vec::new();
/// encode_i64(-3, &mut a);
/// encode_i64(2, &mut b);
/// assert!(a < b);
/// ```
pub fn encode_i64(v: i64, buf: &mut Vec<u8>) {
    buf.push(if v < 0 { 0x00 } else { 0x01 });
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Decodes an `i64` key from its 9-byte encoding.
pub fn decode_i64(bytes: &[u8]) -> Result<i64, String> {
    if bytes.len() != I64_KEY_LEN {
        return Err(format!(
            "expected {} byte integer key, got {}",
            I64_KEY_LEN,
            bytes.len()
        ));
    }
    let mut payload = [0u8; 8];
    payload.copy_from_slice(&bytes[1..]);
    let v = i64::from_be_bytes(payload);
    match bytes[0] {
        0x00 if v < 0 => Ok(v),
        0x01 if v >= 0 => Ok(v),
        0x00 | 0x01 => Err("integer key sign byte does not match payload".to_string()),
        other => Err(format!("invalid integer key sign byte 0x{:02x}", other)),
    }
}

/// Encodes text as fixed-width 3-byte big-endian code points.
///
/// Three bytes cover the full Unicode range (max code point `0x10FFFF`),
/// keep decoding trivial (the suffix length is always a multiple of 3),
/// and sort in code point order.
pub fn encode_text(s: &str, buf: &mut Vec<u8>) {
    for ch in s.chars() {
        let cp = ch as u32;
        buf.extend_from_slice(&[(cp >> 16) as u8, (cp >> 8) as u8, cp as u8]);
    }
}

/// Decodes text from its 3-byte-per-character encoding.
pub fn decode_text(bytes: &[u8]) -> Result<String, String> {
    if bytes.len() % 3 != 0 {
        return Err(format!(
            "text key length {} is not a multiple of 3",
            bytes.len()
        ));
    }
    let mut out = String::with_capacity(bytes.len() / 3);
    for unit in bytes.chunks_exact(3) {
        let cp = u32::from(unit[0]) << 16 | u32::from(unit[1]) << 8 | u32::from(unit[2]);
        let ch = char::from_u32(cp)
            .ok_or_else(|| format!("invalid code point 0x{:x} in text key", cp))?;
        out.push(ch);
    }
    Ok(out)
}

/// Trait for logical keys that can be stored in a table.
///
/// Implementations must be injective and order-preserving: for keys
/// `k1 < k2` of the same type, `encode(k1) < encode(k2)` byte-wise.
/// Byte-sequence keys are the one deliberate exception: they are stored
/// verbatim, so byte-wise comparison *is* their ordering and callers must
/// make sure that matches their intent (notably for variable-length keys
/// sharing a prefix).
pub trait TableKey: Clone + Send + Sync + 'static {
    /// Appends this key's encoding to `buf` (after the table prefix).
    fn encode_key(&self, buf: &mut Vec<u8>);

    /// Decodes a key from the suffix of a physical key.
    fn decode_key(bytes: &[u8]) -> Result<Self, String>
    where
        Self: Sized;
}

impl TableKey for i64 {
    fn encode_key(&self, buf: &mut Vec<u8>) {
        encode_i64(*self, buf);
    }

    fn decode_key(bytes: &[u8]) -> Result<Self, String> {
        decode_i64(bytes)
    }
}

impl TableKey for Vec<u8> {
    fn encode_key(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self);
    }

    fn decode_key(bytes: &[u8]) -> Result<Self, String> {
        Ok(bytes.to_vec())
    }
}

impl TableKey for String {
    fn encode_key(&self, buf: &mut Vec<u8>) {
        encode_text(self, buf);
    }

    fn decode_key(bytes: &[u8]) -> Result<Self, String> {
        decode_text(bytes)
    }
}

/// Wrapper marking a structured value as a composite table key.
///
/// The inner value is marshaled with bincode's standard configuration.
/// Round-tripping is guaranteed; byte ordering is field-by-field and is
/// the caller's contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite<T>(pub T);

impl<T> TableKey for Composite<T>
where
    T: Encode + Decode<()> + Clone + Send + Sync + 'static,
{
    fn encode_key(&self, buf: &mut Vec<u8>) {
        let bytes = bincode::encode_to_vec(&self.0, bincode::config::standard())
            .expect("bincode encoding of a composite key should not fail");
        buf.extend_from_slice(&bytes);
    }

    fn decode_key(bytes: &[u8]) -> Result<Self, String> {
        let (inner, read) = bincode::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|e| format!("composite key decode error: {}", e))?;
        if read != bytes.len() {
            return Err(format!(
                "composite key decoded {} of {} bytes",
                read,
                bytes.len()
            ));
        }
        Ok(Composite(inner))
    }
}
