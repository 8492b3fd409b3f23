//! Shared error types for StrataDB.
//!
//! The taxonomy separates failures by where they can be handled:
//!
//! - `EngineOpen`, `Engine`, `Closed` come from the underlying ordered
//!   key-value engine and abort the operation that hit them.
//! - `CorruptRecord` and `KeyDecode` indicate data corruption. They are
//!   never skipped silently; a corrupt entry aborts the `get` or walk
//!   that encountered it, since skipping could mask data loss.
//! - `Serialization` covers value encoding failures before anything is
//!   staged.

use std::fmt;

/// Result type alias using StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error type for StrataDB storage operations.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// The underlying engine failed to open. The keyspace handle is left
    /// empty and unusable.
    EngineOpen(String),

    /// An operation was attempted after `close()`.
    Closed,

    /// Generic failure from the underlying engine (cursor, read or batch
    /// write error).
    Engine(String),

    /// A stored record failed to decode: unknown format tag or a broken
    /// payload. Indicates data corruption.
    CorruptRecord {
        table: String,
        table_id: u32,
        detail: String,
    },

    /// A physical key suffix could not be decoded back into a logical key
    /// during a range walk.
    KeyDecode(String),

    /// A value could not be serialized for storage.
    Serialization(String),

    /// Internal lock poisoning (a writer panicked while holding a lock).
    LockPoisoned(String),
}

impl StoreError {
    /// Creates an `Engine` error with a message.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Creates a `KeyDecode` error with a message.
    pub fn key_decode(msg: impl Into<String>) -> Self {
        Self::KeyDecode(msg.into())
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::EngineOpen(msg) => write!(f, "engine open failed: {}", msg),
            StoreError::Closed => write!(f, "keyspace is closed"),
            StoreError::Engine(msg) => write!(f, "engine error: {}", msg),
            StoreError::CorruptRecord {
                table,
                table_id,
                detail,
            } => write!(f, "corrupt record in table({},{}): {}", table, table_id, detail),
            StoreError::KeyDecode(msg) => write!(f, "key decode error: {}", msg),
            StoreError::Serialization(msg) => write!(f, "serialization error: {}", msg),
            StoreError::LockPoisoned(msg) => write!(f, "lock poisoned: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
