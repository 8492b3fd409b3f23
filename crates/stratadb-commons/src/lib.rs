//! # stratadb-commons
//!
//! Shared building blocks for StrataDB: the error taxonomy and the
//! order-preserving key codecs used by every table type.
//!
//! This crate deliberately stays small so that both the store layer and
//! application crates can depend on it without pulling in a storage engine.

pub mod errors;
pub mod keys;

pub use errors::{Result, StoreError};
pub use keys::{Composite, TableKey};
