//! Storage layer for entity-atlas.
//!
//! Provides RocksDB-backed storage with:
//! - Column family isolation for entities and the recovery queue
//! - Time-prefixed queue keys for oldest-first, age-bounded scans
//! - Atomic enqueue via WriteBatch
//! - Durable rows that survive process restart

pub mod column_families;
pub mod db;
pub mod error;
pub mod keys;

pub use db::Storage;
pub use error::StorageError;
pub use keys::{EntityKey, QueueKey};
