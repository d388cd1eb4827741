//! Recovery queue entry type.
//!
//! Entries are durable synchronization intents, written before any index
//! write is attempted. They are never mutated in place: failure is
//! represented by absence of removal, not by a status field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::Cause;

/// A pending synchronization intent for one entity.
///
/// Multiple entries may exist for the same target; processing is
/// idempotent, so duplicates are harmless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Unique entry id; a ULID whose embedded timestamp is the enqueue time
    pub entry_id: String,

    /// Identifier of the entity to synchronize
    pub target_id: String,

    /// Why the target must be synchronized
    pub cause: Cause,

    /// Enqueue time, milliseconds since the Unix epoch
    pub enqueued_at_ms: i64,
}

impl QueueEntry {
    /// Create an entry with a fresh ULID.
    ///
    /// The enqueue timestamp is taken from the ULID so the queue key can
    /// be rebuilt from the entry id alone.
    pub fn new(target_id: impl Into<String>, cause: Cause) -> Self {
        let ulid = Ulid::new();
        Self {
            entry_id: ulid.to_string(),
            target_id: target_id.into(),
            cause,
            enqueued_at_ms: ulid.timestamp_ms() as i64,
        }
    }

    /// Create an entry from an existing ULID (tests use this to pin the
    /// enqueue timestamp).
    pub fn from_ulid(ulid: Ulid, target_id: impl Into<String>, cause: Cause) -> Self {
        Self {
            entry_id: ulid.to_string(),
            target_id: target_id.into(),
            cause,
            enqueued_at_ms: ulid.timestamp_ms() as i64,
        }
    }

    /// Enqueue time as a UTC datetime, if the stored millis are in range.
    pub fn enqueued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.enqueued_at_ms)
    }

    /// Serialize to JSON bytes for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
