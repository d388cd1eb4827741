//! Key encoding and decoding for the storage layer.
//!
//! Queue key format: `rq:{enqueued_at_ms:013}:{ulid}`
//! - enqueued_at_ms: milliseconds since Unix epoch, zero-padded to 13 digits
//! - ulid: 26-character ULID for uniqueness within the same millisecond
//!
//! Zero-padding makes lexicographic column-family order oldest-first, so an
//! age-bounded scan can stop at the first key at or past the cutoff.

use ulid::Ulid;

use crate::error::StorageError;

/// Key for canonical entity rows
/// Format: ent:{entity_id}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityKey {
    pub entity_id: String,
}

impl EntityKey {
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
        }
    }

    /// Encode key to bytes for storage
    pub fn to_bytes(&self) -> Vec<u8> {
        format!("ent:{}", self.entity_id).into_bytes()
    }

    /// Prefix shared by all entity keys
    pub fn prefix() -> &'static [u8] {
        b"ent:"
    }
}

/// Key for recovery queue entries
/// Format: rq:{enqueued_at_ms:013}:{ulid}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueKey {
    /// Enqueue timestamp in milliseconds
    pub enqueued_at_ms: i64,
    /// Unique identifier (also serves as entry_id)
    pub ulid: Ulid,
}

impl QueueKey {
    /// Create a queue key from existing timestamp and ULID
    pub fn from_parts(enqueued_at_ms: i64, ulid: Ulid) -> Self {
        Self {
            enqueued_at_ms,
            ulid,
        }
    }

    /// Rebuild a queue key from an entry_id string.
    ///
    /// The ULID carries its timestamp, which is the enqueue time by
    /// construction, so the full key is recoverable from the id alone.
    pub fn from_entry_id(entry_id: &str) -> Result<Self, StorageError> {
        let ulid: Ulid = entry_id
            .parse()
            .map_err(|e| StorageError::Key(format!("Invalid entry_id ULID: {}", e)))?;
        let enqueued_at_ms = ulid.timestamp_ms() as i64;
        Ok(Self {
            enqueued_at_ms,
            ulid,
        })
    }

    /// Encode key to bytes for storage
    pub fn to_bytes(&self) -> Vec<u8> {
        format!("rq:{:013}:{}", self.enqueued_at_ms, self.ulid).into_bytes()
    }

    /// Decode key from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| StorageError::Key(format!("Invalid UTF-8: {}", e)))?;

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 || parts[0] != "rq" {
            return Err(StorageError::Key(format!("Invalid queue key format: {}", s)));
        }

        let enqueued_at_ms: i64 = parts[1]
            .parse()
            .map_err(|e| StorageError::Key(format!("Invalid timestamp: {}", e)))?;
        let ulid: Ulid = parts[2]
            .parse()
            .map_err(|e| StorageError::Key(format!("Invalid ULID: {}", e)))?;

        Ok(Self {
            enqueued_at_ms,
            ulid,
        })
    }

    /// Get the entry_id (ULID string) for this key
    pub fn entry_id(&self) -> String {
        self.ulid.to_string()
    }
}
