//! RocksDB wrapper for entity-atlas storage.
//!
//! Provides:
//! - Database open/close with column family setup
//! - Entity store reads/writes (point lookups, main-variant listing)
//! - The durable recovery queue: atomic enqueue, age-bounded selection,
//!   removal on confirmed success

use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use tracing::{debug, info};

use atlas_types::{Cause, Entity, QueueEntry};

use crate::column_families::{build_cf_descriptors, CF_ENTITIES, CF_RECOVERY_QUEUE};
use crate::error::StorageError;
use crate::keys::{EntityKey, QueueKey};

/// Main storage interface for entity-atlas.
///
/// Owns both the entity store and the recovery queue. The queue is the
/// single durable source of truth for "work remaining": an entry exists
/// until its index write is confirmed, and failure is represented by the
/// absence of removal.
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open storage at the given path, creating if necessary
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        info!("Opening storage at {:?}", path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_background_jobs(4);

        let cf_descriptors = build_cf_descriptors();
        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        Ok(Self { db })
    }

    // ==================== Entity Store Methods ====================

    /// Store an entity, replacing any previous row for the same id.
    pub fn put_entity(&self, entity: &Entity) -> Result<(), StorageError> {
        let cf = self
            .db
            .cf_handle(CF_ENTITIES)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(CF_ENTITIES.to_string()))?;

        let key = EntityKey::new(&entity.entity_id);
        let bytes = entity.to_bytes()?;
        self.db.put_cf(&cf, key.to_bytes(), bytes)?;

        debug!(entity_id = %entity.entity_id, "Stored entity");
        Ok(())
    }

    /// Get an entity by id.
    pub fn get_entity(&self, entity_id: &str) -> Result<Option<Entity>, StorageError> {
        let cf = self
            .db
            .cf_handle(CF_ENTITIES)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(CF_ENTITIES.to_string()))?;

        let key = EntityKey::new(entity_id);
        match self.db.get_cf(&cf, key.to_bytes())? {
            Some(bytes) => Ok(Some(Entity::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Delete an entity. Deleting an absent id is not an error.
    pub fn delete_entity(&self, entity_id: &str) -> Result<(), StorageError> {
        let cf = self
            .db
            .cf_handle(CF_ENTITIES)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(CF_ENTITIES.to_string()))?;

        let key = EntityKey::new(entity_id);
        self.db.delete_cf(&cf, key.to_bytes())?;

        debug!(entity_id = %entity_id, "Deleted entity");
        Ok(())
    }

    /// List the ids of all main-variant entities, in key order.
    ///
    /// Used by the bulk reindex path to snapshot the searchable universe.
    pub fn list_main_variant_ids(&self) -> Result<Vec<String>, StorageError> {
        let cf = self
            .db
            .cf_handle(CF_ENTITIES)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(CF_ENTITIES.to_string()))?;

        let prefix = EntityKey::prefix();
        let mut ids = Vec::new();

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            let entity = Entity::from_bytes(&value)?;
            if entity.is_main_variant() {
                ids.push(entity.entity_id);
            }
        }

        Ok(ids)
    }

    // ==================== Recovery Queue Methods ====================

    /// Create one durable queue entry per target id, atomically.
    ///
    /// Returns the created entries so the caller can drive indexing
    /// immediately without waiting for a sweep.
    pub fn enqueue(
        &self,
        target_ids: &[String],
        cause: Cause,
    ) -> Result<Vec<QueueEntry>, StorageError> {
        let entries: Vec<QueueEntry> = target_ids
            .iter()
            .map(|id| QueueEntry::new(id.clone(), cause))
            .collect();
        self.enqueue_entries(&entries)?;
        Ok(entries)
    }

    /// Write pre-built queue entries in a single atomic batch.
    pub fn enqueue_entries(&self, entries: &[QueueEntry]) -> Result<(), StorageError> {
        if entries.is_empty() {
            return Ok(());
        }

        let cf = self
            .db
            .cf_handle(CF_RECOVERY_QUEUE)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(CF_RECOVERY_QUEUE.to_string()))?;

        let mut batch = WriteBatch::default();
        for entry in entries {
            let key = QueueKey::from_entry_id(&entry.entry_id)?;
            batch.put_cf(&cf, key.to_bytes(), entry.to_bytes()?);
        }
        self.db.write(batch)?;

        debug!(count = entries.len(), "Enqueued recovery entries");
        Ok(())
    }

    /// Select up to `limit` entries enqueued strictly before the cutoff,
    /// oldest first.
    ///
    /// The cutoff keeps a sweep from racing an in-flight synchronous
    /// indexing call for an entry enqueued moments earlier.
    pub fn select_for_recovery(
        &self,
        max_age_cutoff_ms: i64,
        limit: usize,
    ) -> Result<Vec<QueueEntry>, StorageError> {
        let cf = self
            .db
            .cf_handle(CF_RECOVERY_QUEUE)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(CF_RECOVERY_QUEUE.to_string()))?;

        let mut results = Vec::new();
        let iter = self.db.iterator_cf(&cf, IteratorMode::Start);

        for item in iter {
            if results.len() >= limit {
                break;
            }
            let (key, value) = item?;
            let queue_key = QueueKey::from_bytes(&key)?;
            // Keys are ordered by enqueue time; everything past the cutoff
            // is younger still.
            if queue_key.enqueued_at_ms >= max_age_cutoff_ms {
                break;
            }
            let entry = QueueEntry::from_bytes(&value)?;
            results.push(entry);
        }

        Ok(results)
    }

    /// Remove a queue entry. Called only after its index write is
    /// confirmed successful.
    pub fn remove_entry(&self, entry_id: &str) -> Result<(), StorageError> {
        let cf = self
            .db
            .cf_handle(CF_RECOVERY_QUEUE)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(CF_RECOVERY_QUEUE.to_string()))?;

        let key = QueueKey::from_entry_id(entry_id)?;
        self.db.delete_cf(&cf, key.to_bytes())?;

        debug!(entry_id = %entry_id, "Removed queue entry");
        Ok(())
    }

    /// Number of pending queue entries (diagnostic).
    pub fn queue_len(&self) -> Result<usize, StorageError> {
        let cf = self
            .db
            .cf_handle(CF_RECOVERY_QUEUE)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(CF_RECOVERY_QUEUE.to_string()))?;

        let mut count = 0;
        let iter = self.db.iterator_cf(&cf, IteratorMode::Start);
        for item in iter {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// Flush all column families to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        for cf_name in crate::column_families::ALL_CF_NAMES {
            if let Some(cf) = self.db.cf_handle(cf_name) {
                self.db.flush_cf(&cf)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use ulid::Ulid;

    fn create_test_storage() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(temp_dir.path()).unwrap();
        (storage, temp_dir)
    }

    fn pinned_entry(ts_ms: i64, target_id: &str, cause: Cause) -> QueueEntry {
        QueueEntry::from_ulid(Ulid::from_parts(ts_ms as u64, rand::random()), target_id, cause)
    }

    #[test]
    fn test_open_creates_column_families() {
        let (storage, _temp) = create_test_storage();
        for cf_name in crate::column_families::ALL_CF_NAMES {
            assert!(
                storage.db.cf_handle(cf_name).is_some(),
                "CF {} should exist",
                cf_name
            );
        }
    }

    #[test]
    fn test_put_and_get_entity() {
        let (storage, _temp) = create_test_storage();

        let entity = Entity::new("ent-1", "Billing Service", "grp-payments")
            .with_description("Handles invoicing");
        storage.put_entity(&entity).unwrap();

        let retrieved = storage.get_entity("ent-1").unwrap();
        assert_eq!(retrieved, Some(entity));
    }

    #[test]
    fn test_get_entity_absent() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.get_entity("nope").unwrap().is_none());
    }

    #[test]
    fn test_put_entity_replaces() {
        let (storage, _temp) = create_test_storage();

        let entity = Entity::new("ent-1", "Old Name", "grp-a");
        storage.put_entity(&entity).unwrap();

        let updated = Entity::new("ent-1", "New Name", "grp-a");
        storage.put_entity(&updated).unwrap();

        let retrieved = storage.get_entity("ent-1").unwrap().unwrap();
        assert_eq!(retrieved.display_name, "New Name");
    }

    #[test]
    fn test_delete_entity() {
        let (storage, _temp) = create_test_storage();

        storage
            .put_entity(&Entity::new("ent-1", "Name", "grp-a"))
            .unwrap();
        storage.delete_entity("ent-1").unwrap();
        assert!(storage.get_entity("ent-1").unwrap().is_none());

        // Deleting again is not an error
        storage.delete_entity("ent-1").unwrap();
    }

    #[test]
    fn test_list_main_variant_ids_filters_branches() {
        let (storage, _temp) = create_test_storage();

        storage
            .put_entity(&Entity::new("ent-a", "A", "grp"))
            .unwrap();
        storage
            .put_entity(&Entity::new("ent-b", "B", "grp"))
            .unwrap();
        storage
            .put_entity(&Entity::new("ent-b-branch", "B", "grp").with_variant_of("ent-b"))
            .unwrap();

        let ids = storage.list_main_variant_ids().unwrap();
        assert_eq!(ids, vec!["ent-a".to_string(), "ent-b".to_string()]);
    }

    #[test]
    fn test_enqueue_returns_entries() {
        let (storage, _temp) = create_test_storage();

        let targets = vec!["ent-1".to_string(), "ent-2".to_string()];
        let entries = storage.enqueue(&targets, Cause::Creation).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].target_id, "ent-1");
        assert_eq!(entries[1].target_id, "ent-2");
        assert_eq!(storage.queue_len().unwrap(), 2);
    }

    #[test]
    fn test_enqueue_empty_is_noop() {
        let (storage, _temp) = create_test_storage();
        let entries = storage.enqueue(&[], Cause::Creation).unwrap();
        assert!(entries.is_empty());
        assert_eq!(storage.queue_len().unwrap(), 0);
    }

    #[test]
    fn test_select_for_recovery_oldest_first() {
        let (storage, _temp) = create_test_storage();

        let e3 = pinned_entry(3000, "ent-3", Cause::Creation);
        let e1 = pinned_entry(1000, "ent-1", Cause::Creation);
        let e2 = pinned_entry(2000, "ent-2", Cause::Creation);
        storage
            .enqueue_entries(&[e3.clone(), e1.clone(), e2.clone()])
            .unwrap();

        let selected = storage.select_for_recovery(10_000, 10).unwrap();
        assert_eq!(
            selected.iter().map(|e| e.target_id.as_str()).collect::<Vec<_>>(),
            vec!["ent-1", "ent-2", "ent-3"]
        );
    }

    #[test]
    fn test_select_for_recovery_respects_cutoff() {
        let (storage, _temp) = create_test_storage();

        storage
            .enqueue_entries(&[
                pinned_entry(1000, "old", Cause::Creation),
                pinned_entry(5000, "young", Cause::Creation),
            ])
            .unwrap();

        // Cutoff is exclusive: an entry enqueued exactly at the cutoff is
        // not yet due.
        let selected = storage.select_for_recovery(5000, 10).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].target_id, "old");
    }

    #[test]
    fn test_select_for_recovery_respects_limit() {
        let (storage, _temp) = create_test_storage();

        let entries: Vec<QueueEntry> = (0..5)
            .map(|i| pinned_entry(1000 + i * 100, &format!("ent-{}", i), Cause::BulkReindex))
            .collect();
        storage.enqueue_entries(&entries).unwrap();

        let selected = storage.select_for_recovery(10_000, 3).unwrap();
        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].target_id, "ent-0");
        assert_eq!(selected[2].target_id, "ent-2");
    }

    #[test]
    fn test_remove_entry() {
        let (storage, _temp) = create_test_storage();

        let entries = storage
            .enqueue(&["ent-1".to_string()], Cause::Deletion)
            .unwrap();
        assert_eq!(storage.queue_len().unwrap(), 1);

        storage.remove_entry(&entries[0].entry_id).unwrap();
        assert_eq!(storage.queue_len().unwrap(), 0);

        // Removing an already-removed entry is not an error
        storage.remove_entry(&entries[0].entry_id).unwrap();
    }

    #[test]
    fn test_queue_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let storage = Storage::open(temp_dir.path()).unwrap();
            storage
                .enqueue_entries(&[pinned_entry(1000, "ent-1", Cause::AnalysisCompleted)])
                .unwrap();
            storage.flush().unwrap();
        }

        let storage = Storage::open(temp_dir.path()).unwrap();
        let selected = storage.select_for_recovery(10_000, 10).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].target_id, "ent-1");
        assert_eq!(selected[0].cause, Cause::AnalysisCompleted);
    }

    #[test]
    fn test_duplicate_targets_are_kept() {
        let (storage, _temp) = create_test_storage();

        storage
            .enqueue_entries(&[
                pinned_entry(1000, "ent-1", Cause::Creation),
                pinned_entry(2000, "ent-1", Cause::AnalysisCompleted),
            ])
            .unwrap();

        // No dedup: idempotent processing makes duplicates harmless.
        assert_eq!(storage.queue_len().unwrap(), 2);
    }
}
