//! The indexer: consumes recovery queue entries and converges the
//! search index onto current entity store state.
//!
//! Two public entry points compose on the same batch primitive: a bulk
//! snapshot reindex (startup/administrative) and synchronous per-event
//! indexing. Both enqueue durably before touching the index, so a crash
//! between the two still leaves a recoverable entry.

use std::sync::Arc;

use tracing::{debug, info, warn};

use atlas_storage::Storage;
use atlas_types::{Cause, QueueEntry};

use crate::backend::SearchBackend;
use crate::error::IndexingError;
use crate::result::IndexingResult;
use crate::source::DocumentSource;

/// Applies queue entries to the search index.
///
/// Holds no lock on either collaborator; correctness rests on idempotent
/// upsert/delete and on the queue being the single durable record of
/// work remaining.
pub struct EntityIndexer<S, B> {
    storage: Arc<Storage>,
    source: S,
    backend: B,
}

impl<S: DocumentSource, B: SearchBackend> EntityIndexer<S, B> {
    pub fn new(storage: Arc<Storage>, source: S, backend: B) -> Self {
        Self {
            storage,
            source,
            backend,
        }
    }

    /// Synchronize one entity in response to a live mutation event.
    ///
    /// Non-relevant causes produce zero queue entries and zero index
    /// writes. Relevant causes enqueue durably, then immediately drive
    /// the created entries through [`EntityIndexer::index`].
    pub fn index_entity(
        &self,
        entity_id: &str,
        cause: Cause,
    ) -> Result<IndexingResult, IndexingError> {
        if !cause.is_index_relevant() {
            debug!(entity_id, cause = %cause, "Cause is not index-relevant, nothing to do");
            return Ok(IndexingResult::new());
        }

        let entries = self.storage.enqueue(&[entity_id.to_string()], cause)?;
        self.index(&entries)
    }

    /// Reindex every current main-variant entity.
    ///
    /// The bulk path used at startup and by administrators: the whole
    /// searchable universe is enqueued under `BulkReindex` and indexed.
    pub fn index_all(&self) -> Result<IndexingResult, IndexingError> {
        let ids = self.storage.list_main_variant_ids()?;
        if ids.is_empty() {
            debug!("No main-variant entities, bulk reindex is a no-op");
            return Ok(IndexingResult::new());
        }

        info!(count = ids.len(), "Bulk reindexing all main-variant entities");
        let entries = self.storage.enqueue(&ids, Cause::BulkReindex)?;
        self.index(&entries)
    }

    /// Apply a batch of queue entries, in the order given.
    ///
    /// Per entry: resolve current store state, stage an upsert (present
    /// main variant) or a delete (absent or non-main). A failed stage is
    /// counted and the entry retained. One commit confirms the batch;
    /// only then are the staged entries removed from the queue. A failed
    /// commit converts every staged entry into a failure.
    ///
    /// Returns `Err` only for entry-independent defects (the queue
    /// itself failing): without the queue there is nowhere to safely
    /// park unfinished work.
    pub fn index(&self, entries: &[QueueEntry]) -> Result<IndexingResult, IndexingError> {
        let mut result = IndexingResult::new();
        if entries.is_empty() {
            return Ok(result);
        }

        let mut staged: Vec<&QueueEntry> = Vec::new();
        for entry in entries {
            match self.apply(entry) {
                Ok(()) => staged.push(entry),
                Err(e) => {
                    warn!(
                        entry_id = %entry.entry_id,
                        target_id = %entry.target_id,
                        error = %e,
                        "Index write failed, entry retained for recovery"
                    );
                    result.record_failure();
                }
            }
        }

        if staged.is_empty() {
            return Ok(result);
        }

        match self.backend.commit() {
            Ok(()) => {
                for entry in &staged {
                    self.storage.remove_entry(&entry.entry_id)?;
                    result.record_success();
                }
                debug!(
                    success = result.success,
                    failures = result.failures,
                    "Indexing batch committed"
                );
            }
            Err(e) => {
                warn!(
                    staged = staged.len(),
                    error = %e,
                    "Index commit failed, staged entries retained for recovery"
                );
                for _ in &staged {
                    result.record_failure();
                }
            }
        }

        Ok(result)
    }

    /// Stage the index operation for one entry.
    ///
    /// Absent-or-non-main resolves to "no document", which is a delete.
    /// An entity that vanished under a non-deletion cause is treated the
    /// same as a deletion, not as an error.
    fn apply(&self, entry: &QueueEntry) -> Result<(), IndexingError> {
        match self.source.resolve(&entry.target_id)? {
            Some(projection) => {
                let document = self.source.to_document(&projection);
                self.backend.upsert(&document)?;
            }
            None => {
                self.backend.delete(&entry.target_id)?;
            }
        }
        Ok(())
    }
}
