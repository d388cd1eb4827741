//! Write path for the entity index.
//!
//! Wraps IndexWriter with shared access via Arc<Mutex>. Writes are
//! buffered and not visible (or durable) until commit() is called.

use std::sync::{Arc, Mutex};

use tantivy::{IndexWriter, Term};
use tracing::{debug, info, warn};

use atlas_types::IndexDocument;

use crate::document::index_document_to_doc;
use crate::error::SearchError;
use crate::index::SearchIndex;
use crate::schema::EntitySchema;

/// Manages document write operations on the entity index.
///
/// Upsert and delete are idempotent: repeated application with the same
/// input converges to the same index state.
pub struct EntityIndexWriter {
    writer: Arc<Mutex<IndexWriter>>,
    schema: EntitySchema,
}

impl EntityIndexWriter {
    /// Create a new writer from a SearchIndex.
    pub fn new(index: &SearchIndex) -> Result<Self, SearchError> {
        let writer = index.writer()?;
        let schema = index.schema().clone();

        Ok(Self {
            writer: Arc::new(Mutex::new(writer)),
            schema,
        })
    }

    /// Upsert the document for its entity id.
    ///
    /// Any existing document with the same id is replaced.
    pub fn upsert(&self, document: &IndexDocument) -> Result<(), SearchError> {
        let doc = index_document_to_doc(&self.schema, document);

        let writer = self
            .writer
            .lock()
            .map_err(|e| SearchError::IndexLocked(e.to_string()))?;

        // Delete existing document with same ID (for update)
        let term = Term::from_field_text(self.schema.entity_id, &document.entity_id);
        writer.delete_term(term);

        writer.add_document(doc)?;

        debug!(entity_id = %document.entity_id, "Staged upsert");
        Ok(())
    }

    /// Delete any document for the given entity id.
    ///
    /// Deleting an absent id is not an error.
    pub fn delete(&self, entity_id: &str) -> Result<(), SearchError> {
        let writer = self
            .writer
            .lock()
            .map_err(|e| SearchError::IndexLocked(e.to_string()))?;

        let term = Term::from_field_text(self.schema.entity_id, entity_id);
        writer.delete_term(term);

        debug!(entity_id, "Staged delete");
        Ok(())
    }

    /// Commit pending changes to make them durable and searchable.
    ///
    /// This is expensive - batch writes before calling.
    pub fn commit(&self) -> Result<u64, SearchError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| SearchError::IndexLocked(e.to_string()))?;

        let opstamp = writer.commit()?;
        info!(opstamp, "Committed index changes");
        Ok(opstamp)
    }

    /// Rollback uncommitted changes.
    pub fn rollback(&self) -> Result<u64, SearchError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| SearchError::IndexLocked(e.to_string()))?;

        let opstamp = writer.rollback()?;
        warn!(opstamp, "Rolled back index changes");
        Ok(opstamp)
    }
}
