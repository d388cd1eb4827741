//! Search index write boundary.
//!
//! The indexer talks to the search index only through this trait, so
//! tests can substitute a failing collaborator without any global
//! "index is read-only" state.

use std::sync::Arc;

use atlas_search::{EntityIndexWriter, SearchError, SearchIndex};
use atlas_types::IndexDocument;

/// Write operations the search index exposes.
///
/// Upsert and delete are idempotent; repeated application with the same
/// input converges to the same end state. Writes may be buffered until
/// [`SearchBackend::commit`], which is the point of confirmation.
pub trait SearchBackend: Send + Sync {
    /// Stage an upsert of the document, keyed by its entity id.
    fn upsert(&self, document: &IndexDocument) -> Result<(), SearchError>;

    /// Stage a delete for the entity id. Deleting an absent id is ok.
    fn delete(&self, entity_id: &str) -> Result<(), SearchError>;

    /// Make staged writes durable and visible.
    fn commit(&self) -> Result<(), SearchError>;
}

impl<B: SearchBackend + ?Sized> SearchBackend for Arc<B> {
    fn upsert(&self, document: &IndexDocument) -> Result<(), SearchError> {
        (**self).upsert(document)
    }

    fn delete(&self, entity_id: &str) -> Result<(), SearchError> {
        (**self).delete(entity_id)
    }

    fn commit(&self) -> Result<(), SearchError> {
        (**self).commit()
    }
}

/// Production backend over the Tantivy entity index.
pub struct TantivyBackend {
    writer: EntityIndexWriter,
}

impl TantivyBackend {
    pub fn new(writer: EntityIndexWriter) -> Self {
        Self { writer }
    }

    /// Convenience constructor from an open index.
    pub fn open(index: &SearchIndex) -> Result<Self, SearchError> {
        Ok(Self {
            writer: EntityIndexWriter::new(index)?,
        })
    }
}

impl SearchBackend for TantivyBackend {
    fn upsert(&self, document: &IndexDocument) -> Result<(), SearchError> {
        self.writer.upsert(document)
    }

    fn delete(&self, entity_id: &str) -> Result<(), SearchError> {
        self.writer.delete(entity_id)
    }

    fn commit(&self) -> Result<(), SearchError> {
        self.writer.commit().map(|_| ())
    }
}
