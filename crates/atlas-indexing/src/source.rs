//! Capability interface for resolving entities into index documents.
//!
//! One implementation per entity kind; the indexer and sweeper are
//! generic over it, so adding a searchable kind means adding an impl,
//! not touching the queue machinery.

use std::sync::Arc;

use atlas_storage::Storage;
use atlas_types::{Entity, IndexDocument};

use crate::error::IndexingError;

/// Resolves current store state into searchable projections.
pub trait DocumentSource: Send + Sync {
    /// Projection of current store state for one entity.
    type Projection;

    /// Resolve current state for `entity_id`.
    ///
    /// `None` means the desired index state is "no document": the entity
    /// is absent, or it is not a main variant.
    fn resolve(&self, entity_id: &str) -> Result<Option<Self::Projection>, IndexingError>;

    /// Build the searchable projection.
    ///
    /// Always called on freshly resolved state; there is no cached copy
    /// to go stale.
    fn to_document(&self, projection: &Self::Projection) -> IndexDocument;
}

/// Document source for plain entities, backed by the entity store.
pub struct EntitySource {
    storage: Arc<Storage>,
}

impl EntitySource {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl DocumentSource for EntitySource {
    type Projection = Entity;

    fn resolve(&self, entity_id: &str) -> Result<Option<Entity>, IndexingError> {
        let entity = self.storage.get_entity(entity_id)?;
        // Non-main variants are never searchable.
        Ok(entity.filter(|e| e.is_main_variant()))
    }

    fn to_document(&self, entity: &Entity) -> IndexDocument {
        let text = if entity.description.is_empty() {
            entity.display_name.clone()
        } else {
            format!("{} {}", entity.display_name, entity.description)
        };

        IndexDocument {
            entity_id: entity.entity_id.clone(),
            display_name: entity.display_name.clone(),
            group_id: entity.group_id.clone(),
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_source() -> (EntitySource, Arc<Storage>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(Storage::open(temp_dir.path()).unwrap());
        (EntitySource::new(storage.clone()), storage, temp_dir)
    }

    #[test]
    fn test_resolve_main_variant() {
        let (source, storage, _temp) = create_source();

        storage
            .put_entity(&Entity::new("ent-1", "Billing", "grp"))
            .unwrap();

        let resolved = source.resolve("ent-1").unwrap();
        assert!(resolved.is_some());
    }

    #[test]
    fn test_resolve_absent_is_none() {
        let (source, _storage, _temp) = create_source();
        assert!(source.resolve("ent-missing").unwrap().is_none());
    }

    #[test]
    fn test_resolve_branch_variant_is_none() {
        let (source, storage, _temp) = create_source();

        storage
            .put_entity(&Entity::new("ent-1-b", "Billing", "grp").with_variant_of("ent-1"))
            .unwrap();

        assert!(source.resolve("ent-1-b").unwrap().is_none());
    }

    #[test]
    fn test_to_document_combines_text() {
        let (source, _storage, _temp) = create_source();

        let entity =
            Entity::new("ent-1", "Billing", "grp-payments").with_description("Handles invoicing");
        let doc = source.to_document(&entity);

        assert_eq!(doc.entity_id, "ent-1");
        assert_eq!(doc.display_name, "Billing");
        assert_eq!(doc.group_id, "grp-payments");
        assert_eq!(doc.text, "Billing Handles invoicing");
    }

    #[test]
    fn test_to_document_empty_description() {
        let (source, _storage, _temp) = create_source();

        let entity = Entity::new("ent-1", "Billing", "grp-payments");
        let doc = source.to_document(&entity);
        assert_eq!(doc.text, "Billing");
    }
}
