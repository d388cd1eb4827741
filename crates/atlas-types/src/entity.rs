//! Canonical entity state and its searchable projection.

use serde::{Deserialize, Serialize};

/// An entity as stored in the entity store.
///
/// Entities may have alternate variants (e.g. branches of a main line);
/// only the main variant is searchable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier
    pub entity_id: String,

    /// Human-readable display name
    pub display_name: String,

    /// Grouping/parent identifier
    pub group_id: String,

    /// Free-text description, searchable alongside the display name
    pub description: String,

    /// `Some(id)` when this is an alternate variant of another entity.
    /// `None` marks the main variant.
    pub variant_of: Option<String>,
}

impl Entity {
    /// Create a main-variant entity with an empty description.
    pub fn new(
        entity_id: impl Into<String>,
        display_name: impl Into<String>,
        group_id: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            display_name: display_name.into(),
            group_id: group_id.into(),
            description: String::new(),
            variant_of: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark this entity as an alternate variant of `main_id`.
    pub fn with_variant_of(mut self, main_id: impl Into<String>) -> Self {
        self.variant_of = Some(main_id.into());
        self
    }

    /// Whether this is the canonical (searchable) line of the entity.
    pub fn is_main_variant(&self) -> bool {
        self.variant_of.is_none()
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

/// Searchable projection of an entity.
///
/// Built fresh from entity store state at indexing time and never
/// persisted; staleness is resolved by always re-reading the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDocument {
    /// Entity identifier (the index primary key)
    pub entity_id: String,
    /// Display name
    pub display_name: String,
    /// Grouping/parent identifier
    pub group_id: String,
    /// Combined searchable text
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_roundtrip() {
        let entity = Entity::new("ent-1", "Billing Service", "grp-payments")
            .with_description("Handles invoicing");
        let bytes = entity.to_bytes().unwrap();
        let decoded = Entity::from_bytes(&bytes).unwrap();
        assert_eq!(entity, decoded);
    }

    #[test]
    fn test_main_variant() {
        let main = Entity::new("ent-1", "Billing Service", "grp-payments");
        assert!(main.is_main_variant());

        let branch = Entity::new("ent-1-b", "Billing Service", "grp-payments")
            .with_variant_of("ent-1");
        assert!(!branch.is_main_variant());
    }
}
