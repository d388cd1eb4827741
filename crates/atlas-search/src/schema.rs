//! Tantivy schema definition for entity search.
//!
//! One document per main-variant entity, keyed by entity id.

use tantivy::schema::{Field, Schema, STORED, STRING, TEXT};

use crate::SearchError;

/// Schema field handles for efficient access
#[derive(Debug, Clone)]
pub struct EntitySchema {
    schema: Schema,
    /// Primary key: the entity id (STRING | STORED)
    pub entity_id: Field,
    /// Display name (TEXT | STORED)
    pub name: Field,
    /// Grouping/parent identifier (STRING | STORED)
    pub group_id: Field,
    /// Combined searchable text (TEXT)
    pub text: Field,
}

impl EntitySchema {
    /// Get the underlying Tantivy schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create an EntitySchema from an existing Tantivy Schema
    pub fn from_schema(schema: Schema) -> Result<Self, SearchError> {
        let entity_id = schema
            .get_field("entity_id")
            .map_err(|_| SearchError::SchemaMismatch("missing entity_id field".into()))?;
        let name = schema
            .get_field("name")
            .map_err(|_| SearchError::SchemaMismatch("missing name field".into()))?;
        let group_id = schema
            .get_field("group_id")
            .map_err(|_| SearchError::SchemaMismatch("missing group_id field".into()))?;
        let text = schema
            .get_field("text")
            .map_err(|_| SearchError::SchemaMismatch("missing text field".into()))?;

        Ok(Self {
            schema,
            entity_id,
            name,
            group_id,
            text,
        })
    }
}

/// Build the entity search schema.
///
/// Schema fields:
/// - entity_id: STRING | STORED - primary key
/// - name: TEXT | STORED - display name, searchable and retrievable
/// - group_id: STRING | STORED - grouping/parent identifier
/// - text: TEXT - combined searchable content
pub fn build_entity_schema() -> EntitySchema {
    let mut schema_builder = Schema::builder();

    let entity_id = schema_builder.add_text_field("entity_id", STRING | STORED);
    let name = schema_builder.add_text_field("name", TEXT | STORED);
    let group_id = schema_builder.add_text_field("group_id", STRING | STORED);
    let text = schema_builder.add_text_field("text", TEXT);

    let schema = schema_builder.build();

    EntitySchema {
        schema,
        entity_id,
        name,
        group_id,
        text,
    }
}
