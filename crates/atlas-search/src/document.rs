//! Document mapping from the entity projection to Tantivy documents.

use tantivy::doc;
use tantivy::TantivyDocument;

use atlas_types::IndexDocument;

use crate::schema::EntitySchema;

/// Convert an [`IndexDocument`] projection to a Tantivy document.
pub fn index_document_to_doc(schema: &EntitySchema, document: &IndexDocument) -> TantivyDocument {
    doc!(
        schema.entity_id => document.entity_id.clone(),
        schema.name => document.display_name.clone(),
        schema.group_id => document.group_id.clone(),
        schema.text => document.text.clone()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build_entity_schema;
    use tantivy::schema::Value;

    fn sample_document() -> IndexDocument {
        IndexDocument {
            entity_id: "ent-1".to_string(),
            display_name: "Billing Service".to_string(),
            group_id: "grp-payments".to_string(),
            text: "Billing Service Handles invoicing and payment reconciliation".to_string(),
        }
    }

    #[test]
    fn test_index_document_to_doc() {
        let schema = build_entity_schema();
        let document = sample_document();

        let doc = index_document_to_doc(&schema, &document);

        let entity_id = doc.get_first(schema.entity_id).unwrap();
        assert_eq!(entity_id.as_str(), Some("ent-1"));

        let name = doc.get_first(schema.name).unwrap();
        assert_eq!(name.as_str(), Some("Billing Service"));

        let group_id = doc.get_first(schema.group_id).unwrap();
        assert_eq!(group_id.as_str(), Some("grp-payments"));

        let text = doc.get_first(schema.text).unwrap();
        assert!(text.as_str().unwrap().contains("invoicing"));
    }
}
