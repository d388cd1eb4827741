//! # atlas-search
//!
//! Full-text entity search for entity-atlas using Tantivy.
//!
//! This crate owns the search index collaborator: schema, index
//! lifecycle, the write path (upsert/delete/commit) and the BM25 read
//! path. It knows nothing about the recovery queue: a caller that
//! cannot complete a write simply observes a [`SearchError`] and retries
//! later.
//!
//! ## Features
//! - Embedded Tantivy index with MmapDirectory for persistence
//! - Idempotent upsert/delete keyed by entity id
//! - BM25 scoring over display name and description text

pub mod document;
pub mod error;
pub mod index;
pub mod schema;
pub mod searcher;
pub mod writer;

pub use document::index_document_to_doc;
pub use error::SearchError;
pub use index::{open_or_create_index, SearchIndex, SearchIndexConfig};
pub use schema::{build_entity_schema, EntitySchema};
pub use searcher::{EntityHit, EntitySearcher};
pub use writer::EntityIndexWriter;
