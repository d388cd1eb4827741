//! Search error types.

use thiserror::Error;

/// Errors that can occur during search operations.
///
/// Any variant returned from a write means the index is unavailable for
/// that write; callers retain their queue entry and retry later.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Tantivy index error
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    /// Query parse error
    #[error("Query parse error: {0}")]
    QueryParse(#[from] tantivy::query::QueryParserError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema mismatch
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Index is locked (another writer holds it)
    #[error("Index is locked: {0}")]
    IndexLocked(String),
}
