//! Error types for the synchronization core.

use atlas_search::SearchError;
use atlas_storage::StorageError;
use thiserror::Error;

/// Errors that can abort a synchronization call.
///
/// Per-entry index failures are never represented here; they are
/// aggregated into [`crate::IndexingResult`] failures. An `Err` from the
/// indexer means an entry-independent defect, typically the recovery
/// queue itself being unreachable.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Storage operation failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Search index error
    #[error("Search error: {0}")]
    Search(#[from] SearchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IndexingError::Storage(StorageError::Key("bad key".to_string()));
        assert_eq!(err.to_string(), "Storage error: Key error: bad key");
    }
}
