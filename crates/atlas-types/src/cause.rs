//! Mutation causes and index relevance classification.
//!
//! Every entity mutation carries a cause. Only a subset of causes touches
//! fields that are indexed for search; the rest must never produce a queue
//! entry or an index write.

use serde::{Deserialize, Serialize};

/// The classified reason an entity mutation occurred.
///
/// Closed enumeration: a persisted row carrying a value outside this set
/// fails deserialization, which surfaces as a hard error to the reader.
/// It indicates a caller bug, not a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    /// Entity was created
    Creation,
    /// Entity was removed from the entity store
    Deletion,
    /// A re-analysis of the entity completed
    AnalysisCompleted,
    /// Metadata tags were edited
    MetadataTagUpdate,
    /// Access permissions changed
    PermissionChange,
    /// Startup or administrative full reindex
    BulkReindex,
}

impl Cause {
    /// Whether a mutation with this cause must be reflected in the search
    /// index.
    ///
    /// Tag and permission changes do not affect indexed searchable fields,
    /// so they are synchronization no-ops rather than failures.
    pub fn is_index_relevant(&self) -> bool {
        match self {
            Cause::Creation | Cause::Deletion | Cause::AnalysisCompleted | Cause::BulkReindex => {
                true
            }
            Cause::MetadataTagUpdate | Cause::PermissionChange => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cause::Creation => "creation",
            Cause::Deletion => "deletion",
            Cause::AnalysisCompleted => "analysis_completed",
            Cause::MetadataTagUpdate => "metadata_tag_update",
            Cause::PermissionChange => "permission_change",
            Cause::BulkReindex => "bulk_reindex",
        }
    }
}

impl std::fmt::Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevant_causes() {
        assert!(Cause::Creation.is_index_relevant());
        assert!(Cause::Deletion.is_index_relevant());
        assert!(Cause::AnalysisCompleted.is_index_relevant());
        assert!(Cause::BulkReindex.is_index_relevant());
    }

    #[test]
    fn test_non_relevant_causes() {
        assert!(!Cause::MetadataTagUpdate.is_index_relevant());
        assert!(!Cause::PermissionChange.is_index_relevant());
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Cause::AnalysisCompleted).unwrap();
        assert_eq!(json, "\"analysis_completed\"");
        let back: Cause = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Cause::AnalysisCompleted);
    }

    #[test]
    fn test_unknown_cause_is_rejected() {
        let result = serde_json::from_str::<Cause>("\"schema_migration\"");
        assert!(result.is_err());
    }
}
