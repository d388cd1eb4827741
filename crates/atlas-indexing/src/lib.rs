//! Index synchronization core for entity-atlas.
//!
//! Keeps the search index eventually consistent with the entity store.
//! Writes to the index cannot share a transaction with the store, so
//! every index-relevant mutation is first recorded as a durable recovery
//! queue entry; the indexer applies it and removes the entry only on
//! confirmed success, and a periodic recovery sweep re-drives whatever
//! was left behind by failures.
//!
//! ## Key Components
//!
//! - [`IndexingResult`]: per-batch accounting (total/success/failures)
//! - [`DocumentSource`]: capability interface resolving an id to its
//!   searchable projection, one impl per entity kind
//! - [`SearchBackend`]: the search index write boundary
//! - [`EntityIndexer`]: consumes queue entries and converges the index
//! - [`RecoverySweeper`]: re-selects pending entries and resubmits them
//!
//! ## Flow
//!
//! 1. A mutation's cause is classified; non-relevant causes are no-ops
//! 2. Relevant causes enqueue one durable entry per target, then index
//! 3. A failed index write leaves the entry in place
//! 4. The sweeper periodically re-drives entries older than the
//!    visibility delay until the queue drains

pub mod backend;
pub mod error;
pub mod indexer;
pub mod overlap;
pub mod recovery;
pub mod result;
pub mod source;

pub use backend::{SearchBackend, TantivyBackend};
pub use error::IndexingError;
pub use indexer::EntityIndexer;
pub use overlap::{OverlapGuard, RunGuard};
pub use recovery::{RecoveryConfig, RecoverySweeper};
pub use result::IndexingResult;
pub use source::{DocumentSource, EntitySource};
