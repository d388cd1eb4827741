//! Column family definitions for RocksDB.
//!
//! Each column family isolates data with different access patterns:
//! - entities: canonical entity rows, point lookups (default compaction)
//! - recovery_queue: pending synchronization intents (FIFO compaction)

use rocksdb::{ColumnFamilyDescriptor, Options};

/// Column family name for canonical entity rows
pub const CF_ENTITIES: &str = "entities";

/// Column family name for the recovery queue
pub const CF_RECOVERY_QUEUE: &str = "recovery_queue";

/// All column family names
pub const ALL_CF_NAMES: &[&str] = &[CF_ENTITIES, CF_RECOVERY_QUEUE];

/// Create column family options for the recovery queue (FIFO for queue behavior)
fn recovery_queue_options() -> Options {
    let mut opts = Options::default();
    opts.set_compaction_style(rocksdb::DBCompactionStyle::Fifo);
    // Set max table files size for FIFO (required)
    opts.set_fifo_compaction_options(&rocksdb::FifoCompactOptions::default());
    opts
}

/// Build all column family descriptors
pub fn build_cf_descriptors() -> Vec<ColumnFamilyDescriptor> {
    vec![
        ColumnFamilyDescriptor::new(CF_ENTITIES, Options::default()),
        ColumnFamilyDescriptor::new(CF_RECOVERY_QUEUE, recovery_queue_options()),
    ]
}
