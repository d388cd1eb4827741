//! Failure and recovery scenarios: a write-locked index, partial batch
//! failure, and the sweep that converges the index once the index is
//! available again.

use std::sync::Arc;

use chrono::Utc;

use atlas_indexing::{RecoveryConfig, RecoverySweeper};
use atlas_types::Cause;
use e2e_tests::{insert_entities, sample_entity, TestHarness};

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[test]
fn errors_during_indexing_are_recovered() {
    let harness = TestHarness::new();
    insert_entities(
        &harness.storage,
        &[sample_entity("ent-1", "Billing Service", "grp-payments")],
    );

    let (indexer, backend) = harness.flaky_indexer();
    let indexer = Arc::new(indexer);
    let sweeper = RecoverySweeper::new(
        harness.storage.clone(),
        indexer.clone(),
        RecoveryConfig::default().with_visibility_delay_ms(0),
    );

    // The index rejects writes: the entry is counted as a failure and
    // stays queued.
    backend.set_unavailable(true);
    let result = indexer.index_entity("ent-1", Cause::Creation).unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.failures, 1);
    assert_eq!(harness.storage.queue_len().unwrap(), 1);
    assert_eq!(harness.searcher().doc_count().unwrap(), 0);

    // Index is still read-only, fail to recover.
    let result = sweeper.recover(now_ms() + 1_000).unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.failures, 1);
    assert_eq!(harness.searcher().doc_count().unwrap(), 0);

    backend.set_unavailable(false);

    let result = sweeper.recover(now_ms() + 1_000).unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.failures, 0);
    assert_eq!(harness.searcher().all_ids().unwrap(), vec!["ent-1"]);
    assert_eq!(harness.storage.queue_len().unwrap(), 0);
}

#[test]
fn recovery_converges_index_to_store() {
    let harness = TestHarness::new();
    let entities: Vec<_> = (0..4)
        .map(|i| sample_entity(&format!("ent-{}", i), &format!("Entity {}", i), "grp"))
        .collect();
    insert_entities(&harness.storage, &entities);

    let (indexer, backend) = harness.flaky_indexer();
    let indexer = Arc::new(indexer);
    let sweeper = RecoverySweeper::new(
        harness.storage.clone(),
        indexer.clone(),
        RecoveryConfig::default()
            .with_visibility_delay_ms(0)
            .with_batch_limit(2),
    );

    backend.set_unavailable(true);
    let result = indexer.index_all().unwrap();
    assert_eq!(result.total, 4);
    assert_eq!(result.failures, 4);
    assert_eq!(harness.storage.queue_len().unwrap(), 4);

    backend.set_unavailable(false);
    let result = sweeper.recover_until_clean(now_ms() + 1_000, 10).unwrap();
    assert_eq!(result.success, 4);
    assert_eq!(harness.storage.queue_len().unwrap(), 0);

    // The index now matches the entity store exactly.
    let mut indexed = harness.searcher().all_ids().unwrap();
    indexed.sort();
    let stored = harness.storage.list_main_variant_ids().unwrap();
    assert_eq!(indexed, stored);
}

#[test]
fn sweep_does_not_race_fresh_entries() {
    let harness = TestHarness::new();
    insert_entities(
        &harness.storage,
        &[sample_entity("ent-1", "Billing Service", "grp-payments")],
    );

    let (indexer, _backend) = harness.flaky_indexer();
    let indexer = Arc::new(indexer);
    let sweeper = RecoverySweeper::new(
        harness.storage.clone(),
        indexer,
        RecoveryConfig::default().with_visibility_delay_ms(60_000),
    );

    // Enqueued just now: within the visibility delay, a sweep must leave
    // it for the in-flight synchronous call.
    harness
        .storage
        .enqueue(&["ent-1".to_string()], Cause::Creation)
        .unwrap();

    let result = sweeper.recover(now_ms()).unwrap();
    assert_eq!(result.total, 0);
    assert_eq!(harness.storage.queue_len().unwrap(), 1);
}

#[test]
fn overlapping_passes_converge_to_one_document() {
    let harness = TestHarness::new();
    insert_entities(
        &harness.storage,
        &[sample_entity("ent-1", "Billing Service", "grp-payments")],
    );

    let indexer = harness.indexer();
    let entries = harness
        .storage
        .enqueue(&["ent-1".to_string()], Cause::Creation)
        .unwrap();

    // The same entries applied twice (as an overlapping sweep would)
    // leave the index in the same end state as applying them once.
    indexer.index(&entries).unwrap();
    indexer.index(&entries).unwrap();

    assert_eq!(harness.searcher().all_ids().unwrap(), vec!["ent-1"]);
    assert_eq!(harness.storage.queue_len().unwrap(), 0);
}
