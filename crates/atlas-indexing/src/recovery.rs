//! Recovery sweep: re-drives queue entries left behind by failures.
//!
//! A sweep selects pending entries older than a visibility delay and
//! feeds them back through the indexer. It is safe to run concurrently
//! with live per-event indexing and with itself: entries observed by
//! overlapping sweeps are processed twice, which idempotent upsert and
//! delete make harmless.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use atlas_storage::Storage;

use crate::backend::SearchBackend;
use crate::error::IndexingError;
use crate::indexer::EntityIndexer;
use crate::overlap::OverlapGuard;
use crate::result::IndexingResult;
use crate::source::DocumentSource;

/// Configuration for recovery sweeps.
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Minimum entry age before a sweep will pick it up (default: 30s)
    ///
    /// Prevents a sweep from racing the in-flight synchronous indexing
    /// call for an entry enqueued moments earlier.
    pub visibility_delay_ms: i64,

    /// Maximum entries per sweep batch (default: 100)
    ///
    /// Bounds sweep duration; entries beyond the limit simply remain for
    /// the next sweep, never discarded.
    pub batch_limit: usize,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            visibility_delay_ms: 30_000,
            batch_limit: 100,
        }
    }
}

impl RecoveryConfig {
    /// Set the visibility delay in milliseconds.
    pub fn with_visibility_delay_ms(mut self, delay_ms: i64) -> Self {
        self.visibility_delay_ms = delay_ms;
        self
    }

    /// Set the per-sweep batch limit.
    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit;
        self
    }
}

/// Periodic or on-demand driver that repairs partial failures.
pub struct RecoverySweeper<S, B> {
    storage: Arc<Storage>,
    indexer: Arc<EntityIndexer<S, B>>,
    config: RecoveryConfig,
    guard: OverlapGuard,
}

impl<S: DocumentSource, B: SearchBackend> RecoverySweeper<S, B> {
    pub fn new(
        storage: Arc<Storage>,
        indexer: Arc<EntityIndexer<S, B>>,
        config: RecoveryConfig,
    ) -> Self {
        Self {
            storage,
            indexer,
            config,
            guard: OverlapGuard::new(),
        }
    }

    /// One sweep pass.
    ///
    /// Selects up to `batch_limit` entries enqueued before
    /// `now_ms - visibility_delay_ms` and resubmits them to the indexer.
    pub fn recover(&self, now_ms: i64) -> Result<IndexingResult, IndexingError> {
        let cutoff = now_ms - self.config.visibility_delay_ms;
        let entries = self
            .storage
            .select_for_recovery(cutoff, self.config.batch_limit)?;

        if entries.is_empty() {
            debug!("No queue entries due for recovery");
            return Ok(IndexingResult::new());
        }

        info!(count = entries.len(), "Recovering queue entries");
        self.indexer.index(&entries)
    }

    /// Sweep repeatedly until a round makes no progress, up to
    /// `max_rounds`.
    ///
    /// A round that selects nothing, or whose every entry failed, stops
    /// the loop; retrying the same failing entries back-to-back would
    /// spin without the collaborator changing state.
    pub fn recover_until_clean(
        &self,
        now_ms: i64,
        max_rounds: usize,
    ) -> Result<IndexingResult, IndexingError> {
        let mut total = IndexingResult::new();

        for _ in 0..max_rounds {
            let round = self.recover(now_ms)?;
            total.merge(&round);
            if round.total == 0 || round.success == 0 {
                break;
            }
        }

        Ok(total)
    }

    /// Guarded sweep used by the periodic driver.
    ///
    /// Returns `None` without doing work when another guarded sweep on
    /// this sweeper is still in flight.
    pub fn sweep_now(&self, now_ms: i64) -> Option<Result<IndexingResult, IndexingError>> {
        let _run = self.guard.try_acquire()?;
        Some(self.recover(now_ms))
    }

    /// Run sweeps on a fixed interval until the token is cancelled.
    ///
    /// Ticks that fire while a previous sweep is still running are
    /// skipped, not queued.
    pub async fn run_periodic(&self, interval: Duration, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately; skip it so the first sweep
        // happens one interval after startup.
        ticker.tick().await;

        info!(interval_ms = interval.as_millis() as u64, "Recovery sweeper started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Recovery sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let now_ms = Utc::now().timestamp_millis();
                    match self.sweep_now(now_ms) {
                        None => debug!("Previous sweep still running, skipping tick"),
                        Some(Ok(result)) if result.total > 0 => info!(
                            total = result.total,
                            success = result.success,
                            failures = result.failures,
                            "Recovery sweep finished"
                        ),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => warn!(error = %e, "Recovery sweep failed"),
                    }
                }
            }
        }
    }
}
