//! Per-batch accounting for synchronization passes.

/// Outcome of one indexing pass over a batch of queue entries.
///
/// Invariant: `success + failures == total`; no entry is dropped
/// silently. Failures are recorded, not propagated, so one bad entry
/// never aborts a batch; callers must inspect the result rather than
/// rely on errors to detect partial failure.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexingResult {
    /// Number of entries processed
    pub total: u64,
    /// Entries whose index write was confirmed and queue row removed
    pub success: u64,
    /// Entries left in the queue for the next sweep
    pub failures: u64,
}

impl IndexingResult {
    /// Create a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a confirmed success.
    pub fn record_success(&mut self) {
        self.total += 1;
        self.success += 1;
    }

    /// Record a failure (entry retained).
    pub fn record_failure(&mut self) {
        self.total += 1;
        self.failures += 1;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: &IndexingResult) {
        self.total += other.total;
        self.success += other.success;
        self.failures += other.failures;
    }

    /// Whether every processed entry succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}
