//! Overlap guard for the periodic recovery driver.
//!
//! Duplicate processing across overlapping sweeps is tolerated (indexing
//! is idempotent), but a driver tick that fires while the previous sweep
//! is still running should skip rather than pile up work.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Tracks whether a sweep is currently running.
///
/// Lock-free: acquisition returns a [`RunGuard`] that releases the flag
/// when dropped, even if the sweep panics.
pub struct OverlapGuard {
    is_running: Arc<AtomicBool>,
}

impl OverlapGuard {
    pub fn new() -> Self {
        Self {
            is_running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attempt to acquire the guard for execution.
    ///
    /// Returns `None` if a sweep is already in flight.
    pub fn try_acquire(&self) -> Option<RunGuard> {
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            Some(RunGuard {
                flag: self.is_running.clone(),
            })
        } else {
            None
        }
    }

    /// Check if a sweep is currently running.
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }
}

impl Default for OverlapGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard that releases the running flag when dropped.
pub struct RunGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
