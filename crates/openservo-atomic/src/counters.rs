//! Atomic counters for enforcement accounting.
//!
//! [`EnforceCounters`] can be incremented from the RT enforce loop without
//! allocations or blocking and read from a non-RT observer as a consistent
//! enough snapshot for diagnostics.
//!
//! # RT Safety
//!
//! All `inc_*` methods are a single atomic fetch-add with
//! `Ordering::Relaxed`. Counter values are eventually consistent; individual
//! increments do not need to be atomic with each other.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counter snapshot returned by [`EnforceCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountersSnapshot {
    /// Total enforce cycles that ran the enforcement algorithm
    pub cycles: u64,
    /// Cycles in which at least one quantity was clipped or sanitized
    pub limited_cycles: u64,
    /// Cycles rejected because the timestep was zero, negative or non-finite
    pub rejected_dt: u64,
}

/// Atomic counters tracking the enforce loop.
#[derive(Debug, Default)]
pub struct EnforceCounters {
    cycles: AtomicU64,
    limited_cycles: AtomicU64,
    rejected_dt: AtomicU64,
}

impl EnforceCounters {
    /// Create counters initialized to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cycles: AtomicU64::new(0),
            limited_cycles: AtomicU64::new(0),
            rejected_dt: AtomicU64::new(0),
        }
    }

    /// Count one enforce cycle.
    ///
    /// # RT Safety
    ///
    /// RT-safe. Single relaxed fetch-add.
    #[inline]
    pub fn inc_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one cycle that clipped or sanitized the desired sample.
    ///
    /// # RT Safety
    ///
    /// RT-safe. Single relaxed fetch-add.
    #[inline]
    pub fn inc_limited_cycle(&self) {
        self.limited_cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one cycle rejected for an invalid timestep.
    ///
    /// # RT Safety
    ///
    /// RT-safe. Single relaxed fetch-add.
    #[inline]
    pub fn inc_rejected_dt(&self) {
        self.rejected_dt.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters. Non-RT observer path.
    #[must_use]
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            limited_cycles: self.limited_cycles.load(Ordering::Relaxed),
            rejected_dt: self.rejected_dt.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.cycles.store(0, Ordering::Relaxed);
        self.limited_cycles.store(0, Ordering::Relaxed);
        self.rejected_dt.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = EnforceCounters::new();
        assert_eq!(counters.snapshot(), CountersSnapshot::default());
    }

    #[test]
    fn test_increments_are_independent() {
        let counters = EnforceCounters::new();
        counters.inc_cycle();
        counters.inc_cycle();
        counters.inc_limited_cycle();
        counters.inc_rejected_dt();

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.cycles, 2);
        assert_eq!(snapshot.limited_cycles, 1);
        assert_eq!(snapshot.rejected_dt, 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let counters = EnforceCounters::new();
        counters.inc_cycle();
        counters.inc_limited_cycle();
        counters.inc_rejected_dt();
        counters.reset();
        assert_eq!(counters.snapshot(), CountersSnapshot::default());
    }

    #[test]
    fn test_concurrent_increments_sum_up() {
        use std::sync::Arc;

        let counters = Arc::new(EnforceCounters::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let counters = Arc::clone(&counters);
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    counters.inc_cycle();
                }
            }));
        }
        for handle in handles {
            handle.join().expect("counter thread");
        }
        assert_eq!(counters.snapshot().cycles, 4000);
    }
}
