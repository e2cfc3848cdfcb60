//! The single shared atomic used as a contention baseline.

use crate::concurrency::atomic::{AtomicUsize, Ordering};
use crate::concurrency::CachePadded;

/// One counter that every worker increments.
///
/// Kept as the baseline the sharded [`CounterBank`](super::CounterBank) is
/// measured against: every increment targets the same cache line, so
/// throughput drops as writers are added even though no thread ever blocks.
pub struct SharedCounter {
    count: CachePadded<AtomicUsize>,
}

impl SharedCounter {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self {
            count: CachePadded::new(AtomicUsize::new(0)),
        }
    }

    /// Adds one with a relaxed fetch-and-add.
    #[inline]
    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the current value.
    #[inline]
    pub fn read(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl Default for SharedCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SharedCounter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedCounter")
            .field("count", &self.read())
            .finish()
    }
}
