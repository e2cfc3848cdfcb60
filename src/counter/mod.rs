//! Counters: the sharded [`CounterBank`] and the [`SharedCounter`] baseline.
//!
//! Both implement [`WorkerCounter`], so a driver can run the same workload
//! against either and compare.

pub mod bank;
pub mod shared;
pub mod slot;

pub use bank::{CounterBank, CounterConfig, DEFAULT_MAX_WORKERS};
pub use shared::SharedCounter;
pub use slot::Slot;

/// A counter that workers identified by `0..n` increment concurrently.
pub trait WorkerCounter: Sync {
    /// Adds one on behalf of `worker`.
    fn increment(&self, worker: usize);

    /// Current aggregate value.
    fn total(&self) -> usize;
}

impl WorkerCounter for CounterBank {
    #[inline]
    fn increment(&self, worker: usize) {
        CounterBank::increment(self, worker);
    }

    #[inline]
    fn total(&self) -> usize {
        CounterBank::total(self)
    }
}

impl WorkerCounter for SharedCounter {
    /// Every worker lands on the same location; `worker` is ignored.
    #[inline]
    fn increment(&self, _worker: usize) {
        SharedCounter::increment(self);
    }

    #[inline]
    fn total(&self) -> usize {
        self.read()
    }
}
