//! A single-writer counter slot.

use crate::concurrency::atomic::{AtomicUsize, Ordering};

/// A single-writer, multi-reader accumulator.
///
/// Exactly one worker identity may call [`increment`](Self::increment) on a
/// given slot; any thread may [`load`](Self::load) it. All operations use
/// relaxed ordering: a slot is a count, not a synchronization point.
#[repr(transparent)]
pub struct Slot {
    value: AtomicUsize,
}

impl Slot {
    /// Creates a slot holding zero.
    pub fn new() -> Self {
        Self {
            value: AtomicUsize::new(0),
        }
    }

    /// Adds one to the slot.
    #[inline]
    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the current value.
    ///
    /// Always reflects every increment the calling thread itself issued
    /// earlier; increments in flight on other threads may or may not show up.
    #[inline]
    pub fn load(&self) -> usize {
        self.value.load(Ordering::Relaxed)
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Slot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Slot").field(&self.load()).finish()
    }
}
