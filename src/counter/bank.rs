//! The sharded counter: one padded [`Slot`] per worker identity.

use serde::{Deserialize, Serialize};

use super::Slot;
use crate::concurrency::CachePadded;
use crate::error::{ConfigError, Error, Result};

/// Default upper bound on the number of slots a bounded bank accepts.
pub const DEFAULT_MAX_WORKERS: usize = 16;

/// Construction parameters for a [`CounterBank`].
///
/// Deserializes from partial input; missing fields take their defaults:
///
/// ```
/// use contention::CounterConfig;
///
/// let config: CounterConfig = serde_json::from_str(r#"{ "capacity": 8 }"#).unwrap();
/// assert_eq!(config.max_capacity, Some(16));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Number of worker slots.
    pub capacity: usize,
    /// Largest accepted capacity; `None` means unbounded.
    pub max_capacity: Option<usize>,
}

impl CounterConfig {
    /// A bank of `capacity` slots limited by [`DEFAULT_MAX_WORKERS`].
    pub const fn bounded(capacity: usize) -> Self {
        Self {
            capacity,
            max_capacity: Some(DEFAULT_MAX_WORKERS),
        }
    }

    /// A bank of `capacity` slots with no upper bound.
    pub const fn unbounded(capacity: usize) -> Self {
        Self {
            capacity,
            max_capacity: None,
        }
    }

    /// Checks the capacity against the bound.
    ///
    /// # Errors
    /// [`Error::InvalidConfiguration`] if the capacity is zero or above the bound.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity.into());
        }
        match self.max_capacity {
            Some(max) if self.capacity > max => Err(ConfigError::CapacityExceeded {
                requested: self.capacity,
                max,
            }
            .into()),
            _ => Ok(()),
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self::bounded(4)
    }
}

/// A counter sharded into one cache-padded slot per worker.
///
/// Worker `i` owns slot `i` and is the only caller allowed to
/// [`increment`](Self::increment) it, so increments never contend with each
/// other. [`total`](Self::total) pays for that by summing every slot.
///
/// ```
/// use contention::CounterBank;
///
/// let bank = CounterBank::new(2).unwrap();
/// bank.increment(0);
/// bank.increment(1);
/// bank.increment(1);
/// assert_eq!(bank.read_slot(1), 2);
/// assert_eq!(bank.total(), 3);
/// ```
pub struct CounterBank {
    slots: Box<[CachePadded<Slot>]>,
}

impl CounterBank {
    /// Creates a bank of `capacity` zeroed slots, bounded by
    /// [`DEFAULT_MAX_WORKERS`].
    ///
    /// # Errors
    /// [`Error::InvalidConfiguration`] if `capacity` is zero or above the bound,
    /// [`Error::AllocationFailure`] if the slots cannot be allocated.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(CounterConfig::bounded(capacity))
    }

    /// Creates a bank of `capacity` zeroed slots with no upper bound.
    ///
    /// # Errors
    /// Same as [`new`](Self::new), minus the bound.
    pub fn unbounded(capacity: usize) -> Result<Self> {
        Self::with_config(CounterConfig::unbounded(capacity))
    }

    /// Creates a bank from an explicit configuration.
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn with_config(config: CounterConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            #[cfg(feature = "tracing")]
            tracing::warn!(capacity = config.capacity, max = ?config.max_capacity, "rejected counter bank configuration");
            return Err(err);
        }

        let mut slots = Vec::new();
        if slots.try_reserve_exact(config.capacity).is_err() {
            let bytes = config
                .capacity
                .saturating_mul(core::mem::size_of::<CachePadded<Slot>>());
            #[cfg(feature = "tracing")]
            tracing::warn!(bytes, "counter bank slot allocation failed");
            return Err(Error::AllocationFailure { bytes });
        }
        slots.extend((0..config.capacity).map(|_| CachePadded::new(Slot::new())));

        #[cfg(feature = "tracing")]
        tracing::debug!(capacity = config.capacity, "counter bank constructed");

        Ok(Self {
            slots: slots.into_boxed_slice(),
        })
    }

    /// Number of worker slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slot owned by `worker`.
    ///
    /// # Panics
    /// Panics if `worker >= capacity()`.
    #[inline]
    pub fn slot(&self, worker: usize) -> &Slot {
        assert!(
            worker < self.slots.len(),
            "worker id {worker} out of range for a bank of {} slots",
            self.slots.len()
        );
        &self.slots[worker]
    }

    /// Adds one to `worker`'s slot.
    ///
    /// Only the worker bound to `worker` may call this; concurrent callers
    /// passing the same id break the single-writer contract (the count stays
    /// exact, but the slot becomes contended).
    ///
    /// # Panics
    /// Panics if `worker >= capacity()`.
    #[inline]
    pub fn increment(&self, worker: usize) {
        self.slot(worker).increment();
    }

    /// Current value of `worker`'s slot.
    ///
    /// # Panics
    /// Panics if `worker >= capacity()`.
    #[inline]
    pub fn read_slot(&self, worker: usize) -> usize {
        self.slot(worker).load()
    }

    /// Sum of all slots.
    ///
    /// Slots are read one at a time with no cross-slot synchronization, so
    /// under concurrent increments this is an approximation of the count at
    /// any single instant. Once all writers have been joined it is exact.
    pub fn total(&self) -> usize {
        self.slots
            .iter()
            .fold(0usize, |sum, slot| sum.wrapping_add(slot.load()))
    }

    /// Per-worker counts, in worker order.
    pub fn snapshot(&self) -> Vec<usize> {
        self.slots.iter().map(|slot| slot.load()).collect()
    }
}

impl core::fmt::Debug for CounterBank {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CounterBank")
            .field("slots", &self.snapshot())
            .field("total", &self.total())
            .finish()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn new_bank_is_zeroed() {
        let bank = CounterBank::new(4).unwrap();
        assert_eq!(bank.capacity(), 4);
        assert_eq!(bank.snapshot(), vec![0, 0, 0, 0]);
        assert_eq!(bank.total(), 0);
    }

    #[test]
    fn bound_is_inclusive() {
        assert!(CounterBank::new(DEFAULT_MAX_WORKERS).is_ok());
        assert_eq!(
            CounterBank::new(DEFAULT_MAX_WORKERS + 1).unwrap_err(),
            Error::InvalidConfiguration(ConfigError::CapacityExceeded {
                requested: DEFAULT_MAX_WORKERS + 1,
                max: DEFAULT_MAX_WORKERS,
            })
        );
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            CounterBank::unbounded(0).unwrap_err(),
            Error::InvalidConfiguration(ConfigError::ZeroCapacity)
        );
    }

    #[test]
    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    fn slots_are_cache_line_separated() {
        let bank = CounterBank::unbounded(2).unwrap();
        let a = bank.slot(0) as *const Slot as usize;
        let b = bank.slot(1) as *const Slot as usize;
        assert!(b - a >= 64);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_worker_panics() {
        let bank = CounterBank::new(2).unwrap();
        bank.increment(2);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = CounterConfig::unbounded(32);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"capacity":32,"max_capacity":null}"#);
        let bank = CounterBank::with_config(serde_json::from_str(&json).unwrap()).unwrap();
        assert_eq!(bank.capacity(), 32);
    }
}
