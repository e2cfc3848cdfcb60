//! The per-node lock that list nodes and tail publication block on.

use super::{wait_on_u32, wake_one_u32};
use crate::concurrency::atomic::{AtomicU32, Ordering};

/// A word-sized blocking lock that guards one list node.
///
/// Unlike `std::sync::Mutex` it owns no data: the node it sits in decides what
/// the lock protects. Acquisition spins briefly, then parks on the lock word.
///
/// # States
/// - 0: Unlocked
/// - 1: Locked, no waiters
/// - 2: Locked, waiters may be parked (contended)
pub struct NodeLock {
    state: AtomicU32,
}

impl NodeLock {
    const UNLOCKED: u32 = 0;
    const LOCKED: u32 = 1;
    const CONTENDED: u32 = 2;

    const SPIN_LIMIT: u32 = if cfg!(loom) { 0 } else { 40 };

    /// Creates an unlocked lock.
    pub fn new() -> Self {
        Self {
            state: AtomicU32::new(Self::UNLOCKED),
        }
    }

    /// Acquires the lock, blocking the current thread until it is available.
    ///
    /// The lock is not reentrant: locking twice from one thread deadlocks.
    #[inline]
    pub fn lock(&self) -> NodeLockGuard<'_> {
        if self
            .state
            .compare_exchange(Self::UNLOCKED, Self::LOCKED, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            self.lock_contended();
        }
        NodeLockGuard { lock: self }
    }

    /// Acquires the lock only if it is free right now.
    #[inline]
    pub fn try_lock(&self) -> Option<NodeLockGuard<'_>> {
        self.state
            .compare_exchange(Self::UNLOCKED, Self::LOCKED, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| NodeLockGuard { lock: self })
    }

    /// Returns `true` if some thread currently holds the lock.
    ///
    /// Only a hint: the answer may be stale by the time it is read.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.state.load(Ordering::Relaxed) != Self::UNLOCKED
    }

    #[cold]
    fn lock_contended(&self) {
        let mut spin_count = 0;
        loop {
            let state = self.state.load(Ordering::Relaxed);
            if state == Self::UNLOCKED
                && self
                    .state
                    .compare_exchange(
                        Self::UNLOCKED,
                        Self::LOCKED,
                        Ordering::Acquire,
                        Ordering::Relaxed,
                    )
                    .is_ok()
            {
                return;
            }

            if state == Self::LOCKED && spin_count < Self::SPIN_LIMIT {
                spin_count += 1;
                core::hint::spin_loop();
                continue;
            }

            // Taking the lock through the swap leaves it marked contended,
            // which costs at most one spurious wake on unlock.
            if self.state.swap(Self::CONTENDED, Ordering::Acquire) == Self::UNLOCKED {
                return;
            }
            wait_on_u32(&self.state, Self::CONTENDED);
        }
    }

    #[inline]
    fn unlock(&self) {
        if self.state.swap(Self::UNLOCKED, Ordering::Release) == Self::CONTENDED {
            wake_one_u32(&self.state);
        }
    }
}

impl Default for NodeLock {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for NodeLock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeLock")
            .field("locked", &self.is_locked())
            .finish()
    }
}

/// Releases the [`NodeLock`] when dropped.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct NodeLockGuard<'a> {
    lock: &'a NodeLock,
}

impl Drop for NodeLockGuard<'_> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}
