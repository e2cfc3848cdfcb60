//! # `contention` - Contention-Reducing Concurrent Primitives
//!
//! Two ways of keeping threads off each other's cache lines:
//!
//! - **Sharded counting** ([`CounterBank`]): every worker increments its own
//!   cache-padded [`Slot`], and readers aggregate on demand. Writes never
//!   contend; [`CounterBank::total`] is approximate while writers are running
//!   and exact once they have been joined. [`SharedCounter`] is the single
//!   shared atomic it is measured against.
//! - **Lock coupling** ([`LockCoupledList`]): an append-only singly linked list
//!   where each [`ListNode`] carries its own [`NodeLock`]. Appends lock only
//!   the tail, traversals lock one node at a time.
//!
//! ## Memory ordering
//!
//! Counter slots use relaxed atomics throughout: a count carries no data, so
//! only the atomicity of each increment matters. The list publishes nodes with
//! release stores and walks them with acquire loads, so a reader that reaches
//! a node also sees its key.
//!
//! ## Example
//!
//! ```rust
//! use contention::{CounterBank, LockCoupledList};
//! use std::thread;
//!
//! let bank = CounterBank::new(4).unwrap();
//! let list = LockCoupledList::new();
//!
//! thread::scope(|s| {
//!     for worker in 0..4 {
//!         let (bank, list) = (&bank, &list);
//!         s.spawn(move || {
//!             for _ in 0..1000 {
//!                 bank.increment(worker);
//!             }
//!             list.append(worker).unwrap();
//!         });
//!     }
//! });
//!
//! assert_eq!(bank.total(), 4000);
//! assert_eq!(list.keys().count(), 4);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod concurrency;
pub mod counter;
pub mod error;
pub mod list;

pub use concurrency::{CachePadded, NodeLock, NodeLockGuard};
pub use counter::{CounterBank, CounterConfig, SharedCounter, Slot, WorkerCounter, DEFAULT_MAX_WORKERS};
pub use error::{ConfigError, Error, Result};
pub use list::{ListNode, LockCoupledList};

// Compile-time layout checks.
#[cfg(not(loom))]
const _: () = {
    use core::mem;

    // A slot is exactly one machine word.
    assert!(mem::size_of::<Slot>() == mem::size_of::<usize>());

    // Padded slots never share a cache line.
    assert!(
        !cfg!(any(target_arch = "x86_64", target_arch = "aarch64"))
            || mem::align_of::<CachePadded<Slot>>() >= 64
    );

    // The per-node lock stays a single word.
    assert!(mem::size_of::<NodeLock>() == mem::size_of::<u32>());
};
