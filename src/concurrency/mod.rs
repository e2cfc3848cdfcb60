//! Low-level concurrency building blocks.
//!
//! Nothing here knows about counters or lists; the structures in
//! [`counter`](crate::counter) and [`list`](crate::list) are built on top.

pub mod atomic;
pub mod sync;

pub use crossbeam_utils::CachePadded;
pub use sync::{NodeLock, NodeLockGuard};
