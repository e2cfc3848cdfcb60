//! Atomic types used by every structure in the crate.
//!
//! Under `--cfg loom` these resolve to loom's model-checked atomics so the
//! same code can be explored exhaustively in `tests/loom_model.rs`.

pub use core::sync::atomic::Ordering;

#[cfg(not(loom))]
pub use core::sync::atomic::{AtomicPtr, AtomicU32, AtomicUsize};

#[cfg(loom)]
pub use loom::sync::atomic::{AtomicPtr, AtomicU32, AtomicUsize};
