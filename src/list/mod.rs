//! The lock-coupled, append-only linked list.

pub mod lock_coupled;
pub mod node;

pub use lock_coupled::{Keys, LockCoupledList};
pub use node::ListNode;
