//! List nodes and their allocation.

use core::ptr::{self, NonNull};
use std::alloc::{self, Layout};

use crate::concurrency::atomic::{AtomicPtr, Ordering};
use crate::concurrency::NodeLock;
use crate::error::{Error, Result};

/// One link of a [`LockCoupledList`](super::LockCoupledList).
///
/// A node goes `Unlinked -> Linked` exactly once: its `next` pointer is
/// written under the node's lock when the following node is appended and is
/// never reset afterwards. The key is fixed at allocation.
pub struct ListNode<K> {
    key: K,
    next: AtomicPtr<ListNode<K>>,
    lock: NodeLock,
}

impl<K> ListNode<K> {
    /// Heap-allocates an unlinked node, reporting allocation failure instead
    /// of aborting.
    pub(crate) fn allocate(key: K) -> Result<NonNull<Self>> {
        let layout = Layout::new::<Self>();
        // SAFETY: `Self` always has non-zero size (it contains a lock word).
        let raw = unsafe { alloc::alloc(layout) }.cast::<Self>();
        let Some(node) = NonNull::new(raw) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(bytes = layout.size(), "list node allocation failed");
            return Err(Error::AllocationFailure {
                bytes: layout.size(),
            });
        };
        // SAFETY: freshly allocated with the layout of `Self`.
        unsafe {
            node.as_ptr().write(Self {
                key,
                next: AtomicPtr::new(ptr::null_mut()),
                lock: NodeLock::new(),
            });
        }
        Ok(node)
    }

    /// Frees a node and returns its successor.
    ///
    /// # Safety
    /// `node` must come from [`allocate`](Self::allocate), must not be freed
    /// twice, and no reference to it may outlive this call.
    pub(crate) unsafe fn release(node: NonNull<Self>) -> Option<NonNull<Self>> {
        // SAFETY: `allocate` used the global allocator with `Layout::new::<Self>()`,
        // which is what `Box` expects.
        let node = unsafe { Box::from_raw(node.as_ptr()) };
        NonNull::new(node.next.load(Ordering::Relaxed))
    }

    /// The node's lock.
    #[inline]
    pub(crate) fn lock(&self) -> &NodeLock {
        &self.lock
    }

    /// Links `next` after this node.
    ///
    /// The caller must hold this node's lock. Publishes with release ordering
    /// so a reader that observes the pointer also observes the successor's key.
    #[inline]
    pub(crate) fn link(&self, next: NonNull<Self>) {
        debug_assert!(self.lock.is_locked(), "link without holding the node lock");
        let previous = self.next.swap(next.as_ptr(), Ordering::Release);
        debug_assert!(previous.is_null(), "node linked twice");
    }

    /// Runs `f` on the key while holding this node's lock.
    pub fn with_key<R>(&self, f: impl FnOnce(&K) -> R) -> R {
        let _guard = self.lock.lock();
        f(&self.key)
    }

    /// Like [`with_key`](Self::with_key), but returns `None` instead of
    /// blocking when another thread holds the lock.
    pub fn try_with_key<R>(&self, f: impl FnOnce(&K) -> R) -> Option<R> {
        let _guard = self.lock.try_lock()?;
        Some(f(&self.key))
    }

    /// The following node, if one has been linked.
    ///
    /// Read without taking the lock; a node appended concurrently may or may
    /// not be visible yet.
    #[inline]
    pub fn next(&self) -> Option<&Self> {
        // SAFETY: linked nodes are freed only when the owning list is dropped,
        // which cannot happen while `self` is borrowed from it.
        unsafe { self.next.load(Ordering::Acquire).as_ref() }
    }

    /// Whether a successor has been linked.
    #[inline]
    pub fn is_linked(&self) -> bool {
        !self.next.load(Ordering::Acquire).is_null()
    }
}

impl<K: core::fmt::Debug> core::fmt::Debug for ListNode<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.with_key(|key| {
            f.debug_struct("ListNode")
                .field("key", key)
                .field("linked", &self.is_linked())
                .finish()
        })
    }
}
