//! The list itself: append, traversal and teardown.

use core::fmt;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use super::ListNode;
use crate::concurrency::atomic::{AtomicPtr, AtomicUsize, Ordering};
use crate::concurrency::NodeLock;
use crate::error::Result;

/// An append-only singly linked list with one lock per node.
///
/// Appends lock only the current tail node, and traversals lock one node at a
/// time, so readers walking the front of the list never wait on writers
/// extending the back.
///
/// Publishing a new tail is serialized by a separate tail lock, which makes
/// concurrent appends safe from any number of threads, including on an empty
/// list.
///
/// # Deadlocks
/// A [`traverse`](Self::traverse) callback must not call
/// [`append`](Self::append) on the same list: while visiting the tail it holds
/// the lock the append needs.
///
/// ```
/// use contention::LockCoupledList;
///
/// let list = LockCoupledList::new();
/// list.append(5).unwrap();
/// list.append(6).unwrap();
///
/// let mut seen = Vec::new();
/// list.traverse(|key| seen.push(*key));
/// assert_eq!(seen, [5, 6]);
/// ```
pub struct LockCoupledList<K> {
    head: AtomicPtr<ListNode<K>>,
    /// Written only while `tail_lock` is held.
    tail: AtomicPtr<ListNode<K>>,
    tail_lock: NodeLock,
    len: AtomicUsize,
    _owns: PhantomData<Box<ListNode<K>>>,
}

// SAFETY: the list owns its keys (`Send`) and hands out `&K` to concurrent
// visitors (`Sync`). All pointer fields are atomics and every node outlives
// any borrow of the list.
unsafe impl<K: Send> Send for LockCoupledList<K> {}
unsafe impl<K: Send + Sync> Sync for LockCoupledList<K> {}

impl<K> LockCoupledList<K> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            head: AtomicPtr::new(ptr::null_mut()),
            tail: AtomicPtr::new(ptr::null_mut()),
            tail_lock: NodeLock::new(),
            len: AtomicUsize::new(0),
            _owns: PhantomData,
        }
    }

    /// Appends `key` at the end of the list.
    ///
    /// Blocks on the tail lock and then on the current tail node's lock while
    /// the new node is linked and published as the tail.
    ///
    /// # Errors
    /// [`Error::AllocationFailure`](crate::Error::AllocationFailure) if the node
    /// cannot be allocated; the list is left unchanged and `key` is dropped.
    pub fn append(&self, key: K) -> Result<()> {
        let node = ListNode::allocate(key)?;

        let _publish = self.tail_lock.lock();
        match NonNull::new(self.tail.load(Ordering::Relaxed)) {
            None => {
                self.head.store(node.as_ptr(), Ordering::Release);
                self.tail.store(node.as_ptr(), Ordering::Relaxed);
            }
            Some(tail) => {
                // SAFETY: the tail is a live node owned by this list.
                let tail = unsafe { tail.as_ref() };
                let _coupled = tail.lock().lock();
                tail.link(node);
                self.tail.store(node.as_ptr(), Ordering::Relaxed);
            }
        }
        self.len.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Calls `visit` on every key from head to tail.
    ///
    /// Each node is locked for the duration of its visit, and its successor is
    /// read after the lock is released. Without concurrent appends the keys
    /// arrive in insertion order; with them, the walk sees some prefix of the
    /// final chain.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&K),
    {
        let mut cursor = self.head();
        while let Some(node) = cursor {
            node.with_key(&mut visit);
            cursor = node.next();
        }
    }

    /// A lazy iterator over clones of the keys, each taken under its node's
    /// lock. Calling `keys` again restarts from the head.
    pub fn keys(&self) -> Keys<'_, K> {
        Keys {
            cursor: self.head(),
        }
    }

    /// The first node, if any.
    #[inline]
    pub fn head(&self) -> Option<&ListNode<K>> {
        // SAFETY: nodes live until the list is dropped.
        unsafe { self.head.load(Ordering::Acquire).as_ref() }
    }

    /// Number of nodes appended so far.
    ///
    /// Counts completed appends only; a concurrent traversal may briefly see
    /// a node before it is counted here.
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Returns `true` if nothing has been appended.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K> Default for LockCoupledList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for LockCoupledList<K> {
    fn drop(&mut self) {
        let mut cursor = NonNull::new(self.head.load(Ordering::Relaxed));
        let mut released = 0usize;
        while let Some(node) = cursor {
            // SAFETY: `&mut self` rules out any outstanding node borrow, and
            // each node is reachable from exactly one predecessor.
            cursor = unsafe { ListNode::release(node) };
            released += 1;
        }
        debug_assert_eq!(released, self.len.load(Ordering::Relaxed));

        #[cfg(feature = "tracing")]
        tracing::trace!(released, "lock-coupled list torn down");
    }
}

impl<K: fmt::Debug> fmt::Debug for LockCoupledList<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        self.traverse(|key| {
            list.entry(key);
        });
        list.finish()
    }
}

/// Iterator returned by [`LockCoupledList::keys`].
pub struct Keys<'a, K> {
    cursor: Option<&'a ListNode<K>>,
}

impl<K: Clone> Iterator for Keys<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let node = self.cursor?;
        let key = node.with_key(K::clone);
        self.cursor = node.next();
        Some(key)
    }
}
