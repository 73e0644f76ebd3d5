//! A two-lock bounded blocking multi-producer multi-consumer queue.
//!
//! # Locking
//!
//! The head of the chain is guarded by the head lock and only touched by
//! consumers, the tail is guarded by the tail lock and only touched by producers.
//! The two ends meet when the queue is empty, which consumers detect by reading
//! the tail pointer.
//!
//! Lock order: the tail lock may be acquired while holding the head lock, never
//! the reverse. Producers release the tail lock before they take the head lock
//! to signal consumers.

use crate::cache_pad::CachePad;
use crate::error::TryPushError;
use crate::node::Node;
use crate::variant::sync::atomic::{AtomicUsize, Ordering};
use crate::variant::sync::{Arc, Condvar, Mutex, MutexGuard};

use std::marker::PhantomData;
use std::sync::PoisonError;

use tracing::{debug, trace};

/// A two-lock bounded blocking multi-producer multi-consumer queue.
///
/// Cloning a [`Queue`] returns a new handle to the same queue.
#[derive(Debug)]
pub struct Queue<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Queue<T> {
    /// Creates a new unbounded [`Queue`].
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_queue::Queue;
    ///
    /// let queue = Queue::<usize>::new();
    /// assert_eq!(usize::MAX, queue.capacity());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(usize::MAX)
    }

    /// Creates a new [`Queue`] holding at most `capacity` items.
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_queue::Queue;
    ///
    /// let queue = Queue::<usize>::with_capacity(16);
    /// assert_eq!(16, queue.capacity());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner::new(capacity)),
        }
    }

    /// Push an item into the [`Queue`], waiting for free capacity if the
    /// [`Queue`] is full.
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_queue::Queue;
    ///
    /// let queue = Queue::<usize>::new();
    ///
    /// queue.push(1);
    /// queue.push(2);
    /// queue.push(3);
    /// assert_eq!(3, queue.len());
    /// ```
    pub fn push(&self, item: T) {
        self.inner.push(item)
    }

    /// Push an item into the [`Queue`]. Returns the item back inside an error
    /// if the [`Queue`] is full.
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_queue::Queue;
    ///
    /// let queue = Queue::<usize>::with_capacity(1);
    ///
    /// assert!(queue.try_push(1).is_ok());
    /// assert_eq!(2, queue.try_push(2).unwrap_err().into_inner());
    /// ```
    pub fn try_push(&self, item: T) -> Result<(), TryPushError<T>> {
        self.inner.try_push(item)
    }

    /// Pop an item from the [`Queue`], waiting for one if the [`Queue`] is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_queue::Queue;
    ///
    /// let queue = Queue::<usize>::new();
    /// for i in 0..8 {
    ///   queue.push(i);
    /// }
    ///
    /// for i in 0..8 {
    ///   assert_eq!(i, queue.pop());
    /// }
    /// ```
    pub fn pop(&self) -> T {
        self.inner.pop()
    }

    /// Pop an item from the [`Queue`]. Returns none if the [`Queue`] is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_queue::Queue;
    ///
    /// let queue = Queue::<usize>::new();
    /// queue.push(1);
    ///
    /// assert_eq!(Some(1), queue.try_pop());
    /// assert!(queue.try_pop().is_none());
    /// ```
    pub fn try_pop(&self) -> Option<T> {
        self.inner.try_pop()
    }

    /// Returns true if the [`Queue`] holds no item.
    ///
    /// The result is a snapshot and may be stale as soon as it is returned if
    /// other threads are using the [`Queue`].
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_queue::Queue;
    ///
    /// let queue = Queue::<usize>::new();
    /// assert!(queue.is_empty());
    ///
    /// queue.push(1);
    /// assert!(!queue.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of items in the [`Queue`].
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_queue::Queue;
    ///
    /// let queue = Queue::<usize>::new();
    /// queue.push(1);
    /// queue.push(2);
    /// assert_eq!(2, queue.len());
    /// ```
    pub fn len(&self) -> usize {
        self.inner.len.load(Ordering::Acquire)
    }

    /// Returns the maximum number of items the [`Queue`] accepts.
    pub fn capacity(&self) -> usize {
        self.inner.capacity.load(Ordering::Acquire)
    }

    /// Updates the maximum number of items the [`Queue`] accepts.
    ///
    /// Producers waiting for free capacity are woken up to check the new bound.
    /// Items already in the [`Queue`] are kept even if the new bound is below
    /// [`Queue::len`]: pushes wait until consumers drain the [`Queue`] under it.
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_queue::Queue;
    ///
    /// let queue = Queue::<usize>::with_capacity(2);
    /// queue.push(1);
    /// queue.push(2);
    ///
    /// queue.set_capacity(1);
    /// assert_eq!(2, queue.len());
    /// assert!(queue.try_push(3).is_err());
    ///
    /// queue.set_capacity(3);
    /// assert!(queue.try_push(3).is_ok());
    /// ```
    pub fn set_capacity(&self, capacity: usize) {
        self.inner.set_capacity(capacity)
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Inner<T> {
    /// Points to the oldest [`Node`]. Only consumers move it.
    head: CachePad<Mutex<*mut Node<T>>>,

    /// Points to the empty [`Node`] ending the chain. Only producers move it.
    tail: CachePad<Mutex<*mut Node<T>>>,

    /// Signaled, under the head lock, when an item is pushed.
    non_empty: Condvar,

    /// Signaled, under the tail lock, when an item is popped or the capacity changes.
    non_full: Condvar,

    /// Number of items in the chain. Only incremented under the tail lock and
    /// only decremented under the head lock.
    len: AtomicUsize,

    capacity: AtomicUsize,

    _marker: PhantomData<T>,
}

// The raw node pointers are only dereferenced under the lock guarding their
// end of the chain, and items only move from producers to consumers.
unsafe impl<T: Send> Send for Inner<T> {}
unsafe impl<T: Send> Sync for Inner<T> {}

impl<T> Inner<T> {
    fn new(capacity: usize) -> Self {
        let first_node = Box::into_raw(Box::new(Node::new()));

        Self {
            head: CachePad::new(Mutex::new(first_node)),
            tail: CachePad::new(Mutex::new(first_node)),
            non_empty: Condvar::new(),
            non_full: Condvar::new(),
            len: AtomicUsize::new(0),
            capacity: AtomicUsize::new(capacity),
            _marker: PhantomData,
        }
    }

    fn push(&self, item: T) {
        let node = Box::new(Node::new());

        let mut tail = self.lock_tail();
        while self.is_full() {
            trace!(
                len = self.len.load(Ordering::Relaxed),
                capacity = self.capacity.load(Ordering::Relaxed),
                "queue is full, waiting for free capacity"
            );
            tail = self
                .non_full
                .wait(tail)
                .unwrap_or_else(PoisonError::into_inner);
        }
        self.enqueue(&mut tail, item, node);
        drop(tail);

        self.notify_non_empty();
    }

    fn try_push(&self, item: T) -> Result<(), TryPushError<T>> {
        let node = Box::new(Node::new());

        let mut tail = self.lock_tail();
        if self.is_full() {
            return Err(TryPushError(item));
        }
        self.enqueue(&mut tail, item, node);
        drop(tail);

        self.notify_non_empty();
        Ok(())
    }

    fn pop(&self) -> T {
        let mut head = self.lock_head();
        while *head == self.current_tail() {
            trace!("queue is empty, waiting for an item");
            head = self
                .non_empty
                .wait(head)
                .unwrap_or_else(PoisonError::into_inner);
        }
        let (item, node) = self.dequeue(&mut head);
        drop(head);

        self.notify_non_full();

        // Safety: the node has been unlinked and its item moved out.
        let _ = unsafe { Node::release(node, false) };

        item
    }

    fn try_pop(&self) -> Option<T> {
        let mut head = self.lock_head();
        if *head == self.current_tail() {
            return None;
        }
        let (item, node) = self.dequeue(&mut head);
        drop(head);

        self.notify_non_full();

        // Safety: the node has been unlinked and its item moved out.
        let _ = unsafe { Node::release(node, false) };

        Some(item)
    }

    fn is_empty(&self) -> bool {
        let head = self.lock_head();
        *head == self.current_tail()
    }

    fn set_capacity(&self, capacity: usize) {
        let previous = self.capacity.swap(capacity, Ordering::AcqRel);
        debug!(previous, capacity, "queue capacity updated");

        let _tail = self.lock_tail();
        self.non_full.notify_all();
    }

    /// Fills the tail [`Node`] with `item` and appends `node` as the new tail.
    ///
    /// Shared by every push: the caller holds the tail lock and has checked
    /// the capacity.
    fn enqueue(&self, tail: &mut MutexGuard<'_, *mut Node<T>>, item: T, node: Box<Node<T>>) {
        let next = Box::into_raw(node);

        // Safety: the tail lock is held and `**tail` is the tail node.
        unsafe { Node::fill(**tail, item, next) };
        **tail = next;

        let _ = self.len.fetch_add(1, Ordering::AcqRel);
    }

    /// Unlinks the head [`Node`] and returns its item along with the node to release.
    ///
    /// Shared by every pop: the caller holds the head lock and has checked the
    /// [`Queue`] is not empty.
    fn dequeue(&self, head: &mut MutexGuard<'_, *mut Node<T>>) -> (T, *mut Node<T>) {
        let node = **head;

        // Safety: the head lock is held and the head is not the tail.
        let (item, next) = unsafe { Node::take(node) };
        **head = next;

        let _ = self.len.fetch_sub(1, Ordering::AcqRel);

        (item, node)
    }

    /// Must be called with the tail lock held.
    fn is_full(&self) -> bool {
        self.len.load(Ordering::Acquire) >= self.capacity.load(Ordering::Acquire)
    }

    /// Reads the tail pointer. Called with the head lock held: the only place
    /// where both locks are held at the same time.
    fn current_tail(&self) -> *mut Node<T> {
        *self.lock_tail()
    }

    // A consumer checks for items and starts waiting while holding the head
    // lock, so taking it before signaling guarantees the wake-up is not lost.
    fn notify_non_empty(&self) {
        let _head = self.lock_head();
        self.non_empty.notify_one();
    }

    fn notify_non_full(&self) {
        let _tail = self.lock_tail();
        self.non_full.notify_one();
    }

    // No user code runs while a lock is held, so a poisoned lock still guards
    // a consistent chain.
    fn lock_head(&self) -> MutexGuard<'_, *mut Node<T>> {
        self.head.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_tail(&self) -> MutexGuard<'_, *mut Node<T>> {
        self.tail.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        let tail = *self.lock_tail();
        let mut node = *self.lock_head();

        // Every node but the tail holds an item.
        while !node.is_null() {
            // Safety: no other handle is left, every node is only reachable from here.
            node = unsafe { Node::release(node, node != tail) };
        }
    }
}
