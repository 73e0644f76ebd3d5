//! A cell of the singly linked chain backing the [`Queue`].
//!
//! The chain always holds at least one [`Node`]: the last one, referenced by the
//! tail, never holds an item. A push fills that node and appends a new empty one,
//! a pop reads the item out of the node referenced by the head and moves the head
//! to its successor. Nodes in between the head (inclusive) and the tail (exclusive)
//! therefore hold the items in insertion order.
//!
//! [`Queue`]: crate::queue::Queue

use crate::variant::cell::UnsafeCell;

use std::mem::MaybeUninit;
use std::ptr;

#[derive(Debug)]
pub(crate) struct Node<T> {
    /// Initialized once the node has been filled by a producer.
    pub(crate) item: UnsafeCell<MaybeUninit<T>>,

    /// A pointer to the next [`Node`], null while the node is the tail.
    pub(crate) next: UnsafeCell<*mut Node<T>>,
}

impl<T> Node<T> {
    pub(crate) fn new() -> Self {
        Self {
            item: UnsafeCell::new(MaybeUninit::uninit()),
            next: UnsafeCell::new(ptr::null_mut()),
        }
    }

    /// Writes `item` into `node` and links `next` as its successor.
    ///
    /// # Safety
    ///
    /// `node` must be the current tail and the caller must hold the tail lock.
    pub(crate) unsafe fn fill(node: *mut Self, item: T, next: *mut Self) {
        let node = unsafe { &*node };
        node.item.with_mut(|p| unsafe { p.write(MaybeUninit::new(item)) });
        node.next.with_mut(|p| unsafe { p.write(next) });
    }

    /// Moves the item out of `node` and returns it along with the successor.
    ///
    /// The item is left logically uninitialized: `node` must be released
    /// without reading it again.
    ///
    /// # Safety
    ///
    /// `node` must be the current head, the caller must hold the head lock, and
    /// the head must have been observed distinct from the tail.
    pub(crate) unsafe fn take(node: *mut Self) -> (T, *mut Self) {
        let node = unsafe { &*node };
        let item = node.item.with(|p| unsafe { p.read().assume_init() });
        let next = node.next.with(|p| unsafe { p.read() });
        (item, next)
    }

    /// Drops the item held by `node`, if `filled`, and frees the node.
    ///
    /// # Safety
    ///
    /// `node` must come from [`Box::into_raw`] and must not be reachable anymore.
    /// `filled` must report whether its item is still initialized.
    pub(crate) unsafe fn release(node: *mut Self, filled: bool) -> *mut Self {
        let node = unsafe { Box::from_raw(node) };
        if filled {
            node.item
                .with_mut(|p| unsafe { ptr::drop_in_place((*p).as_mut_ptr()) });
        }
        node.next.with(|p| unsafe { p.read() })
    }
}
