#![deny(
    warnings,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_op_in_unsafe_fn,
    unused_crate_dependencies,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    rust_2018_idioms
)]

//! A two-lock bounded blocking multi-producer multi-consumer queue.
//!
//! Producers append to the tail and consumers remove from the head, each side
//! under its own lock, so pushes and pops on a non-empty queue don't contend.
//! [`Queue::push`] waits while the queue is full and [`Queue::pop`] waits while
//! it is empty; [`Queue::try_push`] and [`Queue::try_pop`] return immediately.
//!
//! The queue has no built-in close operation. Consumers are usually stopped by
//! agreeing on a value meaning "done", as shown below.
//!
//! # Examples
//!
//! Bounded hand-off:
//!
//! ```
//! use lb_queue::Queue;
//!
//! let queue: Queue<usize> = Queue::with_capacity(2);
//!
//! assert!(queue.try_push(1).is_ok());
//! assert!(queue.try_push(2).is_ok());
//! assert!(queue.try_push(3).is_err());
//! assert_eq!(2, queue.len());
//!
//! assert_eq!(1, queue.pop());
//! assert!(queue.try_push(3).is_ok());
//!
//! assert_eq!(2, queue.pop());
//! assert_eq!(3, queue.pop());
//! assert!(queue.is_empty());
//! ```
//!
//! Multi Producer - Multi Consumer, stopped with a sentinel value:
//!
//! ```
//! use lb_queue::Queue;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use std::thread;
//!
//! const COUNT: usize = 1_000;
//! const CONCURRENCY: usize = 4;
//! const DONE: usize = usize::MAX;
//!
//! let queue: Queue<usize> = Queue::with_capacity(16);
//! let items = Arc::new((0..COUNT).map(|_| AtomicUsize::new(0)).collect::<Vec<_>>());
//!
//! let consumers: Vec<_> = (0..CONCURRENCY)
//!     .map(|_| {
//!         let q = queue.clone();
//!         let its = items.clone();
//!         thread::spawn(move || loop {
//!             match q.pop() {
//!                 DONE => break,
//!                 n => its[n].fetch_add(1, Ordering::SeqCst),
//!             };
//!         })
//!     })
//!     .collect();
//!
//! let producers: Vec<_> = (0..CONCURRENCY)
//!     .map(|_| {
//!         let q = queue.clone();
//!         thread::spawn(move || {
//!             for i in 0..COUNT {
//!                 q.push(i);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for th in producers {
//!     th.join().unwrap();
//! }
//!
//! for _ in 0..CONCURRENCY {
//!     queue.push(DONE);
//! }
//!
//! for th in consumers {
//!     th.join().unwrap();
//! }
//!
//! for c in &*items {
//!     assert_eq!(c.load(Ordering::SeqCst), CONCURRENCY);
//! }
//!
//! assert!(queue.is_empty());
//! ```

mod error;
mod queue;

pub(crate) mod cache_pad;
pub(crate) mod node;
pub(crate) mod variant;

pub use error::TryPushError;
pub use queue::Queue;
