//! Keeps the head and the tail of the [`Queue`] on separate cache lines.
//!
//! Producers only touch the tail side and consumers only touch the head side
//! as long as the queue holds more than one item. Without padding both locks
//! could share a cache line and every push would invalidate the line used by
//! concurrent pops (i.e., [false sharing](https://en.wikipedia.org/wiki/False_sharing)).
//!
//! # Size and alignment
//!
//! Cache lines are assumed to be N bytes long, depending on the architecture:
//!
//! - On x86_64 and aarch64, N = 128.
//! - On all others, N = 64.
//!
//! [`Queue`]: crate::queue::Queue

use std::fmt;
use std::ops::Deref;

/// Pads and aligns data to the length of a cache line.
#[cfg_attr(any(target_arch = "x86_64", target_arch = "aarch64"), repr(align(128)))]
#[cfg_attr(
    not(any(target_arch = "x86_64", target_arch = "aarch64")),
    repr(align(64))
)]
pub(crate) struct CachePad<T>(T);

impl<T> CachePad<T> {
    pub(crate) fn new(t: T) -> CachePad<T> {
        CachePad(t)
    }
}

impl<T> Deref for CachePad<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for CachePad<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CachePad").field(&self.0).finish()
    }
}
