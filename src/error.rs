use std::fmt;

/// Returned by [`Queue::try_push`] when the [`Queue`] has no free capacity.
///
/// The rejected item is handed back to the caller.
///
/// [`Queue`]: crate::Queue
/// [`Queue::try_push`]: crate::Queue::try_push
#[derive(PartialEq, Eq, Clone, Copy, thiserror::Error)]
#[error("queue is full")]
pub struct TryPushError<T>(pub T);

impl<T> TryPushError<T> {
    /// Returns the item that could not be pushed.
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_queue::Queue;
    ///
    /// let queue = Queue::with_capacity(0);
    /// let err = queue.try_push("hello").unwrap_err();
    /// assert_eq!("hello", err.into_inner());
    /// ```
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for TryPushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryPushError").finish_non_exhaustive()
    }
}
