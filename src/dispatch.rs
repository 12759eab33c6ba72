//! The dispatch handle handed to effects and subscriptions.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;

/// A cloneable handle feeding messages back into a running program.
///
/// Sending from inside an update, an effect, or a render pass only queues the
/// message; the outermost active dispatch drains the queue. Sending from
/// outside (a timer task, a test) processes the message, and everything it
/// queues, before returning.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use alder::dispatch::Dispatch;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = seen.clone();
/// let dispatch = Dispatch::new(move |msg: i32| {
///     sink.borrow_mut().push(msg);
///     Ok(())
/// });
///
/// let doubled = dispatch.map(|n: i32| n * 2);
/// doubled.send(21).unwrap();
/// assert_eq!(*seen.borrow(), vec![42]);
/// ```
pub struct Dispatch<M> {
    sender: Rc<dyn Fn(M) -> Result<()>>,
}

impl<M> Clone for Dispatch<M> {
    fn clone(&self) -> Self {
        Self {
            sender: Rc::clone(&self.sender),
        }
    }
}

impl<M> fmt::Debug for Dispatch<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch").finish_non_exhaustive()
    }
}

impl<M: 'static> Dispatch<M> {
    pub fn new(sender: impl Fn(M) -> Result<()> + 'static) -> Self {
        Self {
            sender: Rc::new(sender),
        }
    }

    /// Sends a message.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while processing the messages this call
    /// drained, or [`Error::Detached`](crate::error::Error::Detached) when the
    /// runtime is gone.
    pub fn send(&self, msg: M) -> Result<()> {
        (self.sender)(msg)
    }

    /// Adapts the handle to another message type.
    #[must_use]
    pub fn map<N: 'static>(&self, f: impl Fn(N) -> M + 'static) -> Dispatch<N> {
        let inner = self.clone();
        Dispatch::new(move |msg| inner.send(f(msg)))
    }
}
