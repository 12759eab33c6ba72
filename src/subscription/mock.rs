//! Mock subscription source for testing.
//!
//! [`MockSource`] emits values on demand, so subscription-driven behavior can
//! be tested without timers or a terminal. Clones share the same listeners and
//! the same identity, so one clone can live in the application and another in
//! the test.
//!
//! ```
//! use alder::subscription::{Subscription, SubscriptionManager, mock::MockSource};
//! use alder::dispatch::Dispatch;
//!
//! let mock = MockSource::<i32>::new();
//! let mut manager = SubscriptionManager::new();
//! manager.update(vec![Subscription::new(mock.clone())], &Dispatch::new(|_| Ok(())));
//!
//! assert_eq!(mock.receiver_count(), 1);
//! assert_eq!(mock.emit(42).unwrap(), 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{SubscriptionId, SubscriptionSource, Unsubscribe};
use crate::{dispatch::Dispatch, error::Result};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

struct Listeners<T> {
    next: u64,
    active: Vec<(u64, Dispatch<T>)>,
}

/// A subscription source that emits values when told to.
pub struct MockSource<T> {
    listeners: Rc<RefCell<Listeners<T>>>,
    id: u64,
}

impl<T> Clone for MockSource<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
            id: self.id,
        }
    }
}

impl<T: Clone + 'static> MockSource<T> {
    /// Creates a source with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Listeners {
                next: 0,
                active: Vec::new(),
            })),
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Sends `value` to every active subscriber, returning how many got it.
    ///
    /// # Errors
    ///
    /// Returns the first dispatch error.
    pub fn emit(&self, value: T) -> Result<usize> {
        // snapshot so subscribers may (un)subscribe while handling the value
        let targets: Vec<Dispatch<T>> = self
            .listeners
            .borrow()
            .active
            .iter()
            .map(|(_, dispatch)| dispatch.clone())
            .collect();

        for dispatch in &targets {
            dispatch.send(value.clone())?;
        }
        Ok(targets.len())
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.listeners.borrow().active.len()
    }
}

impl<T: Clone + 'static> Default for MockSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> SubscriptionSource for MockSource<T> {
    type Output = T;

    fn subscribe(&self, dispatch: Dispatch<T>) -> Unsubscribe {
        let key = {
            let mut listeners = self.listeners.borrow_mut();
            let key = listeners.next;
            listeners.next += 1;
            listeners.active.push((key, dispatch));
            key
        };

        let listeners = Rc::clone(&self.listeners);
        Unsubscribe::new(move || {
            listeners.borrow_mut().active.retain(|(k, _)| *k != key);
        })
    }

    fn id(&self) -> SubscriptionId {
        SubscriptionId::of::<Self>(self.id)
    }
}
