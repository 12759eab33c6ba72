//! Subscriptions: long-lived effect sources kept alive across renders.
//!
//! After every render the runtime asks the application for its current
//! subscriptions and hands them to a [`SubscriptionManager`]. A subscription
//! whose [`SubscriptionId`] was already active is carried forward untouched;
//! a new one is subscribed; an active one that disappeared is unsubscribed
//! exactly once.
//!
//! # Identity
//!
//! - [`Subscription::new`] takes a reusable [`SubscriptionSource`], identified
//!   by its type and a hash of its configuration.
//! - [`Subscription::keyed`] takes an explicit key.
//! - [`Subscription::from_fn`] derives the identity from its call site, so the
//!   same line of code always names the same subscription. Use `keyed` when
//!   one call site creates several distinct subscriptions (in a loop, or in a
//!   shared helper).
//!
//! # Example
//!
//! ```
//! use alder::subscription::{Subscription, Unsubscribe};
//!
//! enum Message {
//!     Tick,
//! }
//!
//! fn subscriptions(running: bool) -> Vec<Subscription<Message>> {
//!     if !running {
//!         return vec![];
//!     }
//!     vec![Subscription::keyed("ticker", |dispatch| {
//!         let _ = dispatch.send(Message::Tick);
//!         Unsubscribe::new(|| { /* stop the ticker */ })
//!     })]
//! }
//! ```

pub mod mock;
pub mod terminal;
pub mod time;

use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::Location;

use tracing::debug;

use crate::dispatch::Dispatch;

/// Identity of a subscription, stable across renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    hash: u64,
}

impl SubscriptionId {
    /// An id scoped to type `T`, distinguished by `hash`.
    #[must_use]
    pub fn of<T: 'static>(hash: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            hash,
        }
    }

    /// An id derived from an explicit key. Keys of different types never
    /// collide.
    #[must_use]
    pub fn keyed<K: Hash + 'static>(key: &K) -> Self {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        Self::of::<K>(hasher.finish())
    }

    /// An id derived from the caller's source location.
    #[must_use]
    #[track_caller]
    pub fn here() -> Self {
        struct CallSite;

        let location = Location::caller();
        let mut hasher = DefaultHasher::new();
        location.file().hash(&mut hasher);
        location.line().hash(&mut hasher);
        location.column().hash(&mut hasher);
        Self::of::<CallSite>(hasher.finish())
    }
}

/// Tears a subscription down. Invoked at most once.
pub struct Unsubscribe {
    teardown: Box<dyn FnOnce()>,
}

impl Unsubscribe {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Box::new(teardown),
        }
    }

    /// An unsubscribe with nothing to tear down.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    pub fn call(self) {
        (self.teardown)();
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe").finish_non_exhaustive()
    }
}

/// A reusable source of subscription events.
///
/// Implement this for configurable sources (timers, input streams). The id
/// must be equal for equally configured sources and differ otherwise.
pub trait SubscriptionSource: 'static {
    /// The values this source emits.
    type Output: 'static;

    /// Starts emitting into `dispatch` and returns how to stop.
    fn subscribe(&self, dispatch: Dispatch<Self::Output>) -> Unsubscribe;

    /// Identity of this source.
    fn id(&self) -> SubscriptionId;
}

/// A subscription descriptor returned from `Application::subscriptions`.
pub struct Subscription<M> {
    id: SubscriptionId,
    spawn: Box<dyn FnOnce(Dispatch<M>) -> Unsubscribe>,
}

impl<M: 'static> Subscription<M> {
    /// A subscription backed by a [`SubscriptionSource`].
    pub fn new<S: SubscriptionSource<Output = M>>(source: S) -> Self {
        Self {
            id: source.id(),
            spawn: Box::new(move |dispatch| source.subscribe(dispatch)),
        }
    }

    /// A subscription identified by `key`.
    pub fn keyed<K: Hash + 'static>(
        key: K,
        subscribe: impl FnOnce(Dispatch<M>) -> Unsubscribe + 'static,
    ) -> Self {
        Self {
            id: SubscriptionId::keyed(&key),
            spawn: Box::new(subscribe),
        }
    }

    /// A subscription identified by the location of this call.
    #[track_caller]
    pub fn from_fn(subscribe: impl FnOnce(Dispatch<M>) -> Unsubscribe + 'static) -> Self {
        Self {
            id: SubscriptionId::here(),
            spawn: Box::new(subscribe),
        }
    }

    /// Converts emitted values into another message type. The id is kept.
    #[must_use]
    pub fn map<N: 'static>(self, f: impl Fn(M) -> N + 'static) -> Subscription<N> {
        let spawn = self.spawn;
        Subscription {
            id: self.id,
            spawn: Box::new(move |dispatch: Dispatch<N>| spawn(dispatch.map(f))),
        }
    }

    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl<M> fmt::Debug for Subscription<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Table of active subscriptions.
///
/// Dropping the manager unsubscribes everything still active.
pub struct SubscriptionManager<M> {
    active: HashMap<SubscriptionId, Unsubscribe>,
    _message: std::marker::PhantomData<fn(M)>,
}

impl<M: 'static> SubscriptionManager<M> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: HashMap::new(),
            _message: std::marker::PhantomData,
        }
    }

    /// Brings the active set in line with `subscriptions`.
    pub fn update(&mut self, subscriptions: Vec<Subscription<M>>, dispatch: &Dispatch<M>) {
        let mut previous = std::mem::take(&mut self.active);

        for sub in subscriptions {
            if self.active.contains_key(&sub.id) {
                continue;
            }
            let unsubscribe = match previous.remove(&sub.id) {
                Some(unsubscribe) => unsubscribe,
                None => {
                    debug!(id = ?sub.id, "subscribing");
                    (sub.spawn)(dispatch.clone())
                }
            };
            self.active.insert(sub.id, unsubscribe);
        }

        for (id, unsubscribe) in previous {
            debug!(?id, "unsubscribing");
            unsubscribe.call();
        }
    }

    /// Unsubscribes everything.
    pub fn shutdown(&mut self) {
        for (id, unsubscribe) in self.active.drain() {
            debug!(?id, "unsubscribing on shutdown");
            unsubscribe.call();
        }
    }

    #[must_use]
    pub fn is_active(&self, id: SubscriptionId) -> bool {
        self.active.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl<M: 'static> Default for SubscriptionManager<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Drop for SubscriptionManager<M> {
    fn drop(&mut self) {
        for (_, unsubscribe) in self.active.drain() {
            unsubscribe.call();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        subscribed: Cell<u32>,
        unsubscribed: Cell<u32>,
    }

    fn counted(key: &'static str, counts: &Rc<Counts>) -> Subscription<i32> {
        let counts = Rc::clone(counts);
        Subscription::keyed(key, move |_dispatch| {
            counts.subscribed.set(counts.subscribed.get() + 1);
            Unsubscribe::new(move || counts.unsubscribed.set(counts.unsubscribed.get() + 1))
        })
    }

    fn dispatch() -> Dispatch<i32> {
        Dispatch::new(|_| Ok(()))
    }

    #[test]
    fn test_same_key_is_carried_forward() {
        let counts = Rc::new(Counts::default());
        let mut manager = SubscriptionManager::new();

        for _ in 0..3 {
            manager.update(vec![counted("a", &counts)], &dispatch());
        }

        assert_eq!(counts.subscribed.get(), 1);
        assert_eq!(counts.unsubscribed.get(), 0);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_disappearing_subscription_unsubscribes_once() {
        let counts = Rc::new(Counts::default());
        let mut manager = SubscriptionManager::new();

        manager.update(vec![counted("a", &counts)], &dispatch());
        manager.update(vec![], &dispatch());
        manager.update(vec![], &dispatch());

        assert_eq!(counts.subscribed.get(), 1);
        assert_eq!(counts.unsubscribed.get(), 1);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_duplicate_ids_activate_once() {
        let counts = Rc::new(Counts::default());
        let mut manager = SubscriptionManager::new();

        manager.update(vec![counted("a", &counts), counted("a", &counts)], &dispatch());

        assert_eq!(counts.subscribed.get(), 1);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_swap_keys() {
        let a = Rc::new(Counts::default());
        let b = Rc::new(Counts::default());
        let mut manager = SubscriptionManager::new();

        manager.update(vec![counted("a", &a)], &dispatch());
        manager.update(vec![counted("b", &b)], &dispatch());

        assert_eq!((a.subscribed.get(), a.unsubscribed.get()), (1, 1));
        assert_eq!((b.subscribed.get(), b.unsubscribed.get()), (1, 0));
        assert!(manager.is_active(SubscriptionId::keyed(&"b")));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let counts = Rc::new(Counts::default());
        {
            let mut manager = SubscriptionManager::new();
            manager.update(vec![counted("a", &counts)], &dispatch());
        }
        assert_eq!(counts.unsubscribed.get(), 1);
    }

    #[test]
    fn test_call_site_identity() {
        fn make() -> Subscription<i32> {
            Subscription::from_fn(|_| Unsubscribe::noop())
        }
        let other = Subscription::<i32>::from_fn(|_| Unsubscribe::noop());

        assert_eq!(make().id(), make().id());
        assert_ne!(make().id(), other.id());
    }

    #[test]
    fn test_keyed_ids_are_typed() {
        assert_eq!(SubscriptionId::keyed(&1u32), SubscriptionId::keyed(&1u32));
        assert_ne!(SubscriptionId::keyed(&1u32), SubscriptionId::keyed(&1u64));
        assert_ne!(SubscriptionId::keyed(&"a"), SubscriptionId::keyed(&"b"));
    }

    #[test]
    fn test_map_keeps_id_and_converts() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = Subscription::keyed("n", |dispatch: Dispatch<i32>| {
            dispatch.send(5).unwrap();
            Unsubscribe::noop()
        });
        let id = sub.id();
        let mapped = sub.map(|n| format!("got {n}"));
        assert_eq!(mapped.id(), id);

        let mut manager = SubscriptionManager::new();
        manager.update(
            vec![mapped],
            &Dispatch::new(move |msg: String| {
                sink.borrow_mut().push(msg);
                Ok(())
            }),
        );
        assert_eq!(*seen.borrow(), vec!["got 5".to_owned()]);
    }
}
