//! Timer subscription for periodic events.
//!
//! This module provides the [`Timer`] subscription source for creating
//! time-based events in your application.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::Duration;

use futures::StreamExt;
use tokio::time::{MissedTickBehavior, interval};
use tokio_stream::wrappers::IntervalStream;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::{SubscriptionId, SubscriptionSource, Unsubscribe};
use crate::dispatch::Dispatch;

/// Messages produced by the [`Timer`] subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A timer tick has occurred.
    Tick,
}

/// A timer subscription that emits tick messages at regular intervals.
///
/// The ticking task runs on the current tokio `LocalSet` and is cancelled
/// when the subscription goes away. Missed ticks are skipped rather than
/// replayed, and the first tick arrives one full interval after subscribing.
///
/// # Example
///
/// ```rust
/// use alder::subscription::{Subscription, time::Timer};
///
/// enum AppMessage {
///     Tick,
/// }
///
/// let sub = Subscription::new(Timer::new(1000)).map(|_| AppMessage::Tick);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    interval_ms: u64,
}

impl Timer {
    /// Create a new timer with an interval in milliseconds.
    #[must_use]
    pub const fn new(interval_ms: u64) -> Self {
        Self { interval_ms }
    }
}

impl SubscriptionSource for Timer {
    type Output = Message;

    fn subscribe(&self, dispatch: Dispatch<Message>) -> Unsubscribe {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let period = Duration::from_millis(self.interval_ms);

        tokio::task::spawn_local(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick of a tokio interval completes immediately
            let mut ticks = IntervalStream::new(ticker).skip(1);

            loop {
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    tick = ticks.next() => {
                        if tick.is_none() {
                            break;
                        }
                        if let Err(err) = dispatch.send(Message::Tick) {
                            warn!(%err, "timer tick was not delivered; stopping timer");
                            break;
                        }
                    }
                }
            }
        });

        Unsubscribe::new(move || token.cancel())
    }

    fn id(&self) -> SubscriptionId {
        let mut hasher = DefaultHasher::new();
        self.interval_ms.hash(&mut hasher);
        SubscriptionId::of::<Self>(hasher.finish())
    }
}

impl Hash for Timer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.interval_ms.hash(state);
    }
}
