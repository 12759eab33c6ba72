//! Terminal input subscriptions built on crossterm's `EventStream`.
//!
//! [`TerminalEvents`] forwards raw crossterm events. [`KeyInput`] translates
//! key presses into application messages through an explicit [`KeyMap`] and
//! drops everything else.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::rc::Rc;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::{SubscriptionId, SubscriptionSource, Unsubscribe};
use crate::dispatch::Dispatch;

/// Raw terminal event subscription.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerminalEvents;

impl TerminalEvents {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SubscriptionSource for TerminalEvents {
    type Output = Event;

    fn subscribe(&self, dispatch: Dispatch<Event>) -> Unsubscribe {
        spawn_event_loop(move |event| dispatch.send(event))
    }

    fn id(&self) -> SubscriptionId {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        SubscriptionId::of::<Self>(hasher.finish())
    }
}

impl Hash for TerminalEvents {
    fn hash<H: Hasher>(&self, state: &mut H) {
        "terminal".hash(state);
    }
}

/// Explicit mapping from key presses to messages.
///
/// ```
/// use alder::subscription::terminal::KeyMap;
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Message {
///     Up,
///     Quit,
/// }
///
/// let keys = KeyMap::new()
///     .bind(KeyCode::Char('u'), Message::Up)
///     .bind(KeyCode::Char('q'), Message::Quit);
///
/// let press = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::NONE);
/// assert_eq!(keys.lookup(&press), Some(Message::Up));
/// ```
#[derive(Debug, Clone)]
pub struct KeyMap<M> {
    bindings: Vec<(KeyCode, KeyModifiers, M)>,
}

impl<M: Clone> KeyMap<M> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Binds an unmodified key. Later bindings for the same key win.
    #[must_use]
    pub fn bind(self, code: KeyCode, msg: M) -> Self {
        self.bind_with(code, KeyModifiers::NONE, msg)
    }

    /// Binds a key with modifiers (for example `Ctrl+C`).
    #[must_use]
    pub fn bind_with(mut self, code: KeyCode, modifiers: KeyModifiers, msg: M) -> Self {
        self.bindings.retain(|(c, m, _)| (*c, *m) != (code, modifiers));
        self.bindings.push((code, modifiers, msg));
        self
    }

    /// The message bound to a key press. Releases and repeats map to nothing.
    #[must_use]
    pub fn lookup(&self, key: &KeyEvent) -> Option<M> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        self.bindings
            .iter()
            .find(|(code, modifiers, _)| *code == key.code && *modifiers == key.modifiers)
            .map(|(_, _, msg)| msg.clone())
    }

    /// Translates any terminal event.
    #[must_use]
    pub fn translate(&self, event: &Event) -> Option<M> {
        match event {
            Event::Key(key) => self.lookup(key),
            _ => None,
        }
    }
}

impl<M: Clone> Default for KeyMap<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Key presses translated through a [`KeyMap`].
///
/// All `KeyInput` sources share one identity: while the subscription stays
/// active, the key map it was first activated with stays in effect.
#[derive(Debug, Clone)]
pub struct KeyInput<M> {
    keys: Rc<KeyMap<M>>,
}

impl<M: Clone> KeyInput<M> {
    #[must_use]
    pub fn new(keys: KeyMap<M>) -> Self {
        Self {
            keys: Rc::new(keys),
        }
    }
}

impl<M: Clone + 'static> SubscriptionSource for KeyInput<M> {
    type Output = M;

    fn subscribe(&self, dispatch: Dispatch<M>) -> Unsubscribe {
        let keys = Rc::clone(&self.keys);
        spawn_event_loop(move |event| match keys.translate(&event) {
            Some(msg) => dispatch.send(msg),
            None => Ok(()),
        })
    }

    fn id(&self) -> SubscriptionId {
        let mut hasher = DefaultHasher::new();
        "terminal-keys".hash(&mut hasher);
        SubscriptionId::of::<KeyInput<()>>(hasher.finish())
    }
}

fn spawn_event_loop(
    mut forward: impl FnMut(Event) -> crate::error::Result<()> + 'static,
) -> Unsubscribe {
    let token = CancellationToken::new();
    let cancelled = token.clone();

    tokio::task::spawn_local(async move {
        let mut events = EventStream::new();
        loop {
            tokio::select! {
                () = cancelled.cancelled() => break,
                event = events.next() => match event {
                    Some(Ok(event)) => {
                        if let Err(err) = forward(event) {
                            warn!(%err, "terminal event was not delivered; stopping input");
                            break;
                        }
                    }
                    Some(Err(err)) => {
                        warn!(%err, "terminal event stream failed");
                        break;
                    }
                    None => break,
                },
            }
        }
    });

    Unsubscribe::new(move || token.cancel())
}
