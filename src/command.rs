use std::rc::Rc;

use futures::FutureExt;
use tracing::warn;

use crate::dispatch::Dispatch;

/// A side-effecting callback run once after the update that produced it.
///
/// Effects receive the dispatch handle so they can feed messages back,
/// synchronously or later from a spawned task.
pub type Effect<M> = Box<dyn FnOnce(&Dispatch<M>)>;

/// An ordered list of effects returned from `init` and `update`.
///
/// The runtime runs the effects of a command in order, right after scheduling
/// the render for the update that returned it.
///
/// # Examples
///
/// ```
/// use alder::command::Command;
///
/// enum Message {
///     Loaded(u32),
///     Log,
/// }
///
/// let cmd = Command::batch([
///     Command::message(Message::Log),
///     Command::effect(|dispatch| {
///         let _ = dispatch.send(Message::Loaded(7));
///     }),
///     Command::none(),
/// ]);
/// assert_eq!(cmd.len(), 2);
/// ```
pub struct Command<M> {
    pub(crate) effects: Vec<Effect<M>>,
}

impl<M: 'static> Command<M> {
    /// A command that does nothing.
    #[must_use]
    pub fn none() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// A command running one effect.
    pub fn effect(effect: impl FnOnce(&Dispatch<M>) + 'static) -> Self {
        Self {
            effects: vec![Box::new(effect)],
        }
    }

    /// A command dispatching `msg` right away.
    ///
    /// The message is queued behind the one being processed, so it sees the
    /// state the current update produced.
    pub fn message(msg: M) -> Self {
        Self::effect(move |dispatch| {
            if let Err(err) = dispatch.send(msg) {
                warn!(%err, "immediate message was not delivered");
            }
        })
    }

    /// Concatenates commands, keeping their order.
    pub fn batch(commands: impl IntoIterator<Item = Command<M>>) -> Self {
        Self {
            effects: commands.into_iter().flat_map(|cmd| cmd.effects).collect(),
        }
    }

    /// Runs `future` on the current tokio `LocalSet` and dispatches `f(output)`.
    ///
    /// # Panics
    ///
    /// The effect panics when it runs outside of a `LocalSet`, like
    /// [`tokio::task::spawn_local`].
    ///
    /// # Examples
    ///
    /// ```
    /// use alder::command::Command;
    ///
    /// enum Message {
    ///     Fetched(String),
    /// }
    ///
    /// async fn fetch() -> String {
    ///     "data".to_string()
    /// }
    ///
    /// let cmd = Command::perform(fetch(), Message::Fetched);
    /// ```
    pub fn perform<A: 'static>(
        future: impl Future<Output = A> + 'static,
        f: impl FnOnce(A) -> M + 'static,
    ) -> Self {
        Self::future(future.map(f))
    }

    /// Runs `future` on the current tokio `LocalSet` and dispatches its output.
    pub fn future(future: impl Future<Output = M> + 'static) -> Self {
        Self::effect(move |dispatch| {
            let dispatch = dispatch.clone();
            tokio::task::spawn_local(future.map(move |msg| {
                if let Err(err) = dispatch.send(msg) {
                    warn!(%err, "message from async effect was not delivered");
                }
            }));
        })
    }

    /// Converts the messages this command dispatches.
    #[must_use]
    pub fn map<N: 'static>(self, f: impl Fn(M) -> N + 'static) -> Command<N> {
        let f: Rc<dyn Fn(M) -> N> = Rc::new(f);
        Command {
            effects: self
                .effects
                .into_iter()
                .map(|effect| {
                    let f = Rc::clone(&f);
                    Box::new(move |dispatch: &Dispatch<N>| {
                        effect(&dispatch.map(move |msg| f(msg)));
                    }) as Effect<N>
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.effects.is_empty()
    }

    /// Runs every effect in order with `dispatch`.
    pub fn run(self, dispatch: &Dispatch<M>) {
        for effect in self.effects {
            effect(dispatch);
        }
    }
}

impl<M: 'static> Default for Command<M> {
    fn default() -> Self {
        Self::none()
    }
}
