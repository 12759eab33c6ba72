use crate::{command::Command, subscription::Subscription, vdom::VirtualNode};

/// The trait that defines an application following the Elm Architecture.
///
/// The implementing type is the application state. `update` transforms it in
/// response to messages, `view` describes it as a virtual tree, and the
/// runtime reconciles that tree into a live renderer.
///
/// # Example
///
/// ```
/// use alder::prelude::*;
///
/// #[derive(Debug, Clone)]
/// enum Message {
///     Increment,
///     Decrement,
/// }
///
/// struct Counter {
///     value: i32,
/// }
///
/// impl Application for Counter {
///     type Message = Message;
///     type Flags = i32; // Initial value
///
///     fn init(initial: i32) -> (Self, Command<Message>) {
///         (Counter { value: initial }, Command::none())
///     }
///
///     fn update(&mut self, msg: Message) -> Command<Message> {
///         match msg {
///             Message::Increment => self.value += 1,
///             Message::Decrement => self.value -= 1,
///         }
///         Command::none()
///     }
///
///     fn view(&self) -> Option<VirtualNode> {
///         Some(text(self.value.to_string()))
///     }
/// }
/// ```
pub trait Application: Sized + 'static {
    /// The type of messages your application processes.
    type Message: 'static;

    /// Configuration data passed to [`Application::init`]. Use `()` if none.
    type Flags;

    /// Creates the initial state and the effects to run at startup.
    ///
    /// The startup effects run once, synchronously, while the runtime starts.
    /// Messages they dispatch are processed after the first render.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Processes a message.
    ///
    /// The state change commits as soon as this returns, before the view is
    /// rendered. The returned effects run after the render is scheduled.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Describes the current state. `None` renders nothing.
    ///
    /// This should be pure: read `self`, never mutate through interior
    /// mutability.
    fn view(&self) -> Option<VirtualNode>;

    /// Long-lived event sources wanted in the current state.
    ///
    /// Evaluated after every render pass; see
    /// [`subscription`](crate::subscription) for how activations are kept.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        Vec::new()
    }
}
