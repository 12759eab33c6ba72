//! # Alder - Elm Architecture Runtime with a Virtual-Tree Reconciler
//!
//! Alder runs applications written in the Elm Architecture (TEA) against any
//! retained rendering backend. The application describes its state as a
//! virtual tree; the runtime reconciles that tree against a mirror of what is
//! currently rendered and applies the minimal set of patches through a
//! [`Renderer`](renderer::Renderer).
//!
//! ## Architecture
//!
//! 1. **Model**: your application state
//! 2. **Message**: events that can change the state
//! 3. **Update**: processes a message, mutates the model, returns effects
//! 4. **View**: describes the model as a [`VirtualNode`](vdom::VirtualNode) tree
//! 5. **Subscriptions**: long-lived event sources (timers, terminal input)
//! 6. **Commands**: side effects run after an update
//!
//! ## Core Components
//!
//! - [`Application`](application::Application): the trait your program implements
//! - [`Runtime`](runtime::Runtime): the dispatch loop
//! - [`reconcile`](reconcile::reconcile): diffs a mirror against a virtual tree
//! - [`Renderer`](renderer::Renderer): the backend contract, with an in-memory
//!   [`Document`](renderer::document::Document) and a ratatui
//!   [`Screen`](renderer::terminal::Screen)
//! - [`Scheduler`](schedule::Scheduler): decides when render passes run
//! - [`Command`](command::Command) and [`Subscription`](subscription::Subscription)
//!
//! ## Example
//!
//! ```rust
//! use alder::prelude::*;
//! use alder::renderer::document::Document;
//!
//! #[derive(Debug)]
//! enum Message {
//!     Increment,
//! }
//!
//! struct Counter {
//!     count: u32,
//! }
//!
//! impl Application for Counter {
//!     type Message = Message;
//!     type Flags = ();
//!
//!     fn init(_flags: ()) -> (Self, Command<Message>) {
//!         (Counter { count: 0 }, Command::none())
//!     }
//!
//!     fn update(&mut self, msg: Message) -> Command<Message> {
//!         match msg {
//!             Message::Increment => {
//!                 self.count += 1;
//!                 Command::none()
//!             }
//!         }
//!     }
//!
//!     fn view(&self) -> Option<VirtualNode> {
//!         Some(el("p", Props::new(), [text(self.count.to_string())]))
//!     }
//! }
//!
//! # fn main() -> Result<(), alder::error::Error> {
//! let runtime = Runtime::<Counter, Document>::start((), Document::new(), Mount::sink(|_| {}))?;
//! runtime.dispatch(Message::Increment)?;
//! assert_eq!(runtime.with_state(|app| app.count)?, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Inspiration
//!
//! The application model follows [iced](https://github.com/iced-rs/iced) and
//! Elm; reconciliation is positional, in the style of early virtual-DOM
//! libraries.

pub mod application;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mirror;
pub mod patch;
pub mod prelude;
pub mod reconcile;
pub mod renderer;
pub mod runtime;
pub mod schedule;
pub mod subscription;
pub mod vdom;
