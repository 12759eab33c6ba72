//! Prelude module for convenient imports.
//!
//! ```
//! use alder::prelude::*;
//! ```
//!
//! # What's included
//!
//! - [`Application`] - The main application trait
//! - [`Command`] and [`Dispatch`] - For performing side effects
//! - [`Subscription`] and [`Unsubscribe`] - For handling event sources
//! - [`Runtime`] and [`Mount`] - The dispatch loop and where it renders
//! - [`VirtualNode`], [`Props`], [`el`], [`text`] - For describing views
//! - [`Renderer`] - The backend contract

pub use crate::application::Application;
pub use crate::command::Command;
pub use crate::config::{InitEffects, RuntimeConfig};
pub use crate::dispatch::Dispatch;
pub use crate::renderer::Renderer;
pub use crate::runtime::{Mount, Runtime};
pub use crate::schedule::{Immediate, RenderQueue, Scheduler};
pub use crate::subscription::{Subscription, Unsubscribe};
pub use crate::vdom::{Props, VirtualNode, el, text};
