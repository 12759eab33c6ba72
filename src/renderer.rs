//! Renderer adapters.
//!
//! The reconciler never touches a concrete resource itself. It asks a
//! [`Renderer`] to create targets and to apply [`Patch`]es to them, and the
//! renderer owns the resources' lifecycle.
//!
//! Two adapters ship with the crate:
//!
//! - [`document::Document`]: an arena-backed in-memory tree, useful on its own
//!   and as the retained model behind the terminal front-end.
//! - [`terminal::Screen`]: a ratatui widget drawing a [`document::Document`].
//!
//! A renderer shared as `Rc<RefCell<R>>` is itself a renderer, so the host
//! can keep reading it (to draw a frame, say) while a runtime owns a clone.

pub mod document;
pub mod terminal;

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use crate::{error::RenderError, patch::Patch, vdom::Props};

/// The contract a concrete rendering backend implements.
pub trait Renderer {
    /// Opaque handle to one live resource.
    ///
    /// Handles are cloned into mirror nodes and patches, so they should be
    /// cheap to clone (an index, an id, a reference-counted pointer).
    type Target: Clone + PartialEq + Debug;

    /// Creates an element resource with the given initial children.
    fn create_element(
        &mut self,
        tag: &str,
        props: &Props,
        children: &[Self::Target],
    ) -> Result<Self::Target, RenderError>;

    /// Creates a text resource.
    fn create_text(&mut self, value: &str) -> Result<Self::Target, RenderError>;

    /// Applies one patch to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when `target` is unknown or cannot service the
    /// patch kind.
    fn apply(
        &mut self,
        target: &Self::Target,
        patch: &Patch<Self::Target>,
    ) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    type Target = R::Target;

    fn create_element(
        &mut self,
        tag: &str,
        props: &Props,
        children: &[Self::Target],
    ) -> Result<Self::Target, RenderError> {
        (**self).create_element(tag, props, children)
    }

    fn create_text(&mut self, value: &str) -> Result<Self::Target, RenderError> {
        (**self).create_text(value)
    }

    fn apply(
        &mut self,
        target: &Self::Target,
        patch: &Patch<Self::Target>,
    ) -> Result<(), RenderError> {
        (**self).apply(target, patch)
    }
}

impl<R: Renderer> Renderer for Rc<RefCell<R>> {
    type Target = R::Target;

    fn create_element(
        &mut self,
        tag: &str,
        props: &Props,
        children: &[Self::Target],
    ) -> Result<Self::Target, RenderError> {
        self.borrow_mut().create_element(tag, props, children)
    }

    fn create_text(&mut self, value: &str) -> Result<Self::Target, RenderError> {
        self.borrow_mut().create_text(value)
    }

    fn apply(
        &mut self,
        target: &Self::Target,
        patch: &Patch<Self::Target>,
    ) -> Result<(), RenderError> {
        self.borrow_mut().apply(target, patch)
    }
}
