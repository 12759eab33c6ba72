//! Reconciliation of a mirror tree against a new virtual tree.
//!
//! [`reconcile`] walks the previous [`MirrorNode`] and the new [`VirtualNode`]
//! side by side. Patches that mutate a node's own target are applied through
//! the [`Renderer`] as they are found; patches that change how a node hangs
//! off its parent (inserting a fresh node, removing a stale one) are returned
//! to the caller, which applies them to the parent target.
//!
//! Children are paired strictly by position. Removing an item from the middle
//! of a list therefore updates every following sibling in place and removes
//! the last one; there is no key-based matching.

use tracing::{debug, trace};

use crate::{
    error::Result,
    mirror::MirrorNode,
    patch::{Patch, PropsPatch},
    renderer::Renderer,
    vdom::VirtualNode,
};

/// Outcome of one reconciliation step.
#[derive(Debug)]
pub struct Reconciled<T> {
    /// The mirror now materializing the virtual node, `None` if it was removed.
    pub mirror: Option<MirrorNode<T>>,
    /// Patches the parent must apply to its own target, in order.
    pub patches: Vec<Patch<T>>,
}

impl<T> Reconciled<T> {
    fn unchanged(mirror: MirrorNode<T>) -> Self {
        Self {
            mirror: Some(mirror),
            patches: Vec::new(),
        }
    }
}

/// Reconciles `mirror` against `node`.
///
/// The previous mirror is only read. On error it is still a faithful record
/// of everything that was committed before this call, although the renderer
/// may already have applied some of the patches of this pass.
///
/// # Errors
///
/// Returns an error when the renderer fails to create a target or rejects a
/// patch.
pub fn reconcile<R: Renderer>(
    renderer: &mut R,
    mirror: Option<&MirrorNode<R::Target>>,
    node: Option<&VirtualNode>,
) -> Result<Reconciled<R::Target>> {
    match (mirror, node) {
        (None, None) => Ok(Reconciled {
            mirror: None,
            patches: Vec::new(),
        }),

        (Some(old), None) => {
            trace!(node = ?old.target(), "removing node");
            Ok(Reconciled {
                mirror: None,
                patches: vec![Patch::RemoveChild {
                    child: old.target().clone(),
                }],
            })
        }

        (Some(MirrorNode::Text { value, target }), Some(VirtualNode::Text(new_value))) => {
            if value == new_value {
                return Ok(Reconciled::unchanged(MirrorNode::Text {
                    value: value.clone(),
                    target: target.clone(),
                }));
            }
            renderer.apply(target, &Patch::Text(new_value.clone()))?;
            Ok(Reconciled::unchanged(MirrorNode::Text {
                value: new_value.clone(),
                target: target.clone(),
            }))
        }

        (
            Some(MirrorNode::Element {
                tag,
                props,
                children,
                target,
            }),
            Some(VirtualNode::Element {
                tag: new_tag,
                props: new_props,
                children: new_children,
            }),
        ) if tag == new_tag => {
            if props != new_props {
                let delta = PropsPatch::diff(props, new_props);
                trace!(
                    node = ?target,
                    set = delta.set.len(),
                    remove = delta.remove.len(),
                    "props changed"
                );
                renderer.apply(target, &Patch::Props(delta))?;
            }

            let (children, patches) = reconcile_children(renderer, children, new_children)?;
            for patch in &patches {
                renderer.apply(target, patch)?;
            }

            Ok(Reconciled::unchanged(MirrorNode::Element {
                tag: tag.clone(),
                props: new_props.clone(),
                children,
                target: target.clone(),
            }))
        }

        (old, Some(node)) => replace(renderer, old, node),
    }
}

/// Builds a fresh subtree for `node` and bubbles the insert (and removal of
/// `old`, if any) to the parent.
fn replace<R: Renderer>(
    renderer: &mut R,
    old: Option<&MirrorNode<R::Target>>,
    node: &VirtualNode,
) -> Result<Reconciled<R::Target>> {
    let mirror = match node {
        VirtualNode::Text(value) => MirrorNode::Text {
            value: value.clone(),
            target: renderer.create_text(value)?,
        },
        VirtualNode::Element {
            tag,
            props,
            children,
        } => {
            let target = renderer.create_element(tag, props, &[])?;
            let (children, patches) = reconcile_children(renderer, &[], children)?;
            for patch in &patches {
                renderer.apply(&target, patch)?;
            }
            MirrorNode::Element {
                tag: tag.clone(),
                props: props.clone(),
                children,
                target,
            }
        }
    };

    let reference = old.map(|old| old.target().clone());
    debug!(node = ?mirror.target(), replaces = ?reference, "created node");

    let mut patches = vec![Patch::InsertChild {
        child: mirror.target().clone(),
        reference: reference.clone(),
    }];
    if let Some(old) = reference {
        patches.push(Patch::RemoveChild { child: old });
    }

    Ok(Reconciled {
        mirror: Some(mirror),
        patches,
    })
}

/// Pairs children by index over the longer of the two lists.
#[allow(clippy::type_complexity)]
fn reconcile_children<R: Renderer>(
    renderer: &mut R,
    old: &[MirrorNode<R::Target>],
    new: &[VirtualNode],
) -> Result<(Vec<MirrorNode<R::Target>>, Vec<Patch<R::Target>>)> {
    let mut children = Vec::with_capacity(new.len());
    let mut patches = Vec::new();

    for i in 0..old.len().max(new.len()) {
        let step = reconcile(renderer, old.get(i), new.get(i))?;
        children.extend(step.mirror);
        patches.extend(step.patches);
    }

    Ok((children, patches))
}
