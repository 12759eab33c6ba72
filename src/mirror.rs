//! Mirror tree model.
//!
//! The mirror tree has the same shape as the virtual tree it was reconciled
//! against, but every node also owns the handle of the live resource that
//! renders it. Mirrors are value records: a render pass reads the previous
//! mirror and builds a fresh one. Only the target handle is shared between the
//! two, and the previous mirror is dropped once the new one is committed.

use crate::vdom::{Props, VirtualNode};

#[derive(Debug, Clone, PartialEq)]
pub enum MirrorNode<T> {
    Element {
        tag: String,
        props: Props,
        children: Vec<MirrorNode<T>>,
        target: T,
    },
    Text {
        value: String,
        target: T,
    },
}

impl<T> MirrorNode<T> {
    /// The live resource this node is bound to.
    pub fn target(&self) -> &T {
        match self {
            Self::Element { target, .. } | Self::Text { target, .. } => target,
        }
    }

    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            Self::Text { .. } => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[MirrorNode<T>] {
        match self {
            Self::Element { children, .. } => children,
            Self::Text { .. } => &[],
        }
    }

    /// Strips the targets, giving back the shape this mirror materializes.
    #[must_use]
    pub fn to_virtual(&self) -> VirtualNode {
        match self {
            Self::Element {
                tag,
                props,
                children,
                ..
            } => VirtualNode::Element {
                tag: tag.clone(),
                props: props.clone(),
                children: children.iter().map(MirrorNode::to_virtual).collect(),
            },
            Self::Text { value, .. } => VirtualNode::Text(value.clone()),
        }
    }

    /// Number of nodes in this subtree, this node included.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.children().iter().map(MirrorNode::len).sum::<usize>()
    }

    /// A mirror always holds at least itself.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}
