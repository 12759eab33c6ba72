//! In-memory document renderer.
//!
//! [`Document`] keeps every created node in an arena and hands out
//! [`NodeId`]s as targets. Removing a child releases its whole subtree, and
//! released slots are handed out again to later nodes.
//! Optionally it records every applied patch, which makes it the workhorse
//! for reconciler and runtime tests.
//!
//! ```
//! use alder::reconcile::reconcile;
//! use alder::renderer::document::Document;
//! use alder::vdom::{el, text, Props};
//!
//! let mut doc = Document::new();
//! let tree = el("p", Props::new(), [text("hello")]);
//! let out = reconcile(&mut doc, None, Some(&tree)).unwrap();
//! let mirror = out.mirror.unwrap();
//! assert_eq!(doc.to_virtual(*mirror.target()), Some(tree));
//! ```

use std::fmt;

use tracing::trace;

use crate::{
    error::RenderError,
    patch::Patch,
    renderer::Renderer,
    vdom::{Props, VirtualNode},
};

/// Handle of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element { tag: String, props: Props },
    Text(String),
}

#[derive(Debug, Clone)]
pub struct DocNode {
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

/// Arena-backed tree implementing [`Renderer`].
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Option<DocNode>>,
    free: Vec<usize>,
    history: Option<Vec<(NodeId, Patch<NodeId>)>>,
    created: usize,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A document that records every applied patch.
    #[must_use]
    pub fn recording() -> Self {
        Self {
            history: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Drains the recorded patches. Empty unless created with [`Document::recording`].
    pub fn take_history(&mut self) -> Vec<(NodeId, Patch<NodeId>)> {
        self.history.as_mut().map(std::mem::take).unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&DocNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes ever created, released ones included.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Rebuilds the virtual shape of the subtree rooted at `id`.
    #[must_use]
    pub fn to_virtual(&self, id: NodeId) -> Option<VirtualNode> {
        let node = self.get(id)?;
        Some(match &node.kind {
            NodeKind::Text(value) => VirtualNode::Text(value.clone()),
            NodeKind::Element { tag, props } => VirtualNode::Element {
                tag: tag.clone(),
                props: props.clone(),
                children: node
                    .children
                    .iter()
                    .filter_map(|child| self.to_virtual(*child))
                    .collect(),
            },
        })
    }

    /// Concatenated text of the subtree rooted at `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(value) => out.push_str(value),
            NodeKind::Element { .. } => {
                for child in &node.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let node = DocNode {
            kind,
            children: Vec::new(),
            parent: None,
        };
        self.created += 1;
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut DocNode, RenderError> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| RenderError::UnknownTarget(id.to_string()))
    }

    fn detach(&mut self, child: NodeId) -> Result<(), RenderError> {
        if let Some(parent) = self.node_mut(child)?.parent.take() {
            self.node_mut(parent)?.children.retain(|c| *c != child);
        }
        Ok(())
    }

    fn release(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.0).and_then(Option::take) {
            self.free.push(id.0);
            for child in node.children {
                self.release(child);
            }
        }
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), RenderError> {
        self.node_mut(child)?;
        if let Some(reference) = reference {
            if reference == child || !self.node_mut(parent)?.children.contains(&reference) {
                return Err(RenderError::UnknownTarget(reference.to_string()));
            }
        }
        self.detach(child)?;

        let node = self.node_mut(parent)?;
        let index = reference
            .and_then(|reference| node.children.iter().position(|c| *c == reference))
            .unwrap_or(node.children.len());
        node.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), RenderError> {
        let node = self.node_mut(parent)?;
        let Some(index) = node.children.iter().position(|c| *c == child) else {
            return Err(RenderError::UnknownTarget(child.to_string()));
        };
        node.children.remove(index);
        self.release(child);
        Ok(())
    }
}

impl Renderer for Document {
    type Target = NodeId;

    fn create_element(
        &mut self,
        tag: &str,
        props: &Props,
        children: &[NodeId],
    ) -> Result<NodeId, RenderError> {
        let id = self.alloc(NodeKind::Element {
            tag: tag.to_owned(),
            props: props.clone(),
        });
        for child in children {
            self.insert_child(id, *child, None)?;
        }
        trace!(%id, tag, "created element");
        Ok(id)
    }

    fn create_text(&mut self, value: &str) -> Result<NodeId, RenderError> {
        let id = self.alloc(NodeKind::Text(value.to_owned()));
        trace!(%id, "created text");
        Ok(id)
    }

    fn apply(&mut self, target: &NodeId, patch: &Patch<NodeId>) -> Result<(), RenderError> {
        let id = *target;
        let unsupported = || RenderError::Unsupported {
            target: id.to_string(),
            patch: patch.kind(),
        };

        match patch {
            Patch::Props(delta) => match &mut self.node_mut(id)?.kind {
                NodeKind::Element { props, .. } => delta.apply_to(props),
                NodeKind::Text(_) => return Err(unsupported()),
            },
            Patch::Text(value) => match &mut self.node_mut(id)?.kind {
                NodeKind::Text(current) => value.clone_into(current),
                NodeKind::Element { .. } => return Err(unsupported()),
            },
            Patch::InsertChild { child, reference } => {
                if matches!(self.node_mut(id)?.kind, NodeKind::Text(_)) {
                    return Err(unsupported());
                }
                self.insert_child(id, *child, *reference)?;
            }
            Patch::RemoveChild { child } => self.remove_child(id, *child)?,
        }

        if let Some(history) = &mut self.history {
            history.push((id, patch.clone()));
        }
        Ok(())
    }
}
