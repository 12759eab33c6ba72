//! Virtual tree model.
//!
//! A [`VirtualNode`] is an immutable description of what should be on screen
//! for one render. It carries no live resource; the reconciler compares it
//! against the [`MirrorNode`](crate::mirror::MirrorNode) tree produced by the
//! previous render.
//!
//! ```
//! use alder::vdom::{el, text, Props};
//!
//! let node = el(
//!     "div",
//!     Props::new().with("width", "100px"),
//!     [text("hello"), el("span", Props::new(), [text("world")])],
//! );
//! assert_eq!(node.tag(), Some("div"));
//! assert_eq!(node.children().len(), 2);
//! ```

use std::collections::BTreeMap;
use std::fmt;

/// A primitive property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Element properties. Ordering is irrelevant to equality.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(BTreeMap<String, PropValue>);

impl Props {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Immutable description of one node of the desired tree.
#[derive(Debug, Clone, PartialEq)]
pub enum VirtualNode {
    Element {
        tag: String,
        props: Props,
        children: Vec<VirtualNode>,
    },
    Text(String),
}

impl VirtualNode {
    /// Returns the tag for an element, `None` for text.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            Self::Text(_) => None,
        }
    }

    /// Returns the children of an element; text nodes have none.
    #[must_use]
    pub fn children(&self) -> &[VirtualNode] {
        match self {
            Self::Element { children, .. } => children,
            Self::Text(_) => &[],
        }
    }

    /// Appends a child. No-op on text nodes.
    #[must_use]
    pub fn child(mut self, node: VirtualNode) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    /// Sets a property. No-op on text nodes.
    #[must_use]
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        if let Self::Element { props, .. } = &mut self {
            props.insert(key, value);
        }
        self
    }
}

impl From<&str> for VirtualNode {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for VirtualNode {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Shorthand for an element node.
pub fn el(
    tag: impl Into<String>,
    props: Props,
    children: impl IntoIterator<Item = VirtualNode>,
) -> VirtualNode {
    VirtualNode::Element {
        tag: tag.into(),
        props,
        children: children.into_iter().collect(),
    }
}

/// Shorthand for a text node.
pub fn text(value: impl Into<String>) -> VirtualNode {
    VirtualNode::Text(value.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_tree() {
        let node = el(
            "div",
            Props::new().with("width", "100px"),
            [text("hello"), el("span", Props::new(), [text("world")])],
        );

        assert_eq!(node.tag(), Some("div"));
        let VirtualNode::Element { props, children, .. } = &node else {
            panic!("expected element");
        };
        assert_eq!(props.get("width"), Some(&PropValue::from("100px")));
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], text("hello"));
        assert_eq!(children[1].tag(), Some("span"));
        assert_eq!(children[1].children(), &[text("world")]);
    }

    #[test]
    fn test_props_equality_ignores_insertion_order() {
        let a = Props::new().with("a", 1).with("b", true);
        let b = Props::new().with("b", true).with("a", 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_builder_methods() {
        let node = el("ul", Props::new(), [])
            .prop("class", "list")
            .child(text("x"));
        assert_eq!(
            node,
            el("ul", Props::new().with("class", "list"), [text("x")])
        );

        // text nodes ignore element-only builders
        assert_eq!(text("t").prop("k", 1).child(text("c")), text("t"));
    }

    #[test]
    fn test_prop_value_display() {
        assert_eq!(PropValue::from("s").to_string(), "s");
        assert_eq!(PropValue::from(3).to_string(), "3");
        assert_eq!(PropValue::from(false).to_string(), "false");
    }
}
