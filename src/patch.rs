//! Patch vocabulary.
//!
//! A [`Patch`] describes exactly one mutation on one target. Patches are
//! transient: the reconciler hands them to the renderer, or bubbles them to
//! the parent frame when the mutation concerns how a node is attached.

use std::collections::BTreeSet;

use crate::vdom::Props;

#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    /// Update the target's properties.
    Props(PropsPatch),

    /// Replace the text of a text target.
    Text(String),

    /// Insert `child` before `reference`, or append when `reference` is `None`.
    InsertChild { child: T, reference: Option<T> },

    /// Detach `child` from the target.
    RemoveChild { child: T },
}

impl<T> Patch<T> {
    /// Short name of the patch kind, used in logs and adapter errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Props(_) => "props",
            Self::Text(_) => "text",
            Self::InsertChild { .. } => "insert-child",
            Self::RemoveChild { .. } => "remove-child",
        }
    }
}

/// Property delta between two [`Props`] maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropsPatch {
    /// Properties to add or overwrite.
    pub set: Props,
    /// Keys to delete.
    pub remove: BTreeSet<String>,
}

impl PropsPatch {
    /// Computes the delta turning `old` into `new`.
    ///
    /// Keys only in `old` are removed; keys that are new, or whose value
    /// differs, are set. Unchanged keys appear in neither.
    #[must_use]
    pub fn diff(old: &Props, new: &Props) -> Self {
        let remove = old
            .keys()
            .filter(|k| !new.contains_key(k))
            .map(str::to_owned)
            .collect();
        let set = new
            .iter()
            .filter(|(k, v)| old.get(k) != Some(*v))
            .map(|(k, v)| (k, v.clone()))
            .collect();

        Self { set, remove }
    }

    /// Applies the delta to a property map in place.
    pub fn apply_to(&self, props: &mut Props) {
        for key in &self.remove {
            props.remove(key);
        }
        for (key, value) in self.set.iter() {
            props.insert(key, value.clone());
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.remove.is_empty()
    }
}
