use alder::patch::PropsPatch;
use alder::reconcile::reconcile;
use alder::renderer::document::Document;
use alder::vdom::{PropValue, Props, VirtualNode};
use proptest::prelude::*;

fn prop_value() -> impl Strategy<Value = PropValue> {
    prop_oneof![
        "[a-z]{0,3}".prop_map(PropValue::Str),
        (-5i64..5).prop_map(PropValue::Int),
        any::<bool>().prop_map(PropValue::Bool),
    ]
}

fn props() -> impl Strategy<Value = Props> {
    prop::collection::btree_map("[a-d]", prop_value(), 0..4)
        .prop_map(|map| map.into_iter().collect())
}

fn tree() -> impl Strategy<Value = VirtualNode> {
    let leaf = "[a-z]{0,4}".prop_map(VirtualNode::Text);
    leaf.prop_recursive(3, 24, 4, |inner| {
        ("[a-c]", props(), prop::collection::vec(inner, 0..4)).prop_map(
            |(tag, props, children)| VirtualNode::Element {
                tag,
                props,
                children,
            },
        )
    })
}

fn under_root(children: Vec<VirtualNode>) -> VirtualNode {
    VirtualNode::Element {
        tag: "root".into(),
        props: Props::new(),
        children,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_props_diff_reaches_new(old in props(), new in props()) {
        let delta = PropsPatch::diff(&old, &new);

        let mut patched = old.clone();
        delta.apply_to(&mut patched);
        prop_assert_eq!(&patched, &new);

        for key in &delta.remove {
            prop_assert!(!new.contains_key(key), "removed key {} is still wanted", key);
        }
        for (key, value) in delta.set.iter() {
            prop_assert!(old.get(key) != Some(value), "unchanged key {} was set", key);
        }
        prop_assert_eq!(delta.is_empty(), old == new);
    }

    #[test]
    fn prop_fresh_render_matches_tree(node in tree()) {
        let mut doc = Document::new();
        let out = reconcile(&mut doc, None, Some(&node)).unwrap();
        let mirror = out.mirror.unwrap();

        prop_assert_eq!(out.patches.len(), 1);
        prop_assert_eq!(mirror.to_virtual(), node.clone());
        prop_assert_eq!(doc.to_virtual(*mirror.target()), Some(node));
        prop_assert_eq!(doc.len(), mirror.len());
    }

    #[test]
    fn prop_rerender_same_tree_is_noop(node in tree()) {
        let mut doc = Document::recording();
        let first = reconcile(&mut doc, None, Some(&node)).unwrap().mirror.unwrap();
        doc.take_history();
        let created = doc.created();

        let again = reconcile(&mut doc, Some(&first), Some(&node)).unwrap();

        prop_assert!(again.patches.is_empty());
        prop_assert!(doc.take_history().is_empty());
        prop_assert_eq!(doc.created(), created);
        prop_assert_eq!(again.mirror, Some(first));
    }

    #[test]
    fn prop_transition_converges(
        before in prop::collection::vec(tree(), 0..4),
        after in prop::collection::vec(tree(), 0..4),
    ) {
        let before = under_root(before);
        let after = under_root(after);
        let mut doc = Document::new();
        let mirror = reconcile(&mut doc, None, Some(&before)).unwrap().mirror.unwrap();
        let root = *mirror.target();

        let out = reconcile(&mut doc, Some(&mirror), Some(&after)).unwrap();
        let updated = out.mirror.unwrap();

        prop_assert!(out.patches.is_empty());
        prop_assert_eq!(*updated.target(), root);
        prop_assert_eq!(updated.to_virtual(), after.clone());
        prop_assert_eq!(doc.to_virtual(root), Some(after));
        prop_assert_eq!(doc.len(), updated.len());
    }
}
