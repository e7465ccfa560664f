//! Tests for chains of mutations and document integrity afterwards
//!
//! This tests:
//! - Move + insert + delete chains
//! - Rejected mutations in the middle of a chain
//! - Canonical output stability after edits
//! - Moved trees reloading as the same tree

use mosaic_editor::{
    canonicalize, canonicalize_markup, parse_style, place, serialize_style, DragSource, Document,
    DropMode, EditorConfig, Mutation, MutationError, NodeId, StyleMap, TransientState,
};

fn children(doc: &Document, id: NodeId) -> Vec<NodeId> {
    doc.children(id).to_vec()
}

/// Every child's parent link points back at its parent and no node is reachable twice
fn assert_tree_consistent(doc: &Document) {
    let all = doc.descendants(doc.root());
    let mut seen = std::collections::HashSet::new();
    for id in &all {
        assert!(seen.insert(*id), "{} reachable twice", id);
        for &child in doc.children(*id) {
            assert_eq!(doc.parent(child), Some(*id));
        }
    }
    assert_eq!(all.len(), doc.len());
}

#[test]
fn test_move_then_delete_sequence() {
    let mut doc = Document::from_markup("<div><p>Child 1</p></div><div><p>Child 2</p></div>");
    let [first, second] = <[NodeId; 2]>::try_from(children(&doc, doc.root())).unwrap();

    Mutation::MoveNode {
        node: second,
        target: first,
        mode: DropMode::Inside,
    }
    .apply(&mut doc)
    .unwrap();
    assert_eq!(doc.parent(second), Some(first));
    assert_tree_consistent(&doc);

    Mutation::RemoveNode { node: first }.apply(&mut doc).unwrap();
    assert!(!doc.contains(second));
    assert!(doc.is_empty());
    assert_tree_consistent(&doc);
}

#[test]
fn test_rejected_mutation_mid_chain_changes_nothing() {
    let mut doc = Document::from_markup("<section><div><p>x</p></div></section><hr>");
    let [section, hr] = <[NodeId; 2]>::try_from(children(&doc, doc.root())).unwrap();
    let div = children(&doc, section)[0];

    let inserted = Mutation::InsertMarkup {
        markup: "<p>new</p>".to_string(),
        target: div,
        mode: DropMode::Inside,
    }
    .apply(&mut doc)
    .unwrap()
    .node
    .unwrap();

    let snapshot = canonicalize(&doc);
    let version = doc.version();

    let rejected = [
        Mutation::MoveNode {
            node: section,
            target: inserted,
            mode: DropMode::After,
        },
        Mutation::MoveNode {
            node: div,
            target: hr,
            mode: DropMode::Inside,
        },
        Mutation::RemoveNode { node: doc.root() },
        Mutation::MoveNode {
            node: hr,
            target: doc.root(),
            mode: DropMode::After,
        },
    ];
    let errors: Vec<_> = rejected
        .iter()
        .map(|mutation| mutation.apply(&mut doc).unwrap_err())
        .collect();

    assert_eq!(errors[0], MutationError::CycleDetected);
    assert!(matches!(errors[1], MutationError::InvalidStructure(_)));
    assert_eq!(errors[2], MutationError::RootImmutable);
    assert_eq!(errors[3], MutationError::RootImmutable);

    assert_eq!(canonicalize(&doc), snapshot);
    assert_eq!(doc.version(), version);
    assert_tree_consistent(&doc);
}

#[test]
fn test_move_before_places_once() {
    let mut doc = Document::from_markup("<p>1</p><p>2</p><p>3</p><p>4</p>");
    let ids = children(&doc, doc.root());

    Mutation::MoveNode {
        node: ids[3],
        target: ids[1],
        mode: DropMode::Before,
    }
    .apply(&mut doc)
    .unwrap();

    assert_eq!(canonicalize(&doc), "<p>1</p><p>4</p><p>2</p><p>3</p>");
    assert_tree_consistent(&doc);
}

#[test]
fn test_property_edits_then_canonical_is_stable() {
    let mut doc = Document::from_markup(r#"<td class="cell">x</td>"#);
    let td = children(&doc, doc.root())[0];

    let edits = [
        Mutation::SetAttribute {
            node: td,
            name: "colspan".to_string(),
            value: "2".to_string(),
        },
        Mutation::SetStyle {
            node: td,
            property: "backgroundColor".to_string(),
            value: "#fff".to_string(),
        },
        Mutation::SetStyle {
            node: td,
            property: "padding-top".to_string(),
            value: "4px".to_string(),
        },
        Mutation::SetText {
            node: td,
            text: "a < b".to_string(),
        },
    ];
    for edit in &edits {
        edit.apply(&mut doc).unwrap();
    }

    let out = canonicalize(&doc);
    assert_eq!(
        out,
        r#"<td class="cell" colspan="2" style="background-color: #fff; padding-top: 4px">a &lt; b</td>"#
    );
    assert_eq!(canonicalize_markup(&out), out);
}

#[test]
fn test_style_roundtrip_for_non_empty_maps() {
    let maps: Vec<StyleMap> = vec![
        [("color", "red")].into_iter().collect(),
        [("marginTop", "10px"), ("fontFamily", "Arial, sans-serif"), ("--brand", "#7c3aed")]
            .into_iter()
            .collect(),
        [("backgroundImage", "url(a.png)"), ("border", "1px solid #ddd")]
            .into_iter()
            .collect(),
        StyleMap::new(),
    ];

    for map in maps {
        assert_eq!(parse_style(&serialize_style(&map)), map);
    }
}

#[test]
fn test_many_inserts_and_removes_reuse_slots() {
    let mut doc = Document::new();
    let mut live = Vec::new();

    for round in 0..20 {
        let node = Mutation::InsertMarkup {
            markup: format!("<p>{}</p>", round),
            target: doc.root(),
            mode: DropMode::Inside,
        }
        .apply(&mut doc)
        .unwrap()
        .node
        .unwrap();
        live.push(node);

        if round % 3 == 2 {
            let victim = live.remove(0);
            Mutation::RemoveNode { node: victim }.apply(&mut doc).unwrap();
            assert!(!doc.contains(victim));
        }
    }

    assert_eq!(children(&doc, doc.root()), live);
    assert_tree_consistent(&doc);
}

#[test]
fn test_mutations_replayed_from_json() -> anyhow::Result<()> {
    let mut doc = Document::from_markup("<td>x</td>");
    let td = children(&doc, doc.root())[0];

    let json = format!(
        r#"[
            {{"type": "SetAttribute", "node": {id}, "name": "align", "value": "center"}},
            {{"type": "SetStyle", "node": {id}, "property": "color", "value": "red"}},
            {{"type": "SetText", "node": {id}, "text": "done"}}
        ]"#,
        id = td.to_bits()
    );
    let mutations: Vec<Mutation> = serde_json::from_str(&json)?;
    for mutation in &mutations {
        mutation.apply(&mut doc)?;
    }

    assert_eq!(
        canonicalize(&doc),
        r#"<td align="center" style="color: red">done</td>"#
    );
    Ok(())
}

const NESTED: &str = "<ul><li>a</li><li>b</li></ul><table><tr><td>c</td></tr></table><div><p>d</p></div>";

#[test]
fn test_every_placement_reloads_unchanged() {
    let config = EditorConfig::default();
    let base = Document::from_markup(NESTED);
    let elements: Vec<NodeId> = base
        .descendants(base.root())
        .into_iter()
        .filter(|&id| id != base.root() && base.is_element(id))
        .collect();

    for &node in &elements {
        for &target in &elements {
            for mode in [DropMode::Before, DropMode::After, DropMode::Inside] {
                let mut doc = Document::from_markup(NESTED);
                let mut transient = TransientState::new();
                let source = DragSource::Node(node);

                if place(&mut doc, &mut transient, &config, &source, target, mode).is_err() {
                    assert_eq!(canonicalize(&doc), canonicalize(&base));
                    continue;
                }

                let out = canonicalize(&doc);
                assert_eq!(
                    canonicalize_markup(&out),
                    out,
                    "{} {:?} {} does not reload",
                    node,
                    mode,
                    target
                );
                assert_tree_consistent(&doc);
            }
        }
    }
}

#[test]
fn test_nesting_the_parser_would_undo_is_rejected() {
    let mut doc = Document::from_markup(NESTED);
    let [ul, table, _] = <[NodeId; 3]>::try_from(children(&doc, doc.root())).unwrap();
    let [li1, li2] = <[NodeId; 2]>::try_from(children(&doc, ul)).unwrap();
    let tr = children(&doc, table)[0];
    let td = children(&doc, tr)[0];
    let before = canonicalize(&doc);

    let err = Mutation::MoveNode {
        node: li2,
        target: li1,
        mode: DropMode::Inside,
    }
    .apply(&mut doc)
    .unwrap_err();
    assert_eq!(
        err,
        MutationError::UnstableNesting {
            parent: "li".to_string(),
            child: "li".to_string(),
        }
    );

    let err = Mutation::InsertMarkup {
        markup: "<tr><td>x</td></tr>".to_string(),
        target: td,
        mode: DropMode::After,
    }
    .apply(&mut doc)
    .unwrap_err();
    assert!(matches!(err, MutationError::UnstableNesting { .. }));

    assert_eq!(canonicalize(&doc), before);
    assert_tree_consistent(&doc);
}

#[test]
fn test_drop_into_list_item_lands_after_it() {
    let mut doc = Document::from_markup("<ul><li>a</li><li>b</li></ul>");
    let ul = children(&doc, doc.root())[0];
    let [li1, li2] = <[NodeId; 2]>::try_from(children(&doc, ul)).unwrap();

    place(
        &mut doc,
        &mut TransientState::new(),
        &EditorConfig::default(),
        &DragSource::Node(li2),
        li1,
        DropMode::Inside,
    )
    .unwrap();

    assert_eq!(canonicalize(&doc), "<ul><li>a</li><li>b</li></ul>");
    assert_eq!(doc.parent(li2), Some(ul));
}

#[test]
fn test_attribute_names_that_break_markup_are_rejected() {
    let mut doc = Document::from_markup(r#"<td colspan="1">x</td>"#);
    let td = children(&doc, doc.root())[0];

    for name in ["a\"b", "data-x>", "x/y", "<p", "it's", "a b", ""] {
        let result = Mutation::SetAttribute {
            node: td,
            name: name.to_string(),
            value: "2".to_string(),
        }
        .apply(&mut doc);
        assert!(
            matches!(result, Err(MutationError::InvalidStructure(_))),
            "{:?} accepted",
            name
        );
    }
    assert_eq!(canonicalize(&doc), r#"<td colspan="1">x</td>"#);
}

#[test]
fn test_attribute_names_are_lowercased() {
    let mut doc = Document::from_markup(r#"<td colspan="1">x</td>"#);
    let td = children(&doc, doc.root())[0];

    Mutation::SetAttribute {
        node: td,
        name: "COLSPAN".to_string(),
        value: "2".to_string(),
    }
    .apply(&mut doc)
    .unwrap();
    assert_eq!(canonicalize(&doc), r#"<td colspan="2">x</td>"#);

    let reserved = Mutation::SetAttribute {
        node: td,
        name: "ContentEditable".to_string(),
        value: "true".to_string(),
    }
    .apply(&mut doc);
    assert_eq!(
        reserved,
        Err(MutationError::ReservedAttribute("contenteditable".to_string()))
    );
}

#[test]
fn test_style_property_names_that_break_the_rule_are_rejected() {
    let mut doc = Document::from_markup(r#"<p style="color: red">x</p>"#);
    let p = children(&doc, doc.root())[0];

    for property in ["color: blue; x", "a;b", "", "font size"] {
        let result = Mutation::SetStyle {
            node: p,
            property: property.to_string(),
            value: "1px".to_string(),
        }
        .apply(&mut doc);
        assert!(
            matches!(result, Err(MutationError::InvalidStructure(_))),
            "{:?} accepted",
            property
        );
    }
    assert_eq!(canonicalize(&doc), r#"<p style="color: red">x</p>"#);
}
