//! # Canonical Output
//!
//! Two serializations of the live document:
//!
//! - **canonical**: what gets persisted and exported. Transient markers are
//!   filtered out, including reserved names that arrived inside loaded markup.
//! - **live**: what the rendering host displays. Markers from the side table
//!   are materialised as classes and attributes, and every element carries
//!   its packed [`NodeId`] so host events can name their targets.

use crate::document::{Document, NodeId, NodeKind};
use crate::transient::{is_editor_attribute, is_reserved_class, TransientState, NODE_ATTRIBUTE};
use mosaic_parser::ast::{Element, Node};
use mosaic_parser::serialize;

/// Clean markup of the root's children
pub fn canonicalize(doc: &Document) -> String {
    let mut nodes: Vec<Node> = doc
        .children(doc.root())
        .iter()
        .filter_map(|&child| doc.to_node(child))
        .collect();

    for node in &mut nodes {
        strip_transient(node);
    }
    serialize(&nodes)
}

/// Clean externally supplied markup the same way a load and export would
pub fn canonicalize_markup(markup: &str) -> String {
    canonicalize(&Document::from_markup(markup))
}

/// Remove reserved classes and editor attributes from a subtree
pub fn strip_transient(node: &mut Node) {
    let Node::Element(element) = node else {
        return;
    };

    element
        .attributes
        .retain(|attr| !is_editor_attribute(&attr.name));

    let class = element.attribute("class").map(|class| {
        let names: Vec<&str> = class.split_whitespace().collect();
        let kept: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| !is_reserved_class(name))
            .collect();
        (kept.join(" "), kept.len() != names.len())
    });
    match class {
        Some((kept, _)) if kept.is_empty() => {
            element.remove_attribute("class");
        }
        Some((kept, true)) => element.set_attribute("class", kept),
        _ => {}
    }

    for child in &mut element.children {
        strip_transient(child);
    }
}

/// Markup for the rendering host, markers included
pub fn live_markup(doc: &Document, transient: &TransientState) -> String {
    let nodes: Vec<Node> = doc
        .children(doc.root())
        .iter()
        .filter_map(|&child| decorated(doc, transient, child))
        .collect();
    serialize(&nodes)
}

fn decorated(doc: &Document, transient: &TransientState, id: NodeId) -> Option<Node> {
    let node = doc.get(id)?;
    let NodeKind::Element { tag, attributes } = &node.kind else {
        return doc.to_node(id);
    };

    let mut element = Element {
        tag: tag.clone(),
        attributes: attributes.clone(),
        children: node
            .children()
            .iter()
            .filter_map(|&child| decorated(doc, transient, child))
            .collect(),
    };

    let mut classes: Vec<String> = element
        .attribute("class")
        .unwrap_or("")
        .split_whitespace()
        .map(str::to_string)
        .collect();

    for marker in transient.get(id).iter() {
        if let Some(class) = marker.class_name() {
            if !classes.iter().any(|existing| existing == class) {
                classes.push(class.to_string());
            }
        }
        if let Some((name, value)) = marker.attribute() {
            element.set_attribute(name, value);
        }
    }

    if !classes.is_empty() {
        element.set_attribute("class", classes.join(" "));
    }
    element.set_attribute(NODE_ATTRIBUTE, id.to_bits().to_string());

    Some(Node::Element(element))
}
