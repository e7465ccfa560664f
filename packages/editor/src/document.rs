//! # Live Document
//!
//! The mutable tree the rendering host displays and the editor manipulates.
//!
//! Nodes live in an arena and are addressed by a generational [`NodeId`].
//! Freeing a node bumps its slot generation, so ids held by the host or by
//! the mirror tree go stale instead of silently pointing at a new node.
//!
//! ## Ownership
//!
//! ```text
//! root (body) ──children──▶ [NodeId, NodeId, ...]
//!      ▲                          │
//!      └──────── parent ──────────┘
//! ```
//!
//! A parent owns its ordered children; `parent` is only a navigational index.
//! Identifier, classes and inline style are read from the ordered attribute
//! list so attribute order survives a load/serialize cycle.

use crate::mutations::MutationError;
use mosaic_parser::ast::{is_void_element, Attribute, Element, Node};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag of the document root
pub const ROOT_TAG: &str = "body";

/// Bits of a slot generation kept in [`NodeId::to_bits`]. With a 32-bit
/// index the packed id stays below 2^53, so it survives a trip through a
/// JavaScript number. Generations wrap within this range.
pub const GENERATION_BITS: u32 = 21;

const GENERATION_MASK: u32 = (1 << GENERATION_BITS) - 1;

/// Generational handle to a node in a [`Document`]. Serializes as the
/// packed `u64` from [`NodeId::to_bits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u64", from = "u64")]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }

    /// Pack into a single integer for hosts that cannot hold structs
    pub fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    pub fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32 & GENERATION_MASK,
        }
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.to_bits()
    }
}

impl From<u64> for NodeId {
    fn from(bits: u64) -> Self {
        NodeId::from_bits(bits)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct DocumentNode {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl DocumentNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn attributes(&self) -> &[Attribute] {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Non-empty `id` attribute
    pub fn identifier(&self) -> Option<&str> {
        self.attribute("id").filter(|id| !id.is_empty())
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or("").split_whitespace()
    }

    pub fn inline_style(&self) -> &str {
        self.attribute("style").unwrap_or("")
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<DocumentNode>,
}

#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    /// Increments on every change to the tree
    version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document holding only the root
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            version: 0,
        };
        doc.root = doc.alloc(DocumentNode::new(root_kind()));
        doc
    }

    pub fn from_markup(markup: &str) -> Self {
        let mut doc = Self::new();
        doc.load_markup(markup);
        doc
    }

    /// Replace the whole tree with parsed markup. Every previously issued
    /// [`NodeId`] becomes stale.
    pub fn load_markup(&mut self, markup: &str) {
        let fragment = mosaic_parser::parse(markup).into_body_content();

        self.free_subtree(self.root);
        self.root = self.alloc(DocumentNode::new(root_kind()));

        for node in &fragment.nodes {
            let child = self.instantiate(node);
            self.link(self.root, usize::MAX, child);
        }
        self.version += 1;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&DocumentNode> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut DocumentNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn node(&self, id: NodeId) -> Result<&DocumentNode, MutationError> {
        self.get(id).ok_or(MutationError::NodeNotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).map(DocumentNode::is_element).unwrap_or(false)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(DocumentNode::tag)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(DocumentNode::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(DocumentNode::children).unwrap_or(&[])
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.is_element(child))
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id).and_then(|node| node.attribute(name))
    }

    /// True when `node` is `ancestor` or lies somewhere beneath it
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// `id` and everything beneath it, in document order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|node| self.get(node).and_then(DocumentNode::text))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Attribute edits
    // ---------------------------------------------------------------------

    fn attributes_mut(&mut self, id: NodeId) -> Result<&mut Vec<Attribute>, MutationError> {
        match self.get_mut(id) {
            Some(DocumentNode {
                kind: NodeKind::Element { attributes, .. },
                ..
            }) => Ok(attributes),
            Some(_) => Err(MutationError::NotAnElement(id)),
            None => Err(MutationError::NodeNotFound(id)),
        }
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), MutationError> {
        let attributes = self.attributes_mut(id)?;
        match attributes.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => attributes.push(Attribute::new(name, value)),
        }
        self.version += 1;
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>, MutationError> {
        let attributes = self.attributes_mut(id)?;
        let removed = attributes
            .iter()
            .position(|attr| attr.name == name)
            .map(|pos| attributes.remove(pos).value);
        if removed.is_some() {
            self.version += 1;
        }
        Ok(removed)
    }

    // ---------------------------------------------------------------------
    // Structural edits
    // ---------------------------------------------------------------------

    /// Build a detached subtree from a parsed node
    pub fn instantiate(&mut self, node: &Node) -> NodeId {
        match node {
            Node::Element(element) => {
                let id = self.alloc(DocumentNode::new(NodeKind::Element {
                    tag: element.tag.clone(),
                    attributes: element.attributes.clone(),
                }));
                for child in &element.children {
                    let child_id = self.instantiate(child);
                    self.link(id, usize::MAX, child_id);
                }
                id
            }
            Node::Text { content } => self.alloc(DocumentNode::new(NodeKind::Text(content.clone()))),
            Node::Comment { content } => {
                self.alloc(DocumentNode::new(NodeKind::Comment(content.clone())))
            }
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), MutationError> {
        self.check_container(parent)?;
        self.check_movable(child, parent)?;

        self.detach(child);
        self.link(parent, usize::MAX, child);
        self.version += 1;
        Ok(())
    }

    pub fn insert_before(&mut self, reference: NodeId, child: NodeId) -> Result<(), MutationError> {
        self.insert_beside(reference, child, 0)
    }

    pub fn insert_after(&mut self, reference: NodeId, child: NodeId) -> Result<(), MutationError> {
        self.insert_beside(reference, child, 1)
    }

    fn insert_beside(&mut self, reference: NodeId, child: NodeId, offset: usize) -> Result<(), MutationError> {
        let parent = self
            .node(reference)?
            .parent
            .ok_or(MutationError::RootImmutable)?;
        self.check_movable(child, reference)?;

        self.detach(child);
        let pos = self
            .children(parent)
            .iter()
            .position(|&sibling| sibling == reference)
            .ok_or(MutationError::ParentNotFound(parent))?;
        self.link(parent, pos + offset, child);
        self.version += 1;
        Ok(())
    }

    /// Remove a node and free its subtree
    pub fn remove(&mut self, id: NodeId) -> Result<(), MutationError> {
        self.node(id)?;
        if id == self.root {
            return Err(MutationError::RootImmutable);
        }

        self.detach(id);
        self.free_subtree(id);
        self.version += 1;
        Ok(())
    }

    /// Replace every child of an element with freshly built nodes
    pub fn replace_children(&mut self, id: NodeId, nodes: &[Node]) -> Result<Vec<NodeId>, MutationError> {
        self.check_container(id)?;

        let old = self
            .get_mut(id)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        for child in old {
            self.free_subtree(child);
        }

        let mut created = Vec::with_capacity(nodes.len());
        for node in nodes {
            let child = self.instantiate(node);
            self.link(id, usize::MAX, child);
            created.push(child);
        }
        self.version += 1;
        Ok(created)
    }

    /// Replace an element's children with a single text node
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), MutationError> {
        let nodes = if text.is_empty() {
            vec![]
        } else {
            vec![Node::text(text)]
        };
        self.replace_children(id, &nodes).map(|_| ())
    }

    // ---------------------------------------------------------------------
    // Snapshots
    // ---------------------------------------------------------------------

    /// Owned copy of a subtree as parser nodes
    pub fn to_node(&self, id: NodeId) -> Option<Node> {
        let node = self.get(id)?;
        Some(match &node.kind {
            NodeKind::Element { tag, attributes } => Node::Element(Element {
                tag: tag.clone(),
                attributes: attributes.clone(),
                children: node
                    .children
                    .iter()
                    .filter_map(|&child| self.to_node(child))
                    .collect(),
            }),
            NodeKind::Text(text) => Node::text(text.clone()),
            NodeKind::Comment(text) => Node::comment(text.clone()),
        })
    }

    // ---------------------------------------------------------------------
    // Arena internals
    // ---------------------------------------------------------------------

    fn check_container(&self, id: NodeId) -> Result<(), MutationError> {
        match self.node(id)?.tag() {
            Some(tag) if is_void_element(tag) => Err(MutationError::InvalidStructure(format!(
                "<{}> cannot have children",
                tag
            ))),
            Some(_) => Ok(()),
            None => Err(MutationError::NotAnElement(id)),
        }
    }

    /// `child` may be placed relative to `target` without creating a cycle
    fn check_movable(&self, child: NodeId, target: NodeId) -> Result<(), MutationError> {
        self.node(child)?;
        if child == self.root {
            return Err(MutationError::RootImmutable);
        }
        if self.is_ancestor_or_self(child, target) {
            return Err(MutationError::CycleDetected);
        }
        Ok(())
    }

    fn alloc(&mut self, node: DocumentNode) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    fn link(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if let Some(node) = self.get_mut(parent) {
            let index = index.min(node.children.len());
            node.children.insert(index, child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|&child| child != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        for node in self.descendants(id) {
            if let Some(slot) = self.slots.get_mut(node.index as usize) {
                slot.node = None;
                slot.generation = slot.generation.wrapping_add(1) & GENERATION_MASK;
                self.free.push(node.index);
            }
        }
    }
}

fn root_kind() -> NodeKind {
    NodeKind::Element {
        tag: ROOT_TAG.to_string(),
        attributes: Vec::new(),
    }
}
