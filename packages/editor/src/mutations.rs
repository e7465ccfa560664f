//! # Document Mutations
//!
//! Every structural and property edit the editor makes goes through
//! [`Mutation`], so each one is validated before anything is touched.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation is one user-level operation
//! 2. **Validated**: a rejected mutation leaves the document untouched
//! 3. **Serializable**: mutations can be logged or sent across a host boundary
//!
//! ## Mutation Semantics
//!
//! ### MoveNode / InsertMarkup
//! - Place relative to a target element: before, after, or as its last child
//! - Fails if the node would end up inside itself
//! - `InsertMarkup` builds its node from the first root element of the markup
//! - Fails if the parser would close the new parent on reparse (`<li>` directly
//!   inside `<li>`, `<tr>` inside `<td>`), since the saved markup would not
//!   reload as the same tree
//!
//! ### SetText / ReplaceContent
//! - Atomic replacement of an element's children (text or parsed markup)
//!
//! ### SetAttribute / SetStyle
//! - An empty value removes the attribute or style property
//! - Attribute names are lowercased and must lex as a single attribute name

use crate::document::{Document, NodeId};
use crate::placement::DropMode;
use crate::style::apply_style_property;
use crate::transient::is_editor_attribute;
use mosaic_parser::ast::is_void_element;
use mosaic_parser::{closes_implicitly, is_attribute_name, parse, parse_element, ParseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Mutation {
    /// Move an existing node relative to a target element
    MoveNode {
        node: NodeId,
        target: NodeId,
        mode: DropMode,
    },

    /// Insert a copy of the first root element of `markup`
    InsertMarkup {
        markup: String,
        target: NodeId,
        mode: DropMode,
    },

    /// Remove a node and everything beneath it
    RemoveNode { node: NodeId },

    /// Replace an element's children with plain text
    SetText { node: NodeId, text: String },

    /// Replace an element's children with parsed markup
    ReplaceContent { node: NodeId, markup: String },

    SetAttribute {
        node: NodeId,
        name: String,
        value: String,
    },

    /// Set one inline style property (camelCase or kebab-case name)
    SetStyle {
        node: NodeId,
        property: String,
        value: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Parent not found: {0}")]
    ParentNotFound(NodeId),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Node is not an element: {0}")]
    NotAnElement(NodeId),

    #[error("The document root cannot be moved or removed")]
    RootImmutable,

    #[error("<{child}> inside <{parent}> would not survive a reload")]
    UnstableNesting { parent: String, child: String },

    #[error("Attribute is reserved for the editor: {0}")]
    ReservedAttribute(String),

    #[error("Invalid markup: {0}")]
    InvalidMarkup(#[from] ParseError),
}

/// Result of applying a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationResult {
    /// Document version after the mutation
    pub version: u64,

    /// Node the mutation placed or edited; `None` after a removal
    pub node: Option<NodeId>,
}

impl Mutation {
    /// Apply mutation to the document with validation
    pub fn apply(&self, doc: &mut Document) -> Result<MutationResult, MutationError> {
        self.validate(doc)?;

        let node = match self {
            Mutation::MoveNode { node, target, mode } => {
                place(doc, *node, *target, *mode)?;
                Some(*node)
            }

            Mutation::InsertMarkup {
                markup,
                target,
                mode,
            } => {
                let element = parse_element(markup)?;
                let node = doc.instantiate(&element.into());
                if let Err(e) = place(doc, node, *target, *mode) {
                    doc.remove(node)?;
                    return Err(e);
                }
                Some(node)
            }

            Mutation::RemoveNode { node } => {
                doc.remove(*node)?;
                None
            }

            Mutation::SetText { node, text } => {
                doc.set_text(*node, text)?;
                Some(*node)
            }

            Mutation::ReplaceContent { node, markup } => {
                let fragment = parse(markup);
                doc.replace_children(*node, &fragment.nodes)?;
                Some(*node)
            }

            Mutation::SetAttribute { node, name, value } => {
                let name = name.to_ascii_lowercase();
                if value.is_empty() {
                    doc.remove_attribute(*node, &name)?;
                } else {
                    doc.set_attribute(*node, &name, value)?;
                }
                Some(*node)
            }

            Mutation::SetStyle {
                node,
                property,
                value,
            } => {
                let current = doc.attribute(*node, "style").unwrap_or("");
                let style = apply_style_property(current, property, value);
                if style.is_empty() {
                    doc.remove_attribute(*node, "style")?;
                } else {
                    doc.set_attribute(*node, "style", &style)?;
                }
                Some(*node)
            }
        };

        debug!(mutation = self.name(), version = doc.version(), "Applied mutation");
        Ok(MutationResult {
            version: doc.version(),
            node,
        })
    }

    /// Validate without applying
    pub fn validate(&self, doc: &Document) -> Result<(), MutationError> {
        match self {
            Mutation::MoveNode { node, target, mode } => {
                if !doc.contains(*node) {
                    return Err(MutationError::NodeNotFound(*node));
                }
                if *node == doc.root() {
                    return Err(MutationError::RootImmutable);
                }
                validate_target(doc, *target, *mode)?;

                if doc.is_ancestor_or_self(*node, *target) {
                    return Err(MutationError::CycleDetected);
                }
                match doc.tag(*node) {
                    Some(tag) => validate_nesting(doc, *target, *mode, tag),
                    None => Ok(()),
                }
            }

            Mutation::InsertMarkup {
                markup,
                target,
                mode,
            } => {
                validate_target(doc, *target, *mode)?;
                let element = parse_element(markup)?;
                validate_nesting(doc, *target, *mode, &element.tag)
            }

            Mutation::RemoveNode { node } => {
                if !doc.contains(*node) {
                    return Err(MutationError::NodeNotFound(*node));
                }
                if *node == doc.root() {
                    return Err(MutationError::RootImmutable);
                }
                Ok(())
            }

            Mutation::SetText { node, .. } | Mutation::ReplaceContent { node, .. } => {
                validate_container(doc, *node)
            }

            Mutation::SetAttribute { node, name, .. } => {
                validate_element(doc, *node)?;
                if !is_attribute_name(name) {
                    return Err(MutationError::InvalidStructure(format!(
                        "invalid attribute name {:?}",
                        name
                    )));
                }
                let name = name.to_ascii_lowercase();
                if is_editor_attribute(&name) {
                    return Err(MutationError::ReservedAttribute(name));
                }
                Ok(())
            }

            Mutation::SetStyle { node, property, .. } => {
                validate_element(doc, *node)?;
                if property.is_empty()
                    || property
                        .chars()
                        .any(|c| c.is_whitespace() || matches!(c, ':' | ';' | '"'))
                {
                    return Err(MutationError::InvalidStructure(format!(
                        "invalid style property {:?}",
                        property
                    )));
                }
                Ok(())
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::MoveNode { .. } => "MoveNode",
            Mutation::InsertMarkup { .. } => "InsertMarkup",
            Mutation::RemoveNode { .. } => "RemoveNode",
            Mutation::SetText { .. } => "SetText",
            Mutation::ReplaceContent { .. } => "ReplaceContent",
            Mutation::SetAttribute { .. } => "SetAttribute",
            Mutation::SetStyle { .. } => "SetStyle",
        }
    }

    /// Whether the mutation changes tree shape (as opposed to properties)
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Mutation::SetAttribute { .. } | Mutation::SetStyle { .. }
        )
    }
}

fn place(doc: &mut Document, node: NodeId, target: NodeId, mode: DropMode) -> Result<(), MutationError> {
    match mode {
        DropMode::Before => doc.insert_before(target, node),
        DropMode::After => doc.insert_after(target, node),
        DropMode::Inside => doc.append_child(target, node),
    }
}

fn validate_element(doc: &Document, node: NodeId) -> Result<(), MutationError> {
    match doc.get(node) {
        Some(n) if n.is_element() => Ok(()),
        Some(_) => Err(MutationError::NotAnElement(node)),
        None => Err(MutationError::NodeNotFound(node)),
    }
}

fn validate_container(doc: &Document, node: NodeId) -> Result<(), MutationError> {
    validate_element(doc, node)?;
    match doc.tag(node) {
        Some(tag) if is_void_element(tag) => Err(MutationError::InvalidStructure(format!(
            "<{}> cannot have children",
            tag
        ))),
        _ => Ok(()),
    }
}

fn validate_target(doc: &Document, target: NodeId, mode: DropMode) -> Result<(), MutationError> {
    match mode {
        DropMode::Inside => validate_container(doc, target),
        DropMode::Before | DropMode::After => {
            validate_element(doc, target)?;
            if target == doc.root() {
                return Err(MutationError::RootImmutable);
            }
            Ok(())
        }
    }
}

/// The element a node placed at (`target`, `mode`) ends up inside
fn new_parent(doc: &Document, target: NodeId, mode: DropMode) -> Option<NodeId> {
    match mode {
        DropMode::Inside => Some(target),
        DropMode::Before | DropMode::After => doc.parent(target),
    }
}

fn validate_nesting(doc: &Document, target: NodeId, mode: DropMode, child: &str) -> Result<(), MutationError> {
    let parent = new_parent(doc, target, mode).and_then(|id| doc.tag(id));
    match parent {
        Some(parent) if closes_implicitly(parent, child) => Err(MutationError::UnstableNesting {
            parent: parent.to_string(),
            child: child.to_string(),
        }),
        _ => Ok(()),
    }
}
