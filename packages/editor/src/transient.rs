//! # Transient Markers
//!
//! Editor-only decoration (selection, hover, drop indicators, inline-edit and
//! drag flags) kept in a side table keyed by [`NodeId`] instead of being
//! written into the document's attributes.
//!
//! Markers only become classes/attributes in the live markup handed to the
//! rendering host. Canonical output never sees them, and it additionally
//! filters the reserved names so markup that arrived already decorated is
//! cleaned as well.

use crate::document::NodeId;
use std::collections::HashMap;

/// Class names the editor reserves for its own decoration
pub const RESERVED_CLASSES: &[&str] = &[
    "wysiwyg-selected",
    "wysiwyg-hover",
    "drop-before",
    "drop-after",
    "drop-inside",
    "drop-left",
    "drop-right",
    "drop-active",
];

/// Live-markup attribute carrying an element's packed [`NodeId`], so the
/// host can address the nodes it renders
pub const NODE_ATTRIBUTE: &str = "data-mosaic-node";

/// Attributes the editor toggles on live nodes
pub const EDITOR_ATTRIBUTES: &[&str] = &["contenteditable", "draggable", NODE_ATTRIBUTE];

pub fn is_reserved_class(name: &str) -> bool {
    RESERVED_CLASSES.contains(&name)
}

pub fn is_editor_attribute(name: &str) -> bool {
    EDITOR_ATTRIBUTES.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Selected,
    Hover,
    DropBefore,
    DropAfter,
    DropInside,
    /// Root highlight while the pointer is over the background
    DropActive,
    /// Inline text editing (`contenteditable`)
    Editing,
    /// Host may start a drag from this node (`draggable`)
    DragEnabled,
}

impl Marker {
    pub const ALL: [Marker; 8] = [
        Marker::Selected,
        Marker::Hover,
        Marker::DropBefore,
        Marker::DropAfter,
        Marker::DropInside,
        Marker::DropActive,
        Marker::Editing,
        Marker::DragEnabled,
    ];

    /// Drop indicators, at most one node carries any of these
    pub const DROP_INDICATORS: [Marker; 4] = [
        Marker::DropBefore,
        Marker::DropAfter,
        Marker::DropInside,
        Marker::DropActive,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }

    pub fn class_name(self) -> Option<&'static str> {
        match self {
            Marker::Selected => Some("wysiwyg-selected"),
            Marker::Hover => Some("wysiwyg-hover"),
            Marker::DropBefore => Some("drop-before"),
            Marker::DropAfter => Some("drop-after"),
            Marker::DropInside => Some("drop-inside"),
            Marker::DropActive => Some("drop-active"),
            Marker::Editing | Marker::DragEnabled => None,
        }
    }

    /// Attribute and value this marker materialises as
    pub fn attribute(self) -> Option<(&'static str, &'static str)> {
        match self {
            Marker::Editing => Some(("contenteditable", "true")),
            Marker::DragEnabled => Some(("draggable", "true")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerSet(u16);

impl MarkerSet {
    pub fn contains(self, marker: Marker) -> bool {
        self.0 & marker.bit() != 0
    }

    pub fn insert(&mut self, marker: Marker) {
        self.0 |= marker.bit();
    }

    pub fn remove(&mut self, marker: Marker) {
        self.0 &= !marker.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Marker> {
        Marker::ALL.into_iter().filter(move |&m| self.contains(m))
    }
}

#[derive(Debug, Default)]
pub struct TransientState {
    markers: HashMap<NodeId, MarkerSet>,
}

impl TransientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> MarkerSet {
        self.markers.get(&id).copied().unwrap_or_default()
    }

    pub fn has(&self, id: NodeId, marker: Marker) -> bool {
        self.get(id).contains(marker)
    }

    pub fn set(&mut self, id: NodeId, marker: Marker) {
        self.markers.entry(id).or_default().insert(marker);
    }

    pub fn unset(&mut self, id: NodeId, marker: Marker) {
        if let Some(set) = self.markers.get_mut(&id) {
            set.remove(marker);
            if set.is_empty() {
                self.markers.remove(&id);
            }
        }
    }

    /// Remove `marker` from every node
    pub fn clear(&mut self, marker: Marker) {
        self.markers.retain(|_, set| {
            set.remove(marker);
            !set.is_empty()
        });
    }

    /// Nodes currently carrying `marker`
    pub fn nodes_with(&self, marker: Marker) -> Vec<NodeId> {
        let mut nodes: Vec<_> = self
            .markers
            .iter()
            .filter(|(_, set)| set.contains(marker))
            .map(|(&id, _)| id)
            .collect();
        nodes.sort();
        nodes
    }

    pub fn clear_drop_indicators(&mut self) {
        for marker in Marker::DROP_INDICATORS {
            self.clear(marker);
        }
    }

    /// Forget everything about a node that no longer exists
    pub fn forget(&mut self, id: NodeId) {
        self.markers.remove(&id);
    }

    /// Drop entries whose node fails `alive`
    pub fn retain_live(&mut self, alive: impl Fn(NodeId) -> bool) {
        self.markers.retain(|&id, _| alive(id));
    }

    pub fn reset(&mut self) {
        self.markers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
