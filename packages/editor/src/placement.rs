//! # Placement Engine
//!
//! Turns drag gestures into `MoveNode` / `InsertMarkup` mutations.
//!
//! ## Drop Mode
//!
//! ```text
//!  ┌──────────────────────┐  r < before   → Before
//!  │      before band     │
//!  ├──────────────────────┤
//!  │  inside (containers) │  otherwise    → Inside, or After for
//!  │                      │                 non-container tags
//!  ├──────────────────────┤
//!  │      after band      │  r > after    → After
//!  └──────────────────────┘
//! ```
//!
//! `r` is the pointer's vertical position as a fraction of the target's
//! height. The pointer over the background targets the root (inside).
//! At most one node carries a drop indicator at a time.

use crate::config::{DropZones, EditorConfig};
use crate::document::{Document, NodeId};
use crate::host::{Point, Rect};
use crate::mutations::{Mutation, MutationError};
use crate::transient::{Marker, TransientState};
use mosaic_parser::{closes_implicitly, parse_element};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropMode {
    Before,
    After,
    Inside,
}

impl DropMode {
    pub fn marker(self) -> Marker {
        match self {
            DropMode::Before => Marker::DropBefore,
            DropMode::After => Marker::DropAfter,
            DropMode::Inside => Marker::DropInside,
        }
    }
}

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DragSource {
    /// A live node (move)
    Node(NodeId),
    /// Template markup from the palette (copy)
    Template(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragContext {
    pub source: DragSource,
    pub target: Option<NodeId>,
    pub mode: DropMode,
}

/// Drop mode for a pointer position over a target box
pub fn drop_mode(rect: &Rect, pointer_y: f64, tag: &str, zones: DropZones, config: &EditorConfig) -> DropMode {
    let r = rect.relative_y(pointer_y);
    if r < zones.before {
        DropMode::Before
    } else if r > zones.after {
        DropMode::After
    } else if config.is_container(tag) {
        DropMode::Inside
    } else {
        DropMode::After
    }
}

/// Degrade a requested placement to one the tree can take: before/after the
/// root becomes inside it, inside a non-container becomes after it.
/// See [`resolve_nesting`] for the checks that need the source's tag.
pub fn resolve_mode(doc: &Document, config: &EditorConfig, target: NodeId, mode: DropMode) -> DropMode {
    if target == doc.root() {
        return DropMode::Inside;
    }
    match (mode, doc.tag(target)) {
        (DropMode::Inside, Some(tag)) if !config.is_container(tag) => DropMode::After,
        _ => mode,
    }
}

/// Inside a target the parser would close on reparse (an `<li>` dropped into
/// an `<li>`) becomes after it
pub fn resolve_nesting(doc: &Document, target: NodeId, mode: DropMode, source_tag: Option<&str>) -> DropMode {
    match (mode, doc.tag(target), source_tag) {
        (DropMode::Inside, Some(parent), Some(child))
            if target != doc.root() && closes_implicitly(parent, child) =>
        {
            DropMode::After
        }
        _ => mode,
    }
}

/// Tag of the element a drop of `source` would place
fn source_tag(doc: &Document, source: &DragSource) -> Option<String> {
    match source {
        DragSource::Node(node) => doc.tag(*node).map(str::to_string),
        DragSource::Template(markup) => parse_element(markup).ok().map(|element| element.tag),
    }
}

/// Build the mutation a drop of `source` at (`target`, `mode`) performs
pub fn placement_mutation(source: &DragSource, target: NodeId, mode: DropMode) -> Mutation {
    match source {
        DragSource::Node(node) => Mutation::MoveNode {
            node: *node,
            target,
            mode,
        },
        DragSource::Template(markup) => Mutation::InsertMarkup {
            markup: markup.clone(),
            target,
            mode,
        },
    }
}

/// Mark a freshly placed node and its element descendants as draggable
pub fn enable_drag(doc: &Document, transient: &mut TransientState, node: NodeId) {
    for id in doc.descendants(node) {
        if doc.is_element(id) {
            transient.set(id, Marker::DragEnabled);
        }
    }
}

#[derive(Debug, Default)]
pub struct PlacementEngine {
    context: Option<DragContext>,
}

impl PlacementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> Option<&DragContext> {
        self.context.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.context.is_some()
    }

    /// Begin a drag. Live nodes must carry the drag-enabled marker, so a node
    /// being edited inline cannot be dragged.
    pub fn start(&mut self, source: DragSource, doc: &Document, transient: &TransientState) -> bool {
        if let DragSource::Node(node) = &source {
            if !doc.contains(*node) || *node == doc.root() || !transient.has(*node, Marker::DragEnabled) {
                debug!(node = %node, "Drag start refused");
                return false;
            }
        }

        self.context = Some(DragContext {
            source,
            target: None,
            mode: DropMode::Inside,
        });
        true
    }

    /// Track the pointer over `target` (`None` is the background) and move
    /// the single drop indicator accordingly
    pub fn over(
        &mut self,
        target: Option<NodeId>,
        pointer: Point,
        rect: Option<Rect>,
        doc: &Document,
        transient: &mut TransientState,
        config: &EditorConfig,
    ) {
        let Some(context) = self.context.as_mut() else {
            return;
        };

        // A removed node the host has not re-rendered yet is not the background
        if let Some(id) = target.filter(|&id| !doc.contains(id)) {
            debug!(node = %id, "Drag over a node that is no longer live");
            transient.clear_drop_indicators();
            context.target = None;
            return;
        }

        let target = target.and_then(|id| nearest_element(doc, id));
        if let (Some(id), DragSource::Node(source)) = (target, &context.source) {
            if id == *source {
                return;
            }
        }

        transient.clear_drop_indicators();

        let root = doc.root();
        match target {
            None => {
                transient.set(root, Marker::DropActive);
                context.target = Some(root);
                context.mode = DropMode::Inside;
            }
            Some(id) if id == root => {
                transient.set(root, Marker::DropActive);
                context.target = Some(root);
                context.mode = DropMode::Inside;
            }
            Some(id) => match (rect, doc.tag(id)) {
                (Some(rect), Some(tag)) => {
                    let mode = drop_mode(&rect, pointer.y, tag, config.drop_zones, config);
                    transient.set(id, mode.marker());
                    context.target = Some(id);
                    context.mode = mode;
                }
                _ => {
                    // Not rendered; nothing to drop on
                    context.target = None;
                }
            },
        }
    }

    pub fn leave(&mut self, transient: &mut TransientState) {
        transient.clear_drop_indicators();
        if let Some(context) = self.context.as_mut() {
            context.target = None;
        }
    }

    /// Perform the drop. `Ok(None)` is a silent no-op (no target, detached
    /// target); the drag context is consumed either way.
    pub fn drop(
        &mut self,
        doc: &mut Document,
        transient: &mut TransientState,
        config: &EditorConfig,
    ) -> Result<Option<NodeId>, MutationError> {
        transient.clear_drop_indicators();

        let Some(context) = self.context.take() else {
            return Ok(None);
        };
        let Some(target) = context.target.filter(|&id| doc.contains(id)) else {
            debug!("Drop without a live target");
            return Ok(None);
        };

        place(doc, transient, config, &context.source, target, context.mode)
    }

    pub fn end(&mut self, transient: &mut TransientState) {
        transient.clear_drop_indicators();
        self.context = None;
    }

    pub fn reset(&mut self) {
        self.context = None;
    }
}

/// Place `source` relative to `target`, degrading the mode as needed, and
/// drag-enable the placed subtree. Shared by canvas and outline drops.
pub fn place(
    doc: &mut Document,
    transient: &mut TransientState,
    config: &EditorConfig,
    source: &DragSource,
    target: NodeId,
    mode: DropMode,
) -> Result<Option<NodeId>, MutationError> {
    let mode = resolve_mode(doc, config, target, mode);
    let mode = resolve_nesting(doc, target, mode, source_tag(doc, source).as_deref());
    let result = placement_mutation(source, target, mode).apply(doc)?;

    if let Some(node) = result.node {
        enable_drag(doc, transient, node);
    }
    Ok(result.node)
}

/// Outline rows use their own band split and never consult geometry
pub fn outline_drop_mode(row: &Rect, pointer_y: f64, tag: &str, config: &EditorConfig) -> DropMode {
    drop_mode(row, pointer_y, tag, config.outline_drop_zones, config)
}

/// `id` itself when it is an element, else its parent
pub fn nearest_element(doc: &Document, id: NodeId) -> Option<NodeId> {
    if doc.is_element(id) {
        Some(id)
    } else {
        doc.parent(id)
    }
}
