//! # Selection & Inline-Edit Controller
//!
//! ```text
//!          click node                double-click (text-bearing)
//!   Idle ─────────────▶ Selected(n) ─────────────────────────▶ Editing(n)
//!    ▲                    │  ▲                                     │
//!    │  click background  │  └──────── blur / Escape ──────────────┘
//!    └────────────────────┘
//!       Delete/Backspace (not editing, focus outside text fields)
//! ```
//!
//! The controller only toggles markers and applies mutations; it reports
//! what happened in a [`Reaction`] so the session can resync and notify.

use crate::config::EditorConfig;
use crate::document::{Document, NodeId};
use crate::host::{EditContent, HostEffect};
use crate::mutations::Mutation;
use crate::transient::{Marker, TransientState};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "node", rename_all = "camelCase")]
pub enum SelectionState {
    #[default]
    Idle,
    Selected(NodeId),
    Editing(NodeId),
}

impl SelectionState {
    /// The selected or edited node
    pub fn node(&self) -> Option<NodeId> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected(id) | SelectionState::Editing(id) => Some(*id),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, SelectionState::Editing(_))
    }
}

/// Outcome of feeding one event to the controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    pub selection_changed: bool,
    pub resync: bool,
    pub effects: Vec<HostEffect>,
}

impl Reaction {
    fn none() -> Self {
        Self::default()
    }

    fn selection() -> Self {
        Self {
            selection_changed: true,
            ..Self::default()
        }
    }

    fn resync() -> Self {
        Self {
            resync: true,
            ..Self::default()
        }
    }

    pub fn merge(&mut self, other: Reaction) {
        self.selection_changed |= other.selection_changed;
        self.resync |= other.resync;
        self.effects.extend(other.effects);
    }
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Pointer click. `None` (or the root) is the background.
    pub fn click(&mut self, target: Option<NodeId>, doc: &Document, transient: &mut TransientState) -> Reaction {
        if self.state.is_editing() {
            // Blur arrives first when the click lands outside the edited node
            return Reaction::none();
        }

        match target.and_then(|id| selectable(doc, id)) {
            Some(id) => self.select(id, transient),
            None => self.deselect(transient),
        }
    }

    /// Enter inline editing on a text-bearing node that is already selected
    pub fn double_click(
        &mut self,
        target: NodeId,
        doc: &Document,
        transient: &mut TransientState,
        config: &EditorConfig,
    ) -> Reaction {
        let Some(target) = selectable(doc, target) else {
            return Reaction::none();
        };
        if self.state != SelectionState::Selected(target) {
            return Reaction::none();
        }
        let editable = doc
            .tag(target)
            .map(|tag| config.is_text_editable(tag))
            .unwrap_or(false);
        if !editable {
            return Reaction::none();
        }

        self.state = SelectionState::Editing(target);
        transient.set(target, Marker::Editing);
        transient.unset(target, Marker::DragEnabled);
        debug!(node = %target, "Inline editing started");

        Reaction {
            selection_changed: true,
            effects: vec![HostEffect::FocusAndSelectAll(target)],
            ..Reaction::default()
        }
    }

    /// Content typed into the node being edited
    pub fn edit_input(&mut self, target: NodeId, content: &EditContent, doc: &mut Document) -> Reaction {
        if self.state != SelectionState::Editing(target) {
            return Reaction::none();
        }

        let mutation = match content {
            EditContent::Text(text) => Mutation::SetText {
                node: target,
                text: text.clone(),
            },
            EditContent::Markup(markup) => Mutation::ReplaceContent {
                node: target,
                markup: markup.clone(),
            },
        };

        match mutation.apply(doc) {
            Ok(_) => Reaction::resync(),
            Err(e) => {
                warn!(node = %target, error = %e, "Inline edit rejected");
                Reaction::none()
            }
        }
    }

    /// Leave inline editing (blur or Escape)
    pub fn commit(&mut self, transient: &mut TransientState) -> Reaction {
        let SelectionState::Editing(node) = self.state else {
            return Reaction::none();
        };

        self.state = SelectionState::Selected(node);
        transient.unset(node, Marker::Editing);
        transient.set(node, Marker::DragEnabled);
        debug!(node = %node, "Inline editing finished");

        Reaction {
            selection_changed: true,
            resync: true,
            ..Reaction::default()
        }
    }

    pub fn key_down(
        &mut self,
        key: &str,
        focus_in_text_field: bool,
        doc: &mut Document,
        transient: &mut TransientState,
    ) -> Reaction {
        match key {
            "Escape" => self.commit(transient),
            "Delete" | "Backspace" if !focus_in_text_field => self.delete_selected(doc, transient),
            _ => Reaction::none(),
        }
    }

    /// Remove the selected node. Suppressed while editing.
    pub fn delete_selected(&mut self, doc: &mut Document, transient: &mut TransientState) -> Reaction {
        let SelectionState::Selected(node) = self.state else {
            return Reaction::none();
        };

        let doomed = doc.descendants(node);
        if let Err(e) = (Mutation::RemoveNode { node }).apply(doc) {
            debug!(node = %node, error = %e, "Delete refused");
            return Reaction::none();
        }
        for id in doomed {
            transient.forget(id);
        }

        self.state = SelectionState::Idle;
        Reaction {
            selection_changed: true,
            resync: true,
            ..Reaction::default()
        }
    }

    /// Selection requested from outside the canvas (outline view). Never
    /// enters editing; an edit in progress is committed first.
    pub fn select_programmatic(&mut self, node: NodeId, doc: &Document, transient: &mut TransientState) -> Reaction {
        let Some(node) = selectable(doc, node) else {
            return Reaction::none();
        };

        let mut reaction = Reaction::none();
        if self.state.is_editing() && self.state.node() != Some(node) {
            reaction.merge(self.commit(transient));
        }
        if self.state.is_editing() {
            return reaction;
        }

        reaction.merge(self.select(node, transient));
        reaction.effects.push(HostEffect::ScrollIntoView(node));
        reaction
    }

    pub fn pointer_enter(&self, target: NodeId, doc: &Document, transient: &mut TransientState) {
        transient.clear(Marker::Hover);
        if let Some(id) = selectable(doc, target) {
            transient.set(id, Marker::Hover);
        }
    }

    pub fn pointer_leave(&self, target: NodeId, doc: &Document, transient: &mut TransientState) {
        if let Some(id) = selectable(doc, target) {
            transient.unset(id, Marker::Hover);
        }
    }

    /// Select `node`, moving the single selection marker
    pub fn select(&mut self, node: NodeId, transient: &mut TransientState) -> Reaction {
        if self.state == SelectionState::Selected(node) {
            return Reaction::none();
        }

        transient.clear(Marker::Selected);
        transient.set(node, Marker::Selected);
        self.state = SelectionState::Selected(node);
        Reaction::selection()
    }

    pub fn deselect(&mut self, transient: &mut TransientState) -> Reaction {
        transient.clear(Marker::Selected);
        if self.state == SelectionState::Idle {
            return Reaction::none();
        }
        self.state = SelectionState::Idle;
        Reaction::selection()
    }

    /// Drop back to Idle when the selected node no longer exists
    pub fn revalidate(&mut self, doc: &Document) -> Reaction {
        match self.state.node() {
            Some(node) if !doc.contains(node) => {
                self.state = SelectionState::Idle;
                Reaction::selection()
            }
            _ => Reaction::none(),
        }
    }

    pub fn reset(&mut self) {
        self.state = SelectionState::Idle;
    }
}

/// Nearest element for `id` that may be selected (never the root)
fn selectable(doc: &Document, id: NodeId) -> Option<NodeId> {
    let element = if doc.is_element(id) {
        id
    } else {
        doc.parent(id)?
    };
    (element != doc.root()).then_some(element)
}
