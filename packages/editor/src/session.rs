//! # Edit Session
//!
//! The facade a rendering host talks to. It owns the live document and all
//! per-document editor state, routes [`HostEvent`]s to the selection
//! controller and placement engine, and publishes changes to subscribers.
//!
//! ## Event Flow
//!
//! ```text
//! HostEvent ──▶ SelectionController ─┐
//!          └──▶ PlacementEngine ─────┼──▶ Document (mutated in place)
//!                                    │
//!                                    └──▶ ResyncScheduler ──tick()──▶ MirrorTree ──▶ on_tree_change
//!                                                                └──▶ canonical  ──▶ on_document_change
//! ```
//!
//! The tree is consistent as soon as a call returns; only the mirror and the
//! serialized output wait for the debounced resync.
//!
//! Failures never reach the caller. Rejected operations are logged and leave
//! the document untouched.

use crate::canonical::{canonicalize, live_markup};
use crate::config::EditorConfig;
use crate::document::{Document, NodeId};
use crate::events::{Listeners, Subscription};
use crate::host::{Host, HostEffect, HostEvent, Rect, StaticHost};
use crate::mirror::MirrorTree;
use crate::mutations::{Mutation, MutationError, MutationResult};
use crate::placement::{nearest_element, outline_drop_mode, place, DragSource, DropMode, PlacementEngine};
use crate::resync::ResyncScheduler;
use crate::selection::{Reaction, SelectionController, SelectionState};
use crate::style::{attribute_fields, display_fallbacks, parse_style, StyleMap};
use crate::transient::{Marker, TransientState};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Editable properties of the selected element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Properties {
    pub node: NodeId,
    pub tag: String,
    /// Explicit inline style, camelCase keys
    pub styles: StyleMap,
    /// Host-resolved values for properties missing from `styles`. Display only.
    pub fallbacks: StyleMap,
    pub attributes: Vec<AttributeField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeField {
    pub name: &'static str,
    /// Empty when the attribute is absent
    pub value: String,
}

pub struct EditSession<H: Host = StaticHost> {
    host: H,
    config: EditorConfig,
    document: Document,
    transient: TransientState,
    selection: SelectionController,
    placement: PlacementEngine,
    scheduler: ResyncScheduler,
    mirror: MirrorTree,
    effects: Vec<HostEffect>,
    selection_listeners: Listeners<Option<NodeId>>,
    tree_listeners: Listeners<MirrorTree>,
    document_listeners: Listeners<String>,
}

impl<H: Host> EditSession<H> {
    /// Session over an empty document
    pub fn new(host: H, config: EditorConfig) -> Self {
        let document = Document::new();
        let mirror = MirrorTree::build(&document, &config);

        Self {
            host,
            scheduler: ResyncScheduler::new(config.resync_delay()),
            config,
            document,
            transient: TransientState::new(),
            selection: SelectionController::new(),
            placement: PlacementEngine::new(),
            mirror,
            effects: Vec::new(),
            selection_listeners: Listeners::new(),
            tree_listeners: Listeners::new(),
            document_listeners: Listeners::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn transient(&self) -> &TransientState {
        &self.transient
    }

    pub fn selection(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selection.state().node()
    }

    pub fn is_dragging(&self) -> bool {
        self.placement.is_dragging()
    }

    // ---------------------------------------------------------------------
    // Document
    // ---------------------------------------------------------------------

    /// Canonical markup with every editor marker removed
    pub fn serialized_document(&self) -> String {
        canonicalize(&self.document)
    }

    /// Markup for the rendering host, markers and node ids included
    pub fn live_markup(&self) -> String {
        live_markup(&self.document, &self.transient)
    }

    /// Mirror from the most recent resync
    pub fn mirror(&self) -> &MirrorTree {
        &self.mirror
    }

    /// Replace the document. Selection, drag state, markers and any pending
    /// resync are discarded; previously issued node ids go stale.
    pub fn load_document(&mut self, markup: &str) {
        let had_selection = self.selection.state() != SelectionState::Idle;

        self.document.load_markup(markup);
        self.transient.reset();
        self.selection.reset();
        self.placement.reset();
        self.scheduler.cancel();
        self.effects.clear();

        let root = self.document.root();
        for id in self.document.descendants(root) {
            if id != root && self.document.is_element(id) {
                self.transient.set(id, Marker::DragEnabled);
            }
        }

        info!(nodes = self.document.len(), "Document loaded");

        if had_selection {
            self.selection_listeners.emit(&None);
        }
        self.resync();
    }

    /// Append a copy of the template's first root element to the root. The
    /// inserted node is drag-enabled but not selected.
    pub fn insert_template(&mut self, markup: &str) -> Option<NodeId> {
        let source = DragSource::Template(markup.to_string());
        let root = self.document.root();

        match place(
            &mut self.document,
            &mut self.transient,
            &self.config,
            &source,
            root,
            DropMode::Inside,
        ) {
            Ok(node) => {
                self.react(Reaction {
                    resync: true,
                    ..Reaction::default()
                });
                node
            }
            Err(e) => {
                log_rejection("insert_template", &e);
                None
            }
        }
    }

    /// Remove the selected node unless it is being edited
    pub fn delete_selected(&mut self) -> bool {
        let reaction = self
            .selection
            .delete_selected(&mut self.document, &mut self.transient);
        let deleted = reaction.resync;
        self.react(reaction);
        deleted
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Select a node from outside the canvas and ask the host to scroll it
    /// into view
    pub fn select_node(&mut self, node: NodeId) -> bool {
        let reaction = self
            .selection
            .select_programmatic(node, &self.document, &mut self.transient);
        let selected = self.selection.state() == SelectionState::Selected(node);
        if !selected {
            debug!(node = %node, "Selection request ignored");
        }
        self.react(reaction);
        selected
    }

    pub fn on_selection_change(&self, callback: impl Fn(Option<NodeId>) + 'static) -> Subscription {
        self.selection_listeners
            .subscribe(move |node: &Option<NodeId>| callback(*node))
    }

    pub fn on_tree_change(&self, callback: impl Fn(&MirrorTree) + 'static) -> Subscription {
        self.tree_listeners.subscribe(callback)
    }

    pub fn on_document_change(&self, callback: impl Fn(&str) + 'static) -> Subscription {
        self.document_listeners
            .subscribe(move |markup: &String| callback(markup))
    }

    // ---------------------------------------------------------------------
    // Host plumbing
    // ---------------------------------------------------------------------

    pub fn handle_event(&mut self, event: HostEvent) {
        trace!(event = ?event, "Host event");

        let reaction = match event {
            HostEvent::Click { target } => {
                self.selection
                    .click(target, &self.document, &mut self.transient)
            }
            HostEvent::DoubleClick { target } => self.selection.double_click(
                target,
                &self.document,
                &mut self.transient,
                &self.config,
            ),
            HostEvent::PointerEnter { target } => {
                self.selection
                    .pointer_enter(target, &self.document, &mut self.transient);
                Reaction::default()
            }
            HostEvent::PointerLeave { target } => {
                self.selection
                    .pointer_leave(target, &self.document, &mut self.transient);
                Reaction::default()
            }
            HostEvent::KeyDown {
                key,
                focus_in_text_field,
            } => self.selection.key_down(
                &key,
                focus_in_text_field,
                &mut self.document,
                &mut self.transient,
            ),
            HostEvent::Blur => self.selection.commit(&mut self.transient),
            HostEvent::EditInput { target, content } => {
                self.selection
                    .edit_input(target, &content, &mut self.document)
            }
            HostEvent::DragStart { source } => {
                self.placement
                    .start(source, &self.document, &self.transient);
                Reaction::default()
            }
            HostEvent::DragOver { target, pointer } => {
                let rect = target
                    .and_then(|id| nearest_element(&self.document, id))
                    .and_then(|id| self.host.bounding_box(id));
                self.placement.over(
                    target,
                    pointer,
                    rect,
                    &self.document,
                    &mut self.transient,
                    &self.config,
                );
                Reaction::default()
            }
            HostEvent::DragLeave => {
                self.placement.leave(&mut self.transient);
                Reaction::default()
            }
            HostEvent::Drop => {
                match self
                    .placement
                    .drop(&mut self.document, &mut self.transient, &self.config)
                {
                    Ok(Some(node)) => self.placed(node),
                    Ok(None) => Reaction::default(),
                    Err(e) => {
                        log_rejection("drop", &e);
                        Reaction::default()
                    }
                }
            }
            HostEvent::DragEnd => {
                self.placement.end(&mut self.transient);
                Reaction::default()
            }
        };

        self.react(reaction);
    }

    /// Run the pending resync if it is due. Returns whether one ran.
    pub fn tick(&mut self) -> bool {
        if self.scheduler.tick(self.host.now()) {
            self.resync();
            true
        } else {
            false
        }
    }

    /// Run the pending resync immediately
    pub fn flush(&mut self) -> bool {
        if self.scheduler.flush() {
            self.resync();
            true
        } else {
            false
        }
    }

    /// When the pending resync falls due, on the host clock
    pub fn next_resync(&self) -> Option<Duration> {
        self.scheduler.due()
    }

    /// Drain effects queued for the host
    pub fn take_effects(&mut self) -> Vec<HostEffect> {
        std::mem::take(&mut self.effects)
    }

    // ---------------------------------------------------------------------
    // Outline view
    // ---------------------------------------------------------------------

    /// Select by mirror path (valid for the most recent resync only)
    pub fn select_path(&mut self, path: &str) -> bool {
        match self.mirror.resolve_path(path) {
            Some(node) => self.select_node(node),
            None => {
                debug!(path, "No node at path");
                false
            }
        }
    }

    /// Drop mode for a pointer over an outline row
    pub fn outline_drop_mode(&self, target: NodeId, row: &Rect, pointer_y: f64) -> Option<DropMode> {
        if target == self.document.root() {
            return Some(DropMode::Inside);
        }
        let tag = self.document.tag(target)?;
        Some(outline_drop_mode(row, pointer_y, tag, &self.config))
    }

    pub fn outline_move(&mut self, node: NodeId, target: NodeId, mode: DropMode) -> Option<NodeId> {
        self.outline_place(DragSource::Node(node), target, mode)
    }

    pub fn outline_insert(&mut self, markup: &str, target: NodeId, mode: DropMode) -> Option<NodeId> {
        self.outline_place(DragSource::Template(markup.to_string()), target, mode)
    }

    pub fn outline_delete(&mut self, node: NodeId) -> bool {
        self.apply(Mutation::RemoveNode { node }).is_some()
    }

    fn outline_place(&mut self, source: DragSource, target: NodeId, mode: DropMode) -> Option<NodeId> {
        match place(
            &mut self.document,
            &mut self.transient,
            &self.config,
            &source,
            target,
            mode,
        ) {
            Ok(Some(node)) => {
                let reaction = self.placed(node);
                self.react(reaction);
                Some(node)
            }
            Ok(None) => None,
            Err(e) => {
                log_rejection("outline drop", &e);
                None
            }
        }
    }

    // ---------------------------------------------------------------------
    // Properties
    // ---------------------------------------------------------------------

    pub fn properties(&self) -> Option<Properties> {
        let node = self.selected()?;
        let element = self.document.get(node)?;
        let tag = element.tag()?;

        let styles = parse_style(element.inline_style());
        let fallbacks = display_fallbacks(&styles, |property| {
            self.host.computed_style(node, property)
        });
        let attributes = attribute_fields(tag)
            .iter()
            .map(|&name| AttributeField {
                name,
                value: element.attribute(name).unwrap_or("").to_string(),
            })
            .collect();

        Some(Properties {
            node,
            tag: tag.to_string(),
            styles,
            fallbacks,
            attributes,
        })
    }

    /// Write one inline style property on the selected node. An empty value
    /// removes it.
    pub fn set_style_property(&mut self, property: &str, value: &str) -> bool {
        let Some(node) = self.selected() else {
            debug!(property, "Style write without a selection");
            return false;
        };
        self.apply(Mutation::SetStyle {
            node,
            property: property.to_string(),
            value: value.to_string(),
        })
        .is_some()
    }

    /// Write one attribute on the selected node. An empty value removes it.
    pub fn set_attribute_field(&mut self, name: &str, value: &str) -> bool {
        let Some(node) = self.selected() else {
            debug!(name, "Attribute write without a selection");
            return false;
        };
        self.apply(Mutation::SetAttribute {
            node,
            name: name.to_string(),
            value: value.to_string(),
        })
        .is_some()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn apply(&mut self, mutation: Mutation) -> Option<MutationResult> {
        match mutation.apply(&mut self.document) {
            Ok(result) => {
                self.react(Reaction {
                    resync: true,
                    ..Reaction::default()
                });
                Some(result)
            }
            Err(e) => {
                log_rejection(mutation.name(), &e);
                None
            }
        }
    }

    /// A drop placed `node`: any edit in progress ends and the node becomes
    /// the selection
    fn placed(&mut self, node: NodeId) -> Reaction {
        let mut reaction = self.selection.commit(&mut self.transient);
        reaction.merge(self.selection.select(node, &mut self.transient));
        reaction.resync = true;
        reaction
    }

    fn react(&mut self, mut reaction: Reaction) {
        if reaction.resync {
            let document = &self.document;
            self.transient.retain_live(|id| document.contains(id));
            reaction.merge(self.selection.revalidate(&self.document));
            self.scheduler.request(self.host.now());
        }

        self.effects.extend(reaction.effects);

        if reaction.selection_changed {
            self.selection_listeners.emit(&self.selection.state().node());
        }
    }

    fn resync(&mut self) {
        self.mirror = MirrorTree::build(&self.document, &self.config);
        debug!(
            version = self.document.version(),
            nodes = self.mirror.node_count(),
            "Resync"
        );

        self.tree_listeners.emit(&self.mirror);
        self.document_listeners.emit(&canonicalize(&self.document));
    }
}

fn log_rejection(operation: &str, error: &MutationError) {
    match error {
        MutationError::CycleDetected
        | MutationError::RootImmutable
        | MutationError::NodeNotFound(_)
        | MutationError::InvalidMarkup(_)
        | MutationError::ReservedAttribute(_)
        | MutationError::UnstableNesting { .. } => {
            debug!(operation, error = %error, "Operation rejected");
        }
        _ => warn!(operation, error = %error, "Operation failed"),
    }
}
