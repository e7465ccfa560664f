//! # Mosaic Editor
//!
//! Direct-manipulation editing engine for Mosaic markup documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: markup text → AST → markup text     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: live document + editor state        │
//! │  - Selection / inline-edit state machine    │
//! │  - Drag-and-drop placement                  │
//! │  - Validated mutations                      │
//! │  - Debounced resync (mirror + canonical)    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ host: renders live markup, reports events   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The live document is the source of truth**: the mirror tree and the
//!    serialized string are derived views rebuilt on resync
//! 2. **Editor state stays out of the document**: selection, hover, drop
//!    indicators and edit flags live in a side table
//! 3. **The host owns layout**: geometry, resolved styles and time are asked
//!    for, never computed
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mosaic_editor::{EditSession, EditorConfig, HostEvent, StaticHost};
//!
//! let mut session = EditSession::new(StaticHost::new(), EditorConfig::default());
//! let _sub = session.on_document_change(|markup| println!("{}", markup));
//!
//! session.load_document("<p>Hello</p>");
//! session.insert_template(mosaic_editor::palette::PALETTE[9].markup);
//! session.handle_event(HostEvent::Click { target: None });
//! session.flush();
//! ```

mod canonical;
mod config;
mod document;
mod errors;
mod events;
mod host;
mod mirror;
mod mutations;
pub mod palette;
mod placement;
mod resync;
mod selection;
mod session;
pub mod style;
mod transient;

pub use canonical::{canonicalize, canonicalize_markup, live_markup, strip_transient};
pub use config::{DropZones, EditorConfig, DEFAULT_CONTAINER_TAGS, DEFAULT_TEXT_EDITABLE_TAGS};
pub use document::{Document, DocumentNode, NodeId, NodeKind, GENERATION_BITS, ROOT_TAG};
pub use errors::EditorError;
pub use events::{Listeners, Subscription};
pub use host::{EditContent, Host, HostEffect, HostEvent, Point, Rect, StaticHost};
pub use mirror::{MirrorNode, MirrorTree};
pub use mutations::{Mutation, MutationError, MutationResult};
pub use placement::{
    drop_mode, outline_drop_mode, place, resolve_mode, DragContext, DragSource, DropMode,
    PlacementEngine,
};
pub use resync::ResyncScheduler;
pub use selection::{Reaction, SelectionController, SelectionState};
pub use session::{AttributeField, EditSession, Properties};
pub use style::{parse_style, serialize_style, StyleMap};
pub use transient::{
    is_editor_attribute, is_reserved_class, Marker, MarkerSet, TransientState, EDITOR_ATTRIBUTES,
    NODE_ATTRIBUTE, RESERVED_CLASSES,
};

// Re-export common types for convenience
pub use mosaic_parser::{prettify, ParseError};
