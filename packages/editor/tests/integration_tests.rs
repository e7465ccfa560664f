//! Integration tests for the edit session

use mosaic_editor::palette::{self, PALETTE};
use mosaic_editor::{
    EditContent, EditSession, EditorConfig, HostEffect, HostEvent, Marker, NodeId,
    SelectionState, StaticHost, RESERVED_CLASSES,
};
use std::cell::RefCell;
use std::rc::Rc;

fn session(markup: &str) -> EditSession {
    let mut session = EditSession::new(StaticHost::new(), EditorConfig::default());
    session.load_document(markup);
    session
}

fn root_child(session: &EditSession, i: usize) -> NodeId {
    let doc = session.document();
    doc.children(doc.root())[i]
}

#[test]
fn test_divider_into_empty_document() {
    let mut session = session("");
    let divider = palette::find("Divider").unwrap();

    let node = session.insert_template(divider.markup).unwrap();

    assert_eq!(
        session.serialized_document(),
        r#"<hr style="border: none; border-top: 1px solid #ddd; margin: 20px 0;">"#
    );
    assert!(session.transient().has(node, Marker::DragEnabled));
    assert_eq!(session.selection(), SelectionState::Idle);
}

#[test]
fn test_every_palette_entry_inserts() {
    let mut session = session("");
    for entry in PALETTE {
        assert!(session.insert_template(entry.markup).is_some(), "{}", entry.label);
    }
    let doc = session.document();
    assert_eq!(doc.children(doc.root()).len(), PALETTE.len());
}

#[test]
fn test_double_click_type_blur() {
    let mut session = session("<p>Old text</p>");
    let p = root_child(&session, 0);

    session.handle_event(HostEvent::Click { target: Some(p) });
    session.handle_event(HostEvent::DoubleClick { target: p });
    assert_eq!(session.selection(), SelectionState::Editing(p));
    assert_eq!(session.take_effects(), vec![HostEffect::FocusAndSelectAll(p)]);
    assert!(session.live_markup().contains(r#"contenteditable="true""#));

    session.handle_event(HostEvent::EditInput {
        target: p,
        content: EditContent::Text("New text".to_string()),
    });
    session.handle_event(HostEvent::Blur);

    assert_eq!(session.selection(), SelectionState::Selected(p));
    assert!(session.transient().has(p, Marker::DragEnabled));
    assert_eq!(session.serialized_document(), "<p>New text</p>");
}

#[test]
fn test_delete_leaves_no_selection() {
    let mut session = session("<p>a</p><p>b</p>");
    let a = root_child(&session, 0);

    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    let _subscription = session.on_selection_change(move |node| sink.borrow_mut().push(node));

    session.handle_event(HostEvent::Click { target: Some(a) });
    session.handle_event(HostEvent::KeyDown {
        key: "Delete".to_string(),
        focus_in_text_field: false,
    });

    assert_eq!(session.selection(), SelectionState::Idle);
    assert_eq!(session.selected(), None);
    assert_eq!(*changes.borrow(), vec![Some(a), None]);
    assert_eq!(session.serialized_document(), "<p>b</p>");
    assert!(session.transient().nodes_with(Marker::Selected).is_empty());
}

#[test]
fn test_backspace_in_text_field_keeps_node() {
    let mut session = session("<p>a</p>");
    let p = root_child(&session, 0);

    session.handle_event(HostEvent::Click { target: Some(p) });
    session.handle_event(HostEvent::KeyDown {
        key: "Backspace".to_string(),
        focus_in_text_field: true,
    });
    assert!(session.document().contains(p));
    assert_eq!(session.selection(), SelectionState::Selected(p));
}

#[test]
fn test_td_colspan() {
    let mut session = session("<table><tr><td>a</td><td>b</td></tr></table>");
    let table = root_child(&session, 0);
    let doc = session.document();
    let tr = doc.element_children(table).next().unwrap();
    let td = doc.element_children(tr).next().unwrap();
    assert_eq!(doc.tag(td), Some("td"));

    session.handle_event(HostEvent::Click { target: Some(td) });
    assert!(session.set_attribute_field("colspan", "2"));

    let out = session.serialized_document();
    assert!(out.contains(r#"<td colspan="2">a</td>"#), "{}", out);

    let properties = session.properties().unwrap();
    assert_eq!(properties.tag, "td");
    assert_eq!(properties.attributes[0].value, "2");
}

#[test]
fn test_attribute_field_keeps_markup_well_formed() {
    let mut session = session(r#"<td colspan="1">x</td>"#);
    let td = root_child(&session, 0);
    session.handle_event(HostEvent::Click { target: Some(td) });

    assert!(!session.set_attribute_field("a\"b", "2"));
    assert!(!session.set_attribute_field("data-x>", "2"));
    assert!(session.set_attribute_field("COLSPAN", "2"));

    let out = session.serialized_document();
    assert_eq!(out, r#"<td colspan="2">x</td>"#);
    session.load_document(&out);
    assert_eq!(session.serialized_document(), out);
}

#[test]
fn test_outline_move_list_item_into_sibling() {
    let mut session = session("<ul><li>a</li><li>b</li></ul>");
    let ul = root_child(&session, 0);
    let [li1, li2] = [0, 1].map(|i| session.document().children(ul)[i]);

    assert_eq!(session.outline_move(li2, li1, mosaic_editor::DropMode::Inside), Some(li2));

    let out = session.serialized_document();
    assert_eq!(out, "<ul><li>a</li><li>b</li></ul>");
    assert_eq!(mosaic_editor::canonicalize_markup(&out), out);
}

#[test]
fn test_canonical_output_has_no_markers() {
    let mut session = session(r#"<div class="card wysiwyg-hover"><p>x</p></div><span>y</span>"#);
    let div = root_child(&session, 0);
    let span = root_child(&session, 1);

    session.handle_event(HostEvent::Click { target: Some(span) });
    session.handle_event(HostEvent::DoubleClick { target: span });
    session.handle_event(HostEvent::PointerEnter { target: div });

    let live = session.live_markup();
    assert!(live.contains("wysiwyg-hover"));
    assert!(live.contains("draggable"));

    let out = session.serialized_document();
    for class in RESERVED_CLASSES {
        assert!(!out.contains(class), "{} in {}", class, out);
    }
    assert!(!out.contains("contenteditable"));
    assert!(!out.contains("draggable"));
    assert!(!out.contains("data-mosaic-node"));
    assert_eq!(out, r#"<div class="card"><p>x</p></div><span>y</span>"#);
}

#[test]
fn test_serialized_document_roundtrip() {
    let mut session = session(
        r#"<div style="padding: 20px"><h1>Title</h1><p>Body &amp; more</p><img src="a.png" alt=""></div>"#,
    );
    let first = session.serialized_document();

    session.load_document(&first);
    assert_eq!(session.serialized_document(), first);
}

#[test]
fn test_document_change_emitted_on_resync() {
    let mut session = session("<p>a</p>");
    let p = root_child(&session, 0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _subscription = session.on_document_change(move |markup| sink.borrow_mut().push(markup.to_string()));

    session.select_node(p);
    session.set_style_property("color", "red");
    assert!(seen.borrow().is_empty());

    session.host().advance(std::time::Duration::from_millis(100));
    assert!(session.tick());
    assert_eq!(*seen.borrow(), vec![r#"<p style="color: red">a</p>"#.to_string()]);
}

#[test]
fn test_edit_input_markup_replaces_children() {
    let mut session = session("<p>a</p>");
    let p = root_child(&session, 0);

    session.handle_event(HostEvent::Click { target: Some(p) });
    session.handle_event(HostEvent::DoubleClick { target: p });
    session.handle_event(HostEvent::EditInput {
        target: p,
        content: EditContent::Markup("Hello <strong>world</strong>".to_string()),
    });
    session.handle_event(HostEvent::KeyDown {
        key: "Escape".to_string(),
        focus_in_text_field: true,
    });

    assert_eq!(session.serialized_document(), "<p>Hello <strong>world</strong></p>");
    assert_eq!(session.selection(), SelectionState::Selected(p));
}

#[test]
fn test_stale_ids_after_reload_are_ignored() {
    let mut session = session("<p>a</p>");
    let old = root_child(&session, 0);
    session.load_document("<p>b</p>");

    session.handle_event(HostEvent::Click { target: Some(old) });
    assert_eq!(session.selection(), SelectionState::Idle);
    assert!(!session.select_node(old));
    assert!(!session.outline_delete(old));
    assert_eq!(session.serialized_document(), "<p>b</p>");
}
