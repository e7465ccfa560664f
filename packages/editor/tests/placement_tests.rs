//! Drag-and-drop placement through the session

use mosaic_editor::{
    DragSource, DropMode, EditSession, EditorConfig, HostEvent, Marker, NodeId, Point, Rect,
    SelectionState, StaticHost,
};

fn session(markup: &str) -> EditSession {
    let mut session = EditSession::new(StaticHost::new(), EditorConfig::default());
    session.load_document(markup);
    session
}

fn root_children(session: &EditSession) -> Vec<NodeId> {
    let doc = session.document();
    doc.children(doc.root()).to_vec()
}

/// Lay the root's children out as a vertical stack of 100px boxes
fn stack_layout(session: &mut EditSession) {
    let children = root_children(session);
    for (i, id) in children.into_iter().enumerate() {
        session
            .host_mut()
            .set_box(id, Rect::new(0.0, i as f64 * 100.0, 600.0, 100.0));
    }
}

fn drag(session: &mut EditSession, source: DragSource, target: Option<NodeId>, y: f64) {
    session.handle_event(HostEvent::DragStart { source });
    session.handle_event(HostEvent::DragOver {
        target,
        pointer: Point::new(10.0, y),
    });
    session.handle_event(HostEvent::Drop);
    session.handle_event(HostEvent::DragEnd);
}

#[test]
fn test_drag_before_sibling() {
    let mut session = session("<p>X</p><p>A</p><p>Y</p>");
    stack_layout(&mut session);
    let [x, _, y] = <[NodeId; 3]>::try_from(root_children(&session)).unwrap();

    // Top band of Y (y box spans 200..300)
    drag(&mut session, DragSource::Node(x), Some(y), 210.0);

    assert_eq!(session.serialized_document(), "<p>A</p><p>X</p><p>Y</p>");
    let children = root_children(&session);
    assert_eq!(children.iter().filter(|&&id| id == x).count(), 1);
    assert_eq!(children[1], x);
    assert_eq!(session.selection(), SelectionState::Selected(x));
    assert!(session.transient().nodes_with(Marker::DropBefore).is_empty());
}

#[test]
fn test_drag_after_and_inside() {
    let mut session = session("<p>X</p><div></div>");
    stack_layout(&mut session);
    let [x, div] = <[NodeId; 2]>::try_from(root_children(&session)).unwrap();

    drag(&mut session, DragSource::Node(x), Some(div), 150.0);
    assert_eq!(session.serialized_document(), "<div><p>X</p></div>");
    assert_eq!(session.document().parent(x), Some(div));

    session.host_mut().set_box(div, Rect::new(0.0, 0.0, 600.0, 100.0));
    drag(&mut session, DragSource::Node(x), Some(div), 95.0);
    assert_eq!(session.serialized_document(), "<div></div><p>X</p>");
}

#[test]
fn test_inside_on_non_container_degrades_to_after() {
    let mut session = session("<p>A</p><p>B</p>");
    stack_layout(&mut session);
    let [a, b] = <[NodeId; 2]>::try_from(root_children(&session)).unwrap();

    drag(&mut session, DragSource::Node(b), Some(a), 50.0);
    assert_eq!(session.serialized_document(), "<p>A</p><p>B</p>");
    assert_eq!(root_children(&session), vec![a, b]);
}

#[test]
fn test_drop_into_own_descendant_rejected() {
    let mut session = session("<div><section><p>deep</p></section></div>");
    let div = root_children(&session)[0];
    let section = session.document().children(div)[0];
    session
        .host_mut()
        .set_box(section, Rect::new(0.0, 0.0, 600.0, 100.0));
    let before = session.serialized_document();

    drag(&mut session, DragSource::Node(div), Some(section), 50.0);

    assert_eq!(session.serialized_document(), before);
    assert_eq!(session.document().parent(section), Some(div));
    assert_eq!(session.selection(), SelectionState::Idle);
    for marker in Marker::DROP_INDICATORS {
        assert!(session.transient().nodes_with(marker).is_empty());
    }
}

#[test]
fn test_template_dropped_on_background_appends() {
    let mut session = session("<p>A</p>");

    session.handle_event(HostEvent::DragStart {
        source: DragSource::Template(r#"<div style="height: 30px;"></div>"#.to_string()),
    });
    session.handle_event(HostEvent::DragOver {
        target: None,
        pointer: Point::new(0.0, 500.0),
    });
    let root = session.document().root();
    assert!(session.transient().has(root, Marker::DropActive));

    session.handle_event(HostEvent::Drop);

    assert_eq!(
        session.serialized_document(),
        r#"<p>A</p><div style="height: 30px;"></div>"#
    );
    let placed = root_children(&session)[1];
    assert!(session.transient().has(placed, Marker::DragEnabled));
    assert_eq!(session.selection(), SelectionState::Selected(placed));
    assert!(!session.transient().has(root, Marker::DropActive));
}

#[test]
fn test_template_without_root_is_silent() {
    let mut session = session("<p>A</p>");
    drag(&mut session, DragSource::Template("just words".to_string()), None, 0.0);
    assert_eq!(session.serialized_document(), "<p>A</p>");
    assert_eq!(session.selection(), SelectionState::Idle);
}

#[test]
fn test_detached_target_cancels_drop() {
    let mut session = session("<p>A</p><div></div>");
    let [a, div] = <[NodeId; 2]>::try_from(root_children(&session)).unwrap();

    // No geometry recorded for the div
    drag(&mut session, DragSource::Node(a), Some(div), 50.0);
    assert_eq!(session.serialized_document(), "<p>A</p><div></div>");
}

#[test]
fn test_removed_target_cancels_drop() {
    let mut session = session("<p>A</p><div>D</div>");
    stack_layout(&mut session);
    let [a, div] = <[NodeId; 2]>::try_from(root_children(&session)).unwrap();
    assert!(session.outline_delete(div));

    drag(&mut session, DragSource::Template("<hr>".to_string()), Some(div), 50.0);
    assert_eq!(session.serialized_document(), "<p>A</p>");

    drag(&mut session, DragSource::Node(a), Some(div), 50.0);
    assert_eq!(session.serialized_document(), "<p>A</p>");

    let root = session.document().root();
    assert!(!session.transient().has(root, Marker::DropActive));
    assert_eq!(session.selection(), SelectionState::Idle);
}

#[test]
fn test_node_being_edited_cannot_be_dragged() {
    let mut session = session("<p>A</p><div></div>");
    stack_layout(&mut session);
    let [a, div] = <[NodeId; 2]>::try_from(root_children(&session)).unwrap();

    session.handle_event(HostEvent::Click { target: Some(a) });
    session.handle_event(HostEvent::DoubleClick { target: a });
    session.handle_event(HostEvent::DragStart {
        source: DragSource::Node(a),
    });
    assert!(!session.is_dragging());

    drag(&mut session, DragSource::Node(a), Some(div), 150.0);
    assert_eq!(session.document().parent(a), Some(session.document().root()));
}

#[test]
fn test_hovering_source_keeps_previous_indicator() {
    let mut session = session("<div></div><p>B</p>");
    stack_layout(&mut session);
    let [div, b] = <[NodeId; 2]>::try_from(root_children(&session)).unwrap();

    session.handle_event(HostEvent::DragStart {
        source: DragSource::Node(b),
    });
    session.handle_event(HostEvent::DragOver {
        target: Some(div),
        pointer: Point::new(0.0, 50.0),
    });
    session.handle_event(HostEvent::DragOver {
        target: Some(b),
        pointer: Point::new(0.0, 150.0),
    });
    assert_eq!(session.transient().nodes_with(Marker::DropInside), vec![div]);

    session.handle_event(HostEvent::DragLeave);
    assert!(session.transient().nodes_with(Marker::DropInside).is_empty());
    session.handle_event(HostEvent::DragEnd);
    assert!(!session.is_dragging());
}

#[test]
fn test_outline_insert_uses_row_bands() {
    let mut session = session("<div></div>");
    let div = root_children(&session)[0];
    let row = Rect::new(0.0, 0.0, 240.0, 20.0);

    let mode = session.outline_drop_mode(div, &row, 4.0).unwrap();
    assert_eq!(mode, DropMode::Before);
    let placed = session.outline_insert("<hr>", div, mode).unwrap();

    assert_eq!(session.serialized_document(), "<hr><div></div>");
    assert_eq!(session.selected(), Some(placed));
}
