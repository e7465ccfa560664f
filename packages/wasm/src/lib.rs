use mosaic_editor::palette::PALETTE;
use mosaic_editor::{
    DropMode, EditSession, EditorConfig, HostEvent, NodeId, Rect, StaticHost, Subscription,
};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Changes published since the host last asked
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct PendingChanges {
    /// `Some(None)` means the selection was cleared
    #[serde(skip_serializing_if = "Option::is_none")]
    selection: Option<Option<NodeId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<String>,
}

/// Edit session driven from JavaScript. Node ids cross the boundary as the
/// packed integers found in the live markup's `data-mosaic-node` attribute;
/// they stay within `Number.MAX_SAFE_INTEGER`.
#[wasm_bindgen]
pub struct WasmEditor {
    session: EditSession<StaticHost>,
    changes: Rc<RefCell<PendingChanges>>,
    _subscriptions: Vec<Subscription>,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor. `config_json` uses the camelCase editor config format.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmEditor, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json)
                .map_err(|e| JsValue::from_str(&format!("Config error: {}", e)))?,
            None => EditorConfig::default(),
        };

        let session = EditSession::new(StaticHost::new(), config);
        let changes = Rc::new(RefCell::new(PendingChanges::default()));

        let selection_sink = Rc::clone(&changes);
        let tree_sink = Rc::clone(&changes);
        let document_sink = Rc::clone(&changes);
        let subscriptions = vec![
            session.on_selection_change(move |node| {
                selection_sink.borrow_mut().selection = Some(node);
            }),
            session.on_tree_change(move |tree| {
                tree_sink.borrow_mut().tree = serde_json::to_value(tree).ok();
            }),
            session.on_document_change(move |markup| {
                document_sink.borrow_mut().document = Some(markup.to_string());
            }),
        ];

        Ok(WasmEditor {
            session,
            changes,
            _subscriptions: subscriptions,
        })
    }

    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, markup: &str) {
        let host = self.session.host_mut();
        host.clear_boxes();
        host.clear_styles();
        self.session.load_document(markup);
    }

    #[wasm_bindgen(js_name = serializedDocument)]
    pub fn serialized_document(&self) -> String {
        self.session.serialized_document()
    }

    #[wasm_bindgen(js_name = liveMarkup)]
    pub fn live_markup(&self) -> String {
        self.session.live_markup()
    }

    /// Record the rendered box of a node
    #[wasm_bindgen(js_name = setBox)]
    pub fn set_box(&mut self, node: u64, x: f64, y: f64, width: f64, height: f64) {
        self.session
            .host_mut()
            .set_box(NodeId::from_bits(node), Rect::new(x, y, width, height));
    }

    #[wasm_bindgen(js_name = clearBoxes)]
    pub fn clear_boxes(&mut self) {
        self.session.host_mut().clear_boxes();
    }

    /// Record a resolved style value (kebab-case property)
    #[wasm_bindgen(js_name = setComputedStyle)]
    pub fn set_computed_style(&mut self, node: u64, property: &str, value: &str) {
        self.session
            .host_mut()
            .set_style(NodeId::from_bits(node), property, value);
    }

    /// Feed one host event, e.g. `{"type":"click","target":4294967297}`
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&mut self, event_json: &str) -> Result<(), JsValue> {
        let event: HostEvent = serde_json::from_str(event_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid event: {}", e)))?;
        self.session.handle_event(event);
        Ok(())
    }

    /// Advance the clock to `now_ms` and run a due resync
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.session
            .host()
            .set_now(Duration::from_secs_f64(now_ms.max(0.0) / 1000.0));
        self.session.tick()
    }

    pub fn flush(&mut self) -> bool {
        self.session.flush()
    }

    /// Queued host effects as JSON
    #[wasm_bindgen(js_name = takeEffects)]
    pub fn take_effects(&mut self) -> String {
        to_json(&self.session.take_effects())
    }

    /// Selection, mirror and document changes since the last call, as JSON
    #[wasm_bindgen(js_name = takeChanges)]
    pub fn take_changes(&mut self) -> String {
        let changes = std::mem::take(&mut *self.changes.borrow_mut());
        to_json(&changes)
    }

    #[wasm_bindgen(js_name = selectNode)]
    pub fn select_node(&mut self, node: u64) -> bool {
        self.session.select_node(NodeId::from_bits(node))
    }

    #[wasm_bindgen(js_name = selectPath)]
    pub fn select_path(&mut self, path: &str) -> bool {
        self.session.select_path(path)
    }

    pub fn selected(&self) -> Option<u64> {
        self.session.selected().map(NodeId::to_bits)
    }

    #[wasm_bindgen(js_name = insertTemplate)]
    pub fn insert_template(&mut self, markup: &str) -> Option<u64> {
        self.session.insert_template(markup).map(NodeId::to_bits)
    }

    #[wasm_bindgen(js_name = deleteSelected)]
    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected()
    }

    /// Mirror tree from the last resync as JSON
    pub fn mirror(&self) -> String {
        to_json(self.session.mirror())
    }

    /// Drop mode (`before`/`after`/`inside`) for a pointer over an outline row
    #[wasm_bindgen(js_name = outlineDropMode)]
    pub fn outline_drop_mode(&self, target: u64, row_top: f64, row_height: f64, pointer_y: f64) -> Option<String> {
        let row = Rect::new(0.0, row_top, 0.0, row_height);
        self.session
            .outline_drop_mode(NodeId::from_bits(target), &row, pointer_y)
            .map(mode_name)
    }

    #[wasm_bindgen(js_name = outlineMove)]
    pub fn outline_move(&mut self, node: u64, target: u64, mode: &str) -> Option<u64> {
        let mode = parse_mode(mode)?;
        self.session
            .outline_move(NodeId::from_bits(node), NodeId::from_bits(target), mode)
            .map(NodeId::to_bits)
    }

    #[wasm_bindgen(js_name = outlineInsert)]
    pub fn outline_insert(&mut self, markup: &str, target: u64, mode: &str) -> Option<u64> {
        let mode = parse_mode(mode)?;
        self.session
            .outline_insert(markup, NodeId::from_bits(target), mode)
            .map(NodeId::to_bits)
    }

    #[wasm_bindgen(js_name = outlineDelete)]
    pub fn outline_delete(&mut self, node: u64) -> bool {
        self.session.outline_delete(NodeId::from_bits(node))
    }

    /// Properties of the selected node as JSON (`null` when nothing is selected)
    pub fn properties(&self) -> String {
        to_json(&self.session.properties())
    }

    #[wasm_bindgen(js_name = setStyleProperty)]
    pub fn set_style_property(&mut self, property: &str, value: &str) -> bool {
        self.session.set_style_property(property, value)
    }

    #[wasm_bindgen(js_name = setAttributeField)]
    pub fn set_attribute_field(&mut self, name: &str, value: &str) -> bool {
        self.session.set_attribute_field(name, value)
    }
}

/// Built-in element palette as JSON
#[wasm_bindgen(js_name = palette)]
pub fn palette_js() -> String {
    to_json(PALETTE)
}

/// Property groups for a properties panel as JSON
#[wasm_bindgen(js_name = styleGroups)]
pub fn style_groups_js() -> String {
    to_json(mosaic_editor::style::STYLE_GROUPS)
}

#[wasm_bindgen(js_name = prettify)]
pub fn prettify_js(markup: &str) -> String {
    mosaic_parser::prettify(markup)
}

/// Highlighted code view as HTML
#[wasm_bindgen(js_name = highlight)]
pub fn highlight_js(code: &str) -> String {
    mosaic_parser::highlight::to_html(code)
}

#[wasm_bindgen(js_name = rgbToHex)]
pub fn rgb_to_hex_js(color: &str) -> String {
    mosaic_editor::style::rgb_to_hex(color)
}

fn parse_mode(mode: &str) -> Option<DropMode> {
    match mode {
        "before" => Some(DropMode::Before),
        "after" => Some(DropMode::After),
        "inside" => Some(DropMode::Inside),
        _ => None,
    }
}

fn mode_name(mode: DropMode) -> String {
    match mode {
        DropMode::Before => "before",
        DropMode::After => "after",
        DropMode::Inside => "inside",
    }
    .to_string()
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(markup: &str) -> WasmEditor {
        let mut editor = WasmEditor::new(None).unwrap();
        editor.load_document(markup);
        editor
    }

    #[test]
    fn test_insert_divider() {
        let mut editor = editor("");
        let divider = PALETTE.iter().find(|e| e.label == "Divider").unwrap();
        assert!(editor.insert_template(divider.markup).is_some());
        assert_eq!(
            editor.serialized_document(),
            r#"<hr style="border: none; border-top: 1px solid #ddd; margin: 20px 0;">"#
        );
    }

    #[test]
    fn test_events_and_changes() {
        let mut editor = editor("<p>a</p><p>b</p>");
        editor.take_changes();

        let target = editor.session.document().children(editor.session.document().root())[0];
        let click = format!(r#"{{"type":"click","target":{}}}"#, target.to_bits());
        editor.handle_event(&click).unwrap();
        assert_eq!(editor.selected(), Some(target.to_bits()));

        editor
            .handle_event(r#"{"type":"keyDown","key":"Delete","focusInTextField":false}"#)
            .unwrap();
        assert!(!editor.tick(50.0));
        assert!(editor.tick(150.0));

        let changes: serde_json::Value = serde_json::from_str(&editor.take_changes()).unwrap();
        assert_eq!(changes["selection"], serde_json::Value::Null);
        assert_eq!(changes["document"], "<p>b</p>");
        assert!(changes["tree"].is_object());
        assert_eq!(editor.take_changes(), "{}");
    }

    #[test]
    fn test_live_markup_carries_node_ids() {
        let editor = editor("<p>a</p>");
        let p = editor.session.document().children(editor.session.document().root())[0];
        assert!(editor
            .live_markup()
            .contains(&format!(r#"data-mosaic-node="{}""#, p.to_bits())));
    }

    #[test]
    fn test_outline_operations() {
        let mut editor = editor("<p>a</p><div></div>");
        let doc = editor.session.document();
        let (p, div) = (doc.children(doc.root())[0], doc.children(doc.root())[1]);

        assert_eq!(
            editor.outline_drop_mode(div.to_bits(), 0.0, 20.0, 10.0),
            Some("inside".to_string())
        );
        assert!(editor.outline_move(p.to_bits(), div.to_bits(), "inside").is_some());
        assert_eq!(editor.serialized_document(), "<div><p>a</p></div>");
        assert!(editor.outline_move(p.to_bits(), div.to_bits(), "sideways").is_none());
    }

    #[test]
    fn test_load_forgets_recorded_layout() {
        use mosaic_editor::Host;

        let mut editor = editor("<p>a</p>");
        let p = editor.session.document().children(editor.session.document().root())[0];
        editor.set_box(p.to_bits(), 0.0, 0.0, 100.0, 20.0);
        editor.set_computed_style(p.to_bits(), "color", "rgb(1, 2, 3)");

        editor.load_document("<p>b</p>");
        assert_eq!(editor.session.host().computed_style(p, "color"), None);
        assert_eq!(editor.session.host().bounding_box(p), None);
    }
}
