use crate::ast::*;
use crate::entities::{escape_attribute, escape_text};

/// Serializer converts nodes back to markup.
///
/// Output follows the conventions of an element's inner markup:
/// - attributes keep their order and are always written `name="value"`
/// - void elements get neither a closing tag nor a slash
/// - `script`/`style` content is written verbatim
///
/// Whitespace is never added or removed, so serializing a parsed
/// fragment and parsing it again yields the same tree.
#[derive(Default)]
pub struct Serializer {
    output: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serialize_nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.serialize_node(node, false);
        }
    }

    pub fn serialize_element(&mut self, element: &Element) {
        self.output.push('<');
        self.output.push_str(&element.tag);

        for attr in &element.attributes {
            self.output.push(' ');
            self.output.push_str(&attr.name);
            self.output.push_str("=\"");
            escape_attribute(&attr.value, &mut self.output);
            self.output.push('"');
        }

        self.output.push('>');

        if element.is_void() {
            return;
        }

        let raw = is_raw_text_element(&element.tag);
        for child in &element.children {
            self.serialize_node(child, raw);
        }

        self.output.push_str("</");
        self.output.push_str(&element.tag);
        self.output.push('>');
    }

    fn serialize_node(&mut self, node: &Node, raw: bool) {
        match node {
            Node::Element(element) => self.serialize_element(element),
            Node::Text { content } if raw => self.output.push_str(content),
            Node::Text { content } => escape_text(content, &mut self.output),
            Node::Comment { content } => {
                self.output.push_str("<!--");
                self.output.push_str(content);
                self.output.push_str("-->");
            }
        }
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// Serialize a node list as inner markup
pub fn serialize(nodes: &[Node]) -> String {
    let mut serializer = Serializer::new();
    serializer.serialize_nodes(nodes);
    serializer.finish()
}

/// Serialize a single element including its own tag (outer markup)
pub fn serialize_element(element: &Element) -> String {
    let mut serializer = Serializer::new();
    serializer.serialize_element(element);
    serializer.finish()
}
