use serde::{Deserialize, Serialize};

/// Tags that never have children or a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Tags whose content is kept verbatim (no entity decoding, no nested tags)
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// A single attribute, kept in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Element node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Lowercased tag name
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|attr| attr.name == name)?;
        Some(self.attributes.remove(pos).value)
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag)
    }
}

/// Markup node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Element(Element),
    Text { content: String },
    Comment { content: String },
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Node::Comment {
            content: content.into(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// Top-level sequence of nodes produced by the parser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

/// Elements stripped when a full document without a body is loaded
const DOCUMENT_LEVEL_TAGS: &[&str] = &["meta", "link", "title", "head", "style", "script"];

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First element root of the fragment, skipping leading text and comments
    pub fn first_element(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    /// Consume the fragment and return its first element root
    pub fn into_first_element(self) -> Option<Element> {
        self.nodes.into_iter().find_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Reduce a whole document to the content that belongs in the editor body.
    ///
    /// If a `body` element exists its children are returned. Otherwise, when
    /// document-level structure is present (`html`, `head`), head-only elements
    /// are dropped and the remainder is flattened out of `html`.
    pub fn into_body_content(self) -> Fragment {
        if let Some(body) = find_element(&self.nodes, "body") {
            return Fragment::new(body.children.clone());
        }

        let has_document_structure = self.nodes.iter().any(|node| {
            node.as_element()
                .map(|el| el.tag == "html" || el.tag == "head")
                .unwrap_or(false)
        });
        if !has_document_structure {
            return self;
        }

        let mut nodes = Vec::new();
        for node in self.nodes {
            flatten_document_node(node, &mut nodes);
        }
        Fragment::new(nodes)
    }
}

fn find_element<'a>(nodes: &'a [Node], tag: &str) -> Option<&'a Element> {
    for node in nodes {
        if let Node::Element(element) = node {
            if element.tag == tag {
                return Some(element);
            }
            if let Some(found) = find_element(&element.children, tag) {
                return Some(found);
            }
        }
    }
    None
}

fn flatten_document_node(node: Node, out: &mut Vec<Node>) {
    match node {
        Node::Element(element) if DOCUMENT_LEVEL_TAGS.contains(&element.tag.as_str()) => {}
        Node::Element(element) if element.tag == "html" => {
            for child in element.children {
                flatten_document_node(child, out);
            }
        }
        Node::Element(mut element) => {
            let children = std::mem::take(&mut element.children);
            for child in children {
                flatten_document_node(child, &mut element.children);
            }
            out.push(Node::Element(element));
        }
        other => out.push(other),
    }
}
