//! # Mirror Tree
//!
//! Addressable snapshot of the live document for the outline view.
//!
//! Rebuilt from scratch on every resync. Each node carries its live
//! [`NodeId`] plus a path of element sibling indices from the root
//! (`"0"`, `"0-1"`, `"0-1-3"`). Paths are only valid for the snapshot that
//! produced them; anything that must survive an edit keys on the `NodeId`.

use crate::config::EditorConfig;
use crate::document::{Document, DocumentNode, NodeId};
use crate::transient::is_reserved_class;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorNode {
    pub id: NodeId,
    pub path: String,
    pub tag: String,
    pub identifier: Option<String>,
    /// Class list without editor markers
    pub classes: Vec<String>,
    pub preview: String,
    pub children: Vec<MirrorNode>,
}

impl MirrorNode {
    /// Outline row text: `tag#id.firstClass "preview…"`
    pub fn label(&self, preview_length: usize) -> String {
        let mut label = self.tag.clone();
        if let Some(id) = &self.identifier {
            label.push('#');
            label.push_str(id);
        }
        if let Some(class) = self.classes.first() {
            label.push('.');
            label.push_str(class);
        }
        if !self.preview.is_empty() {
            label.push_str(" \"");
            label.push_str(&truncate_chars(&self.preview, preview_length));
            label.push_str("…\"");
        }
        label
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(MirrorNode::count).sum::<usize>()
    }

    fn find(&self, id: NodeId) -> Option<&MirrorNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    fn walk<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a MirrorNode)>) {
        out.push((depth, self));
        for child in &self.children {
            child.walk(depth + 1, out);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorTree {
    root: Option<MirrorNode>,
    #[serde(skip)]
    paths: HashMap<String, NodeId>,
    #[serde(skip)]
    outline_preview_length: usize,
}

impl MirrorTree {
    pub fn build(doc: &Document, config: &EditorConfig) -> Self {
        let mut paths = HashMap::new();
        let root = build_node(doc, doc.root(), "0".to_string(), config, &mut paths);

        Self {
            root,
            paths,
            outline_preview_length: config.outline_preview_length,
        }
    }

    pub fn root(&self) -> Option<&MirrorNode> {
        self.root.as_ref()
    }

    pub fn resolve_path(&self, path: &str) -> Option<NodeId> {
        self.paths.get(path).copied()
    }

    pub fn find(&self, id: NodeId) -> Option<&MirrorNode> {
        self.root.as_ref().and_then(|root| root.find(id))
    }

    pub fn path_of(&self, id: NodeId) -> Option<&str> {
        self.find(id).map(|node| node.path.as_str())
    }

    pub fn node_count(&self) -> usize {
        self.root.as_ref().map(MirrorNode::count).unwrap_or(0)
    }

    pub fn label(&self, id: NodeId) -> Option<String> {
        self.find(id)
            .map(|node| node.label(self.outline_preview_length))
    }

    /// Depth-first listing with depths, root at depth 0
    pub fn walk(&self) -> Vec<(usize, &MirrorNode)> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.walk(0, &mut out);
        }
        out
    }
}

fn build_node(
    doc: &Document,
    id: NodeId,
    path: String,
    config: &EditorConfig,
    paths: &mut HashMap<String, NodeId>,
) -> Option<MirrorNode> {
    let node = doc.get(id)?;
    let tag = node.tag()?.to_string();

    let children = doc
        .element_children(id)
        .enumerate()
        .filter_map(|(index, child)| {
            build_node(doc, child, format!("{}-{}", path, index), config, paths)
        })
        .collect();

    paths.insert(path.clone(), id);

    Some(MirrorNode {
        id,
        tag,
        identifier: node.identifier().map(str::to_string),
        classes: node
            .classes()
            .filter(|class| !is_reserved_class(class))
            .map(str::to_string)
            .collect(),
        preview: truncate_chars(&preview_text(doc, node), config.preview_length),
        children,
        path,
    })
}

/// First non-empty direct text child, else the first non-empty descendant text
fn preview_text(doc: &Document, node: &DocumentNode) -> String {
    let direct = node
        .children()
        .iter()
        .filter_map(|&child| doc.get(child).and_then(DocumentNode::text))
        .map(str::trim)
        .find(|text| !text.is_empty());

    if let Some(text) = direct {
        return text.to_string();
    }

    node.children()
        .iter()
        .flat_map(|&child| doc.descendants(child))
        .filter_map(|id| doc.get(id).and_then(DocumentNode::text))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
