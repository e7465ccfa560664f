use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tags that accept an "inside" drop
pub const DEFAULT_CONTAINER_TAGS: &[&str] = &[
    "div", "section", "article", "main", "aside", "header", "footer", "nav", "td", "th", "li",
    "ul", "ol", "table", "tbody", "tr", "form", "figure", "body",
];

/// Tags that enter inline editing on double-click
pub const DEFAULT_TEXT_EDITABLE_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "span", "a", "td", "th", "li", "strong", "em",
    "div", "button",
];

/// Vertical split of a drop target into before / inside / after bands,
/// as fractions of its height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropZones {
    pub before: f64,
    pub after: f64,
}

impl DropZones {
    pub const CANVAS: DropZones = DropZones {
        before: 0.30,
        after: 0.70,
    };

    pub const OUTLINE: DropZones = DropZones {
        before: 0.25,
        after: 0.75,
    };
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Drop bands on the rendered canvas
    pub drop_zones: DropZones,

    /// Drop bands on outline rows
    pub outline_drop_zones: DropZones,

    pub container_tags: Vec<String>,

    pub text_editable_tags: Vec<String>,

    /// Characters of text preview kept on mirror nodes
    pub preview_length: usize,

    /// Characters of preview shown in outline labels
    pub outline_preview_length: usize,

    pub resync_delay_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drop_zones: DropZones::CANVAS,
            outline_drop_zones: DropZones::OUTLINE,
            container_tags: DEFAULT_CONTAINER_TAGS.iter().map(|s| s.to_string()).collect(),
            text_editable_tags: DEFAULT_TEXT_EDITABLE_TAGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            preview_length: 30,
            outline_preview_length: 15,
            resync_delay_ms: 100,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_container(&self, tag: &str) -> bool {
        self.container_tags.iter().any(|t| t == tag)
    }

    pub fn is_text_editable(&self, tag: &str) -> bool {
        self.text_editable_tags.iter().any(|t| t == tag)
    }

    pub fn resync_delay(&self) -> Duration {
        Duration::from_millis(self.resync_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "dropZones": { "before": 0.2, "after": 0.8 },
            "containerTags": ["div", "td"],
            "resyncDelayMs": 250
        }"#;

        let config = EditorConfig::from_json(json).unwrap();
        assert_eq!(config.drop_zones, DropZones { before: 0.2, after: 0.8 });
        assert!(config.is_container("td"));
        assert!(!config.is_container("section"));
        assert_eq!(config.resync_delay(), Duration::from_millis(250));
        // Unspecified fields keep their defaults
        assert_eq!(config.outline_drop_zones, DropZones::OUTLINE);
        assert_eq!(config.preview_length, 30);
        assert!(config.is_text_editable("p"));
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert!(config.is_container("body"));
        assert!(!config.is_container("p"));
        assert!(config.is_text_editable("h3"));
        assert!(!config.is_text_editable("img"));
        assert_eq!(config.outline_preview_length, 15);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(matches!(
            EditorConfig::from_json("{ \"previewLength\": \"long\" }"),
            Err(EditorError::Config(_))
        ));
    }
}
