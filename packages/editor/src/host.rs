//! # Rendering Host Interface
//!
//! The editor never lays anything out itself. Geometry, resolved styles and
//! time come from the host through [`Host`]; pointer and keyboard input
//! arrive as [`HostEvent`] values; requests back to the host are queued as
//! [`HostEffect`] values for the host to drain.

use crate::document::NodeId;
use crate::placement::DragSource;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Vertical position of `y` as a fraction of the height. Zero-height
    /// boxes report the middle.
    pub fn relative_y(&self, y: f64) -> f64 {
        if self.height <= 0.0 {
            0.5
        } else {
            (y - self.y) / self.height
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Queries the editor makes against the rendering surface
pub trait Host {
    /// Box of a rendered node, `None` when it is not (or no longer) rendered
    fn bounding_box(&self, node: NodeId) -> Option<Rect>;

    /// Resolved value of a kebab-case CSS property
    fn computed_style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Monotonic clock
    fn now(&self) -> Duration;
}

/// Edited content reported by the host during inline editing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum EditContent {
    Text(String),
    Markup(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    /// `target: None` means the background
    Click { target: Option<NodeId> },
    DoubleClick { target: NodeId },
    PointerEnter { target: NodeId },
    PointerLeave { target: NodeId },
    #[serde(rename_all = "camelCase")]
    KeyDown { key: String, focus_in_text_field: bool },
    Blur,
    EditInput { target: NodeId, content: EditContent },
    DragStart { source: DragSource },
    DragOver { target: Option<NodeId>, pointer: Point },
    DragLeave,
    Drop,
    DragEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "node", rename_all = "camelCase")]
pub enum HostEffect {
    /// Focus the node and select all of its content for inline editing
    FocusAndSelectAll(NodeId),
    ScrollIntoView(NodeId),
}

/// Host backed by recorded geometry and styles, with a settable clock.
/// Used by headless consumers and by adapters that push layout in.
#[derive(Debug, Default)]
pub struct StaticHost {
    boxes: HashMap<NodeId, Rect>,
    styles: HashMap<(NodeId, String), String>,
    clock: Cell<Duration>,
}

impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_box(&mut self, node: NodeId, rect: Rect) {
        self.boxes.insert(node, rect);
    }

    pub fn clear_boxes(&mut self) {
        self.boxes.clear();
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        self.styles
            .insert((node, property.to_string()), value.to_string());
    }

    pub fn clear_styles(&mut self) {
        self.styles.clear();
    }

    pub fn set_now(&self, now: Duration) {
        self.clock.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.clock.set(self.clock.get() + by);
    }
}

impl Host for StaticHost {
    fn bounding_box(&self, node: NodeId) -> Option<Rect> {
        self.boxes.get(&node).copied()
    }

    fn computed_style(&self, node: NodeId, property: &str) -> Option<String> {
        self.styles.get(&(node, property.to_string())).cloned()
    }

    fn now(&self) -> Duration {
        self.clock.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_y() {
        let rect = Rect::new(0.0, 100.0, 50.0, 200.0);
        assert_eq!(rect.relative_y(100.0), 0.0);
        assert_eq!(rect.relative_y(150.0), 0.25);
        assert_eq!(Rect::new(0.0, 10.0, 10.0, 0.0).relative_y(999.0), 0.5);
    }

    #[test]
    fn test_event_json_shape() {
        let event: HostEvent =
            serde_json::from_str(r#"{"type":"keyDown","key":"Delete","focusInTextField":false}"#)
                .unwrap();
        assert_eq!(
            event,
            HostEvent::KeyDown {
                key: "Delete".to_string(),
                focus_in_text_field: false
            }
        );

        let click: HostEvent = serde_json::from_str(r#"{"type":"click","target":null}"#).unwrap();
        assert_eq!(click, HostEvent::Click { target: None });
    }

    #[test]
    fn test_static_host_clear_styles() {
        let mut host = StaticHost::new();
        let node = NodeId::from_bits(3);
        host.set_style(node, "color", "rgb(0, 0, 0)");
        host.set_box(node, Rect::new(0.0, 0.0, 10.0, 10.0));

        host.clear_styles();
        assert_eq!(host.computed_style(node, "color"), None);
        assert!(host.bounding_box(node).is_some());
    }

    #[test]
    fn test_static_host_clock() {
        let host = StaticHost::new();
        host.advance(Duration::from_millis(40));
        host.advance(Duration::from_millis(60));
        assert_eq!(host.now(), Duration::from_millis(100));
    }
}
