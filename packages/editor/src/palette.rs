//! Built-in element palette. Each entry is template markup dragged onto the
//! canvas (or the outline) and inserted as a copy of its first root element.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    /// Short key, usually the root tag
    pub kind: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub markup: &'static str,
}

pub const PALETTE: &[PaletteEntry] = &[
    PaletteEntry {
        kind: "div",
        label: "Container",
        icon: "□",
        markup: r#"<div style="padding: 20px; border: 1px dashed #ccc;">Container</div>"#,
    },
    PaletteEntry {
        kind: "p",
        label: "Paragraph",
        icon: "¶",
        markup: r#"<p style="margin: 10px 0;">New paragraph text...</p>"#,
    },
    PaletteEntry {
        kind: "h1",
        label: "Heading 1",
        icon: "H1",
        markup: r#"<h1 style="margin: 10px 0; font-size: 24px;">Heading</h1>"#,
    },
    PaletteEntry {
        kind: "h2",
        label: "Heading 2",
        icon: "H2",
        markup: r#"<h2 style="margin: 10px 0; font-size: 20px;">Subheading</h2>"#,
    },
    PaletteEntry {
        kind: "img",
        label: "Image",
        icon: "🖼",
        markup: r#"<img src="https://via.placeholder.com/300x150" alt="Placeholder" style="max-width: 100%; display: block;" />"#,
    },
    PaletteEntry {
        kind: "a",
        label: "Link",
        icon: "🔗",
        markup: r##"<a href="#" style="color: #7c3aed; text-decoration: underline;">Link text</a>"##,
    },
    PaletteEntry {
        kind: "button",
        label: "Button",
        icon: "▣",
        markup: r##"<a href="#" style="display: inline-block; background: #7c3aed; color: white; padding: 12px 24px; border-radius: 6px; text-decoration: none; font-weight: bold;">Click Me</a>"##,
    },
    PaletteEntry {
        kind: "ul",
        label: "List",
        icon: "≡",
        markup: r#"<ul style="margin: 10px 0; padding-left: 20px;"><li>Item 1</li><li>Item 2</li><li>Item 3</li></ul>"#,
    },
    PaletteEntry {
        kind: "table",
        label: "Table",
        icon: "▦",
        markup: concat!(
            r#"<table style="width: 100%; border-collapse: collapse;">"#,
            r#"<tr><td style="border: 1px solid #ddd; padding: 8px;">Cell 1</td>"#,
            r#"<td style="border: 1px solid #ddd; padding: 8px;">Cell 2</td></tr>"#,
            r#"<tr><td style="border: 1px solid #ddd; padding: 8px;">Cell 3</td>"#,
            r#"<td style="border: 1px solid #ddd; padding: 8px;">Cell 4</td></tr>"#,
            "</table>"
        ),
    },
    PaletteEntry {
        kind: "hr",
        label: "Divider",
        icon: "—",
        markup: r#"<hr style="border: none; border-top: 1px solid #ddd; margin: 20px 0;" />"#,
    },
    PaletteEntry {
        kind: "spacer",
        label: "Spacer",
        icon: "⬜",
        markup: r#"<div style="height: 30px;"></div>"#,
    },
];

/// Look up an entry by kind or (case-insensitive) label
pub fn find(name: &str) -> Option<&'static PaletteEntry> {
    PALETTE
        .iter()
        .find(|entry| entry.kind == name || entry.label.eq_ignore_ascii_case(name))
}
