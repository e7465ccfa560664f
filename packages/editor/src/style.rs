//! # Style & Attribute Property Model
//!
//! Bidirectional mapping between inline `style` strings and an ordered map of
//! camelCase properties, plus the fixed attribute schemas and the property
//! catalogue a properties panel renders.
//!
//! ## Rules
//!
//! - `margin-top` ⇄ `marginTop`, custom properties (`--brand`) stay verbatim
//! - empty names and empty values are dropped, later duplicates overwrite
//!   earlier ones in place
//! - host-resolved fallback values are display-only and never written back

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Insertion-ordered map of camelCase style properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Set a property, keeping its position if already present
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(name, _)| name == property)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (property, value) in iter {
            map.set(property, value);
        }
        map
    }
}

impl Serialize for StyleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub fn to_camel_case(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_string();
    }

    let mut out = String::with_capacity(property.len());
    let mut chars = property.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '-' && next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

pub fn to_kebab_case(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_string();
    }

    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse an inline `style` attribute value
pub fn parse_style(style: &str) -> StyleMap {
    let mut map = StyleMap::new();

    for rule in style.split(';') {
        let Some((name, value)) = rule.split_once(':') else {
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            continue;
        }
        map.set(to_camel_case(name), value);
    }

    map
}

/// Serialize a style map back to an inline `style` value
pub fn serialize_style(styles: &StyleMap) -> String {
    styles
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{}: {}", to_kebab_case(name), value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Apply one property write to an inline style string. An empty value
/// removes the property.
pub fn apply_style_property(style: &str, property: &str, value: &str) -> String {
    let mut map = parse_style(style);
    let property = to_camel_case(property.trim());
    let value = value.trim();

    if value.is_empty() {
        map.remove(&property);
    } else {
        map.set(property, value);
    }
    serialize_style(&map)
}

// -------------------------------------------------------------------------
// Attribute schemas
// -------------------------------------------------------------------------

/// Attribute fields editable for a tag, independent of style
pub fn attribute_fields(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "target"],
        "img" => &["src", "alt"],
        "table" => &["cellpadding", "cellspacing", "border", "width", "align"],
        "td" | "th" => &["colspan", "rowspan", "valign", "align", "bgcolor"],
        "button" => &["type"],
        "video" => &["src", "poster"],
        _ => &[],
    }
}

// -------------------------------------------------------------------------
// Display fallbacks
// -------------------------------------------------------------------------

/// Properties that show the host-resolved value when not set inline
pub const FALLBACK_PROPERTIES: &[&str] = &[
    "color",
    "backgroundColor",
    "borderColor",
    "borderWidth",
    "borderStyle",
];

fn is_meaningful_fallback(property: &str, value: &str) -> bool {
    match property {
        "backgroundColor" => value != "transparent" && value != "rgba(0, 0, 0, 0)",
        "borderWidth" => value != "0px",
        "borderStyle" => value != "none",
        _ => true,
    }
}

/// Resolve display-only fallbacks for properties missing from `explicit`.
/// `resolve` receives the kebab-case CSS property name.
pub fn display_fallbacks(explicit: &StyleMap, resolve: impl Fn(&str) -> Option<String>) -> StyleMap {
    let mut fallbacks = StyleMap::new();

    for &property in FALLBACK_PROPERTIES {
        if explicit.contains(property) {
            continue;
        }
        let Some(value) = resolve(&to_kebab_case(property)) else {
            continue;
        };
        let value = value.trim();
        if !value.is_empty() && is_meaningful_fallback(property, value) {
            fallbacks.set(property, value);
        }
    }

    fallbacks
}

/// Normalise `rgb()`/`rgba()` to `#rrggbb` for color inputs. Hex values pass
/// through, anything unparseable becomes black.
pub fn rgb_to_hex(color: &str) -> String {
    let color = color.trim();
    if color.starts_with('#') {
        return color.to_string();
    }

    let channels: Vec<u32> = color
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .take(3)
        .collect();

    if channels.len() < 3 {
        return "#000000".to_string();
    }

    channels
        .iter()
        .fold(String::from("#"), |mut hex, channel| {
            hex.push_str(&format!("{:02x}", channel.min(&255)));
            hex
        })
}

// -------------------------------------------------------------------------
// Property catalogue
// -------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    Select { options: &'static [&'static str] },
    Text { placeholder: &'static str },
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct StyleField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct StyleGroup {
    pub name: &'static str,
    pub fields: &'static [StyleField],
}

const fn select(key: &'static str, label: &'static str, options: &'static [&'static str]) -> StyleField {
    StyleField {
        key,
        label,
        kind: FieldKind::Select { options },
    }
}

const fn text(key: &'static str, label: &'static str, placeholder: &'static str) -> StyleField {
    StyleField {
        key,
        label,
        kind: FieldKind::Text { placeholder },
    }
}

const fn color(key: &'static str, label: &'static str) -> StyleField {
    StyleField {
        key,
        label,
        kind: FieldKind::Color,
    }
}

pub const STYLE_GROUPS: &[StyleGroup] = &[
    StyleGroup {
        name: "Layout",
        fields: &[
            select("display", "Display", &["block", "inline", "inline-block", "flex", "grid", "none"]),
            select("position", "Position", &["static", "relative", "absolute", "fixed"]),
            select("flexDirection", "Flex Dir", &["row", "row-reverse", "column", "column-reverse"]),
            select(
                "justifyContent",
                "Justify",
                &["flex-start", "flex-end", "center", "space-between", "space-around"],
            ),
            select("alignItems", "Align", &["stretch", "flex-start", "flex-end", "center", "baseline"]),
            text("gap", "Gap", "10px"),
        ],
    },
    StyleGroup {
        name: "Position",
        fields: &[
            text("top", "Top", "0"),
            text("right", "Right", "0"),
            text("bottom", "Bottom", "0"),
            text("left", "Left", "0"),
            text("zIndex", "Z-Index", "auto"),
        ],
    },
    StyleGroup {
        name: "Size",
        fields: &[
            text("width", "Width", "auto"),
            text("height", "Height", "auto"),
            text("maxWidth", "Max W", "none"),
            text("minHeight", "Min H", "0"),
        ],
    },
    StyleGroup {
        name: "Spacing",
        fields: &[
            text("padding", "Padding", "0"),
            text("paddingTop", "Pad Top", "0"),
            text("paddingRight", "Pad Right", "0"),
            text("paddingBottom", "Pad Bot", "0"),
            text("paddingLeft", "Pad Left", "0"),
            text("margin", "Margin", "0"),
        ],
    },
    StyleGroup {
        name: "Typography",
        fields: &[
            text("fontSize", "Size", "16px"),
            select("fontWeight", "Weight", &["normal", "bold", "300", "400", "500", "600", "700"]),
            select("textAlign", "Align", &["left", "center", "right", "justify"]),
            text("lineHeight", "Line H", "1.5"),
            color("color", "Color"),
        ],
    },
    StyleGroup {
        name: "Background",
        fields: &[
            color("backgroundColor", "Color"),
            text("backgroundImage", "Image", "url(...)"),
        ],
    },
    StyleGroup {
        name: "Border",
        fields: &[
            text("borderWidth", "Width", "1px"),
            select("borderStyle", "Style", &["none", "solid", "dashed", "dotted", "double"]),
            color("borderColor", "Color"),
            text("borderRadius", "Radius", "0"),
        ],
    },
];
