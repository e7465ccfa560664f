//! Syntax highlighting for the read-only code view

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Tag,
    Attr,
    Str,
    Text,
}

impl SpanKind {
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            SpanKind::Tag => Some("hl-tag"),
            SpanKind::Attr => Some("hl-attr"),
            SpanKind::Str => Some("hl-str"),
            SpanKind::Text => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span<'a> {
    pub kind: SpanKind,
    pub text: &'a str,
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == ':'
}

/// Classify one line of markup into spans. Concatenating the span texts
/// yields the line unchanged.
pub fn highlight_line(line: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut text_start = 0;
    let mut in_tag = false;
    let mut i = 0;

    while i < line.len() {
        let rest = &line[i..];

        if !in_tag {
            if rest.starts_with('<') {
                let prefix = if rest.starts_with("</") { 2 } else { 1 };
                let name_len = name_length(&rest[prefix..]);
                if name_len > 0 {
                    flush(line, &mut spans, text_start, i + prefix);
                    spans.push(Span {
                        kind: SpanKind::Tag,
                        text: &rest[prefix..prefix + name_len],
                    });
                    i += prefix + name_len;
                    text_start = i;
                    in_tag = true;
                    continue;
                }
            }
        } else if rest.starts_with('>') {
            in_tag = false;
        } else if let Some(quote @ ('"' | '\'')) = rest.chars().next() {
            if let Some(close) = rest[1..].find(quote) {
                flush(line, &mut spans, text_start, i + 1);
                spans.push(Span {
                    kind: SpanKind::Str,
                    text: &rest[1..1 + close],
                });
                text_start = i + 1 + close;
                i = text_start + 1;
                continue;
            }
        } else {
            let name_len = name_length(rest);
            if name_len > 0 {
                if rest[name_len..].starts_with('=') {
                    flush(line, &mut spans, text_start, i);
                    spans.push(Span {
                        kind: SpanKind::Attr,
                        text: &rest[..name_len],
                    });
                    text_start = i + name_len;
                }
                i += name_len;
                continue;
            }
        }

        i += rest.chars().next().map(char::len_utf8).unwrap_or(1);
    }

    flush(line, &mut spans, text_start, line.len());
    spans
}

fn flush<'a>(line: &'a str, spans: &mut Vec<Span<'a>>, from: usize, to: usize) {
    if to > from {
        spans.push(Span {
            kind: SpanKind::Text,
            text: &line[from..to],
        });
    }
}

fn name_length(s: &str) -> usize {
    s.char_indices()
        .find(|(_, c)| !is_name_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn escape_html(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Render code as escaped HTML with `hl-*` span classes, line by line
pub fn to_html(code: &str) -> String {
    let mut out = String::with_capacity(code.len() * 2);

    for (n, line) in code.split('\n').enumerate() {
        if n > 0 {
            out.push('\n');
        }
        for span in highlight_line(line) {
            match span.kind.css_class() {
                Some(class) => {
                    out.push_str("<span class=\"");
                    out.push_str(class);
                    out.push_str("\">");
                    escape_html(span.text, &mut out);
                    out.push_str("</span>");
                }
                None => escape_html(span.text, &mut out),
            }
        }
    }

    out
}
