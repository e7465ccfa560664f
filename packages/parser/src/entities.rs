//! Character reference decoding and markup escaping

use crate::error::ParseError;

const NAMED_REFERENCES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("copy", '\u{a9}'),
    ("reg", '\u{ae}'),
    ("trade", '\u{2122}'),
    ("mdash", '\u{2014}'),
    ("ndash", '\u{2013}'),
    ("hellip", '\u{2026}'),
    ("laquo", '\u{ab}'),
    ("raquo", '\u{bb}'),
    ("bull", '\u{2022}'),
    ("middot", '\u{b7}'),
    ("zwnj", '\u{200c}'),
];

/// Longest reference name we attempt to resolve (`&hellip;` is the longest known one)
const MAX_REFERENCE_LEN: usize = 10;

/// Decode character references in `input`.
///
/// `offset` is the position of `input` in the original source and is only used
/// for diagnostics. Unknown named references are kept literally.
pub fn decode(input: &str, offset: usize, diagnostics: &mut Vec<ParseError>) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    let mut consumed = 0;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let reference = after
            .find(';')
            .filter(|&end| end <= MAX_REFERENCE_LEN)
            .map(|end| &after[..end]);

        match reference.map(|name| (name, resolve(name))) {
            Some((name, Some(c))) => {
                out.push(c);
                let len = amp + 1 + name.len() + 1;
                consumed += len;
                rest = &rest[len..];
            }
            Some((name, None)) if name.starts_with('#') => {
                diagnostics.push(ParseError::invalid_reference(
                    offset + consumed + amp,
                    format!("&{};", name),
                ));
                out.push('&');
                consumed += amp + 1;
                rest = after;
            }
            _ => {
                out.push('&');
                consumed += amp + 1;
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn resolve(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(|c: char| c == 'x' || c == 'X') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code).filter(|&c| c != '\0');
    }

    NAMED_REFERENCES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, c)| *c)
}

/// Escape text content
pub fn escape_text(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

/// Escape a double-quoted attribute value
pub fn escape_attribute(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
