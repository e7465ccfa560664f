//! Line-based markup pretty-printer for the code view
//!
//! Works on serialized markup rather than on a tree, so it also accepts
//! fragments the parser would reshape. Each tag boundary starts a new line:
//! closing tags dedent before they are written, opening tags indent the
//! lines after them. Void tags, `/>` tags, declarations and lines holding
//! both an opening and a closing tag leave the indent unchanged.

const SELF_CLOSING: &[&str] = &[
    "br", "hr", "img", "input", "meta", "link", "area", "base", "col", "embed", "param", "source",
    "track", "wbr",
];

pub const DEFAULT_INDENT: &str = "  ";

/// Pretty-print markup with two-space indentation
pub fn prettify(markup: &str) -> String {
    prettify_with_indent(markup, DEFAULT_INDENT)
}

pub fn prettify_with_indent(markup: &str, indent_str: &str) -> String {
    let mut formatted = String::new();
    let mut indent: usize = 0;

    for line in split_tags(&collapse_inter_tag_whitespace(markup)) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let kind = LineKind::of(trimmed);
        if kind == LineKind::Closing {
            indent = indent.saturating_sub(1);
        }

        for _ in 0..indent {
            formatted.push_str(indent_str);
        }
        formatted.push_str(trimmed);
        formatted.push('\n');

        if kind == LineKind::Opening {
            indent += 1;
        }
    }

    formatted.trim().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Opening,
    Closing,
    Neutral,
}

impl LineKind {
    fn of(line: &str) -> Self {
        if line.starts_with("</") {
            return LineKind::Closing;
        }
        if !line.starts_with('<')
            || line.starts_with("<!")
            || line.starts_with("<?")
            || line.ends_with("/>")
            || is_self_closing_tag(line)
            || line.contains("</")
        {
            return LineKind::Neutral;
        }
        LineKind::Opening
    }
}

fn is_self_closing_tag(line: &str) -> bool {
    let name: String = line[1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    !name.is_empty() && SELF_CLOSING.contains(&name.to_ascii_lowercase().as_str())
}

/// Drop whitespace runs that sit between `>` and `<`, then trim
fn collapse_inter_tag_whitespace(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(gt) = rest.find('>') {
        out.push_str(&rest[..=gt]);
        let after = &rest[gt + 1..];
        let trimmed = after.trim_start();
        if trimmed.len() != after.len() && trimmed.starts_with('<') {
            rest = trimmed;
        } else {
            rest = after;
        }
    }
    out.push_str(rest);

    out.trim().to_string()
}

/// Split wherever a `>` is immediately followed by `<`
fn split_tags(markup: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;

    for (i, _) in markup.match_indices("><") {
        lines.push(&markup[start..=i]);
        start = i + 1;
    }
    lines.push(&markup[start..]);

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks_indent() {
        let out = prettify("<div><p>Hi</p><ul><li>a</li></ul></div>");
        assert_eq!(
            out,
            "<div>\n  <p>Hi</p>\n  <ul>\n    <li>a</li>\n  </ul>\n</div>"
        );
    }

    #[test]
    fn test_void_tags_do_not_indent() {
        let out = prettify(r#"<div><img src="a.png"><br/><hr></div>"#);
        assert_eq!(out, "<div>\n  <img src=\"a.png\">\n  <br/>\n  <hr>\n</div>");
    }

    #[test]
    fn test_whitespace_between_tags_collapsed() {
        let out = prettify("  <div>\n    <span>x</span>\n  </div>  ");
        assert_eq!(out, "<div>\n  <span>x</span>\n</div>");
    }

    #[test]
    fn test_declarations_and_comments_are_neutral() {
        let out = prettify("<!DOCTYPE html><!-- note --><div></div>");
        assert_eq!(out, "<!DOCTYPE html>\n<!-- note -->\n<div>\n</div>");
    }

    #[test]
    fn test_stray_closing_never_goes_negative() {
        let out = prettify("</div></div><p>x</p>");
        assert_eq!(out, "</div>\n</div>\n<p>x</p>");
    }

    #[test]
    fn test_custom_indent() {
        let out = prettify_with_indent("<div><span>x</span></div>", "\t");
        assert_eq!(out, "<div>\n\t<span>x</span>\n</div>");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(prettify(""), "");
        assert_eq!(prettify("   "), "");
    }
}
