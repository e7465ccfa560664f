//! Lenient markup tree builder
//!
//! Builds a [`Fragment`] from markup the way a browser would treat an
//! `innerHTML` assignment, minus the full HTML5 insertion modes:
//!
//! - tag and attribute names are lowercased
//! - void elements never take children, `/>` closes any element
//! - stray end tags are ignored, unclosed elements close at end of input
//! - `p`, `li`, `dt`/`dd`, `td`/`th`, `tr` and `option` close implicitly
//! - `script` and `style` content is kept verbatim
//!
//! Recoverable problems are collected as diagnostics instead of failing.

use crate::ast::{is_raw_text_element, Attribute, Element, Fragment, Node};
use crate::entities;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{AttrToken, Token};
use logos::{Lexer, Logos};

/// Block-level start tags that close an open `<p>`
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "fieldset", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol", "p", "pre",
    "section", "table", "ul",
];

/// Whether a start tag `incoming` implicitly closes an open `open` element.
/// A tree nesting `incoming` directly inside `open` does not survive a
/// serialize and reparse.
pub fn closes_implicitly(open: &str, incoming: &str) -> bool {
    match open {
        "p" => CLOSES_PARAGRAPH.contains(&incoming),
        "li" => incoming == "li",
        "dt" | "dd" => matches!(incoming, "dt" | "dd"),
        "td" | "th" => matches!(incoming, "td" | "th" | "tr"),
        "tr" => incoming == "tr",
        "option" => incoming == "option",
        _ => false,
    }
}

/// Parsed start tag
#[derive(Debug, Clone, PartialEq)]
struct StartTag {
    name: String,
    attributes: Vec<Attribute>,
    self_closing: bool,
}

pub struct Parser<'src> {
    source: &'src str,
    /// Top-level nodes
    nodes: Vec<Node>,
    /// Open elements, innermost last
    stack: Vec<Element>,
    diagnostics: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            stack: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Parse the whole source, returning the fragment and any diagnostics
    pub fn parse(mut self) -> (Fragment, Vec<ParseError>) {
        let source = self.source;
        let mut lexer = Token::lexer(source);

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            match result {
                Ok(Token::StartTag(raw)) => {
                    let tag = self.parse_start_tag(raw, span.start);
                    self.open_element(tag, &mut lexer);
                }
                Ok(Token::EndTag(name)) => self.close_element(&name.to_ascii_lowercase()),
                Ok(Token::Text(text)) => {
                    let decoded = entities::decode(text, span.start, &mut self.diagnostics);
                    self.push_text(&decoded);
                }
                Ok(Token::LessThan) => self.push_text("<"),
                Ok(Token::Comment(body)) => self.push_node(Node::comment(body)),
                Ok(Token::Declaration(_)) | Ok(Token::ProcessingInstruction(_)) => {}
                Err(()) => {
                    // Only start tags without a closing `>` fail to lex
                    self.diagnostics.push(ParseError::unterminated_tag(span.start));
                    self.push_text(&source[span]);
                }
            }
        }

        while let Some(element) = self.stack.pop() {
            self.push_node(Node::Element(element));
        }

        (Fragment::new(self.nodes), self.diagnostics)
    }

    fn open_element(&mut self, tag: StartTag, lexer: &mut Lexer<'src, Token<'src>>) {
        while self
            .stack
            .last()
            .map(|open| closes_implicitly(&open.tag, &tag.name))
            .unwrap_or(false)
        {
            self.pop_element();
        }

        let mut element = Element::new(tag.name);
        element.attributes = tag.attributes;

        if element.is_void() || tag.self_closing {
            self.push_node(Node::Element(element));
            return;
        }

        if is_raw_text_element(&element.tag) {
            let raw = read_raw_text(lexer, &element.tag);
            if !raw.is_empty() {
                element.children.push(Node::text(raw));
            }
            self.push_node(Node::Element(element));
            return;
        }

        self.stack.push(element);
    }

    fn close_element(&mut self, name: &str) {
        let Some(depth) = self.stack.iter().rposition(|open| open.tag == name) else {
            // Stray end tag (including `</br>` and friends)
            return;
        };

        while self.stack.len() > depth {
            self.pop_element();
        }
    }

    fn pop_element(&mut self) {
        if let Some(element) = self.stack.pop() {
            self.push_node(Node::Element(element));
        }
    }

    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.nodes.push(node),
        }
    }

    /// Append text, merging with a preceding text node
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let siblings = match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.nodes,
        };

        if let Some(Node::Text { content }) = siblings.last_mut() {
            content.push_str(text);
        } else {
            siblings.push(Node::text(text));
        }
    }

    fn parse_start_tag(&mut self, raw: &str, pos: usize) -> StartTag {
        let inner = raw
            .strip_prefix('<')
            .unwrap_or(raw)
            .strip_suffix('>')
            .unwrap_or(raw);

        let name_end = inner
            .find(|c: char| c.is_ascii_whitespace() || c == '/')
            .unwrap_or(inner.len());
        let name = inner[..name_end].to_ascii_lowercase();
        let rest = &inner[name_end..];
        let rest_offset = pos + 1 + name_end;

        let mut attributes: Vec<Attribute> = Vec::new();
        let mut pending: Option<String> = None;
        let mut self_closing = false;
        let mut lexer = AttrToken::lexer(rest);

        while let Some(token) = lexer.next() {
            match token {
                Ok(AttrToken::Name(attr_name)) => {
                    if let Some(previous) = pending.take() {
                        add_attribute(&mut attributes, previous, String::new());
                    }
                    pending = Some(attr_name.to_ascii_lowercase());
                    self_closing = false;
                }
                Ok(AttrToken::Equals) => {
                    let value_start = rest_offset + lexer.span().end;
                    let raw_value = read_attribute_value(&mut lexer);
                    let value = entities::decode(raw_value, value_start, &mut self.diagnostics);
                    if let Some(attr_name) = pending.take() {
                        add_attribute(&mut attributes, attr_name, value);
                    }
                    self_closing = false;
                }
                Ok(AttrToken::Slash) => self_closing = true,
                Ok(AttrToken::Quoted(_)) | Err(()) => self_closing = false,
            }
        }

        if let Some(attr_name) = pending {
            add_attribute(&mut attributes, attr_name, String::new());
        }

        StartTag {
            name,
            attributes,
            self_closing,
        }
    }
}

/// Duplicate attributes keep their first value
fn add_attribute(attributes: &mut Vec<Attribute>, name: String, value: String) {
    if !attributes.iter().any(|attr| attr.name == name) {
        attributes.push(Attribute { name, value });
    }
}

fn read_attribute_value<'src>(lexer: &mut Lexer<'src, AttrToken<'src>>) -> &'src str {
    let rest = lexer.remainder();
    let trimmed = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());

    if trimmed.starts_with('"') || trimmed.starts_with('\'') {
        return match lexer.next() {
            Some(Ok(AttrToken::Quoted(value))) => value,
            _ => "",
        };
    }

    let skipped = rest.len() - trimmed.len();
    let end = trimmed
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(trimmed.len());
    lexer.bump(skipped + end);
    &trimmed[..end]
}

/// Consume everything up to and including `</tag ...>`, returning the content
fn read_raw_text<'src>(lexer: &mut Lexer<'src, Token<'src>>, tag: &str) -> &'src str {
    let rest = lexer.remainder();
    let needle = format!("</{}", tag);
    let lowered = rest.to_ascii_lowercase();

    match lowered.find(&needle) {
        Some(start) => {
            let close = lowered[start..]
                .find('>')
                .map(|gt| start + gt + 1)
                .unwrap_or(rest.len());
            lexer.bump(close);
            &rest[..start]
        }
        None => {
            lexer.bump(rest.len());
            rest
        }
    }
}

/// Parse markup leniently, discarding diagnostics
pub fn parse(source: &str) -> Fragment {
    Parser::new(source).parse().0
}

/// Parse markup and return its first root element
pub fn parse_element(source: &str) -> ParseResult<Element> {
    parse(source)
        .into_first_element()
        .ok_or(ParseError::NoRootElement)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(source: &str) -> Element {
        parse_element(source).unwrap()
    }

    #[test]
    fn test_parse_nested_elements() {
        let div = root(r#"<div id="main"><p>Hello <strong>there</strong></p></div>"#);
        assert_eq!(div.tag, "div");
        assert_eq!(div.attribute("id"), Some("main"));

        let p = div.children[0].as_element().unwrap();
        assert_eq!(p.children[0], Node::text("Hello "));
        assert_eq!(p.children[1].as_element().unwrap().tag, "strong");
    }

    #[test]
    fn test_void_and_self_closing() {
        let fragment = parse(r#"<hr style="margin: 0" /><img src="a.png"><div/><p>x</p>"#);
        let tags: Vec<_> = fragment
            .nodes
            .iter()
            .map(|n| n.as_element().unwrap().tag.as_str())
            .collect();
        assert_eq!(tags, vec!["hr", "img", "div", "p"]);
        assert_eq!(
            fragment.nodes[0].as_element().unwrap().attribute("style"),
            Some("margin: 0")
        );
    }

    #[test]
    fn test_unquoted_and_boolean_attributes() {
        let a = root("<a href=https://example.com/x target=_blank download>go</a>");
        assert_eq!(a.attribute("href"), Some("https://example.com/x"));
        assert_eq!(a.attribute("target"), Some("_blank"));
        assert_eq!(a.attribute("download"), Some(""));
    }

    #[test]
    fn test_uppercase_names_lowercased() {
        let td = root(r#"<TD COLSPAN="2">x</TD>"#);
        assert_eq!(td.tag, "td");
        assert_eq!(td.attribute("colspan"), Some("2"));
    }

    #[test]
    fn test_duplicate_attribute_keeps_first() {
        let p = root(r#"<p class="a" class="b"></p>"#);
        assert_eq!(p.attributes.len(), 1);
        assert_eq!(p.attribute("class"), Some("a"));
    }

    #[test]
    fn test_implicit_list_item_close() {
        let ul = root("<ul><li>one<li>two</ul>");
        assert_eq!(ul.children.len(), 2);
    }

    #[test]
    fn test_implicit_table_cells() {
        let table = root("<table><tr><td>a<td>b<tr><td>c</table>");
        assert_eq!(table.children.len(), 2);
        let first_row = table.children[0].as_element().unwrap();
        assert_eq!(first_row.children.len(), 2);
    }

    #[test]
    fn test_paragraph_closed_by_block() {
        let fragment = parse("<p>one<div>two</div>");
        assert_eq!(fragment.nodes.len(), 2);
    }

    #[test]
    fn test_stray_end_tag_ignored() {
        let div = root("<div>a</span>b</div>");
        assert_eq!(div.children, vec![Node::text("ab")]);
    }

    #[test]
    fn test_unclosed_elements_closed_at_eof() {
        let div = root("<div><span>x");
        assert_eq!(div.children.len(), 1);
    }

    #[test]
    fn test_style_content_is_raw() {
        let style = root("<style>p > a { color: red; } &amp;</style><p>x</p>");
        assert_eq!(style.children, vec![Node::text("p > a { color: red; } &amp;")]);
    }

    #[test]
    fn test_entities_decoded() {
        let a = root(r#"<a title="Tom &amp; Jerry">1 &lt; 2</a>"#);
        assert_eq!(a.attribute("title"), Some("Tom & Jerry"));
        assert_eq!(a.children, vec![Node::text("1 < 2")]);
    }

    #[test]
    fn test_comments_and_doctype() {
        let fragment = parse("<!DOCTYPE html><!-- note --><p>x</p>");
        assert_eq!(fragment.nodes[0], Node::comment(" note "));
        assert_eq!(fragment.nodes.len(), 2);
    }

    #[test]
    fn test_no_root_element() {
        assert_eq!(parse_element("just text"), Err(ParseError::NoRootElement));
        assert_eq!(parse_element(""), Err(ParseError::NoRootElement));
    }

    #[test]
    fn test_unterminated_tag_diagnostic() {
        let (fragment, diagnostics) = Parser::new("ok <div class=\"x\"").parse();
        assert_eq!(diagnostics, vec![ParseError::unterminated_tag(3)]);
        assert!(fragment.first_element().is_none());
    }

    #[test]
    fn test_closes_implicitly_table() {
        assert!(closes_implicitly("li", "li"));
        assert!(closes_implicitly("td", "tr"));
        assert!(closes_implicitly("p", "div"));
        assert!(!closes_implicitly("li", "p"));
        assert!(!closes_implicitly("td", "table"));
        assert!(!closes_implicitly("body", "p"));
    }
}
