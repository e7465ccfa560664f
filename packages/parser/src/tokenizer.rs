use logos::{Lexer, Logos};
use std::fmt;

/// Token types for markup source
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    /// `<!-- ... -->`, carrying the comment body
    #[token("<!--", lex_comment)]
    Comment(&'src str),

    /// `<!DOCTYPE ...>` and `<![CDATA[...]>`-style declarations
    #[regex(r"<![a-zA-Z\[][^>]*>", |lex| lex.slice())]
    Declaration(&'src str),

    /// `<?xml ...?>`
    #[regex(r"<\?[^>]*>", |lex| lex.slice())]
    ProcessingInstruction(&'src str),

    /// Complete start tag including attributes, e.g. `<a href="x">`
    #[regex(r"<[a-zA-Z][a-zA-Z0-9:_-]*", lex_start_tag)]
    StartTag(&'src str),

    /// End tag, carrying the tag name
    #[regex(r"</[a-zA-Z][a-zA-Z0-9:_-]*[ \t\r\n]*>", |lex| end_tag_name(lex.slice()))]
    EndTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    /// A `<` that does not open a tag
    #[token("<")]
    LessThan,
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Comment(body) => write!(f, "<!--{}-->", body),
            Token::Declaration(raw) | Token::ProcessingInstruction(raw) | Token::StartTag(raw) => {
                f.write_str(raw)
            }
            Token::EndTag(name) => write!(f, "</{}>", name),
            Token::Text(text) => f.write_str(text),
            Token::LessThan => f.write_str("<"),
        }
    }
}

fn lex_comment<'src>(lex: &mut Lexer<'src, Token<'src>>) -> &'src str {
    let rest = lex.remainder();
    match rest.find("-->") {
        Some(end) => {
            lex.bump(end + 3);
            &rest[..end]
        }
        None => {
            // Unterminated comments swallow the rest of the input
            lex.bump(rest.len());
            rest
        }
    }
}

/// Scan to the `>` closing a start tag, skipping over quoted attribute values
fn lex_start_tag<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Option<&'src str> {
    let rest = lex.remainder();
    let mut quote: Option<char> = None;

    for (i, c) in rest.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '>' => {
                    lex.bump(i + 1);
                    return Some(lex.slice());
                }
                _ => {}
            },
        }
    }

    None
}

fn end_tag_name(slice: &str) -> &str {
    slice[2..].trim_end_matches('>').trim_end()
}

/// Token types inside a start tag, after the tag name
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\x0C]+")]
pub enum AttrToken<'src> {
    #[regex(r#"[^ \t\r\n\x0C"'<>/=]+"#, |lex| lex.slice())]
    Name(&'src str),

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| unquote(lex.slice()))]
    #[regex(r"'[^']*'", |lex| unquote(lex.slice()))]
    Quoted(&'src str),

    #[token("/")]
    Slash,
}

/// Whether `name` lexes as a single attribute name inside a start tag
pub fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_ascii_whitespace()
                || c.is_control()
                || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

fn unquote(slice: &str) -> &str {
    &slice[1..slice.len() - 1]
}

/// Spanned token for error reporting
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'src> {
    pub token: Token<'src>,
    pub span: std::ops::Range<usize>,
}

/// Tokenize markup, turning lexer failures (unterminated start tags) into text
pub fn tokenize(source: &str) -> Vec<SpannedToken<'_>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let token = match result {
            Ok(token) => token,
            Err(()) => Token::Text(&source[span.clone()]),
        };
        tokens.push(SpannedToken { token, span });
    }

    tokens
}
