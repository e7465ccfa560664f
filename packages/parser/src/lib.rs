//! # Mosaic Markup Parser
//!
//! Tokenizer, lenient tree builder and serializer for the markup edited by
//! Mosaic, plus the pretty-printer and highlighter behind the code view.
//!
//! ## Design Principles
//!
//! - **Lenient**: any input produces a fragment; problems become diagnostics
//! - **Stable**: serializing a parsed fragment and parsing it again is a no-op
//! - **Plain data**: the AST is owned, cloneable and serde-serializable

pub mod ast;
pub mod entities;
pub mod error;
pub mod highlight;
pub mod parser;
pub mod pretty;
pub mod serializer;
pub mod tokenizer;

#[cfg(test)]
mod tests_serializer;

pub use ast::{Attribute, Element, Fragment, Node};
pub use error::{ParseError, ParseResult};
pub use parser::{closes_implicitly, parse, parse_element, Parser};
pub use pretty::{prettify, prettify_with_indent};
pub use serializer::{serialize, serialize_element, Serializer};
pub use tokenizer::{is_attribute_name, tokenize, Token};
