//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] mosaic_parser::ParseError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("No node at path {0}")]
    PathNotFound(String),

    #[error("Nothing is selected")]
    NoSelection,
}
