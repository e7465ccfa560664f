use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Markup contains no root element")]
    NoRootElement,

    #[error("Unterminated tag at {pos}")]
    UnterminatedTag { pos: usize },

    #[error("Invalid character reference at {pos}: {reference}")]
    InvalidReference { pos: usize, reference: String },
}

impl ParseError {
    pub fn unterminated_tag(pos: usize) -> Self {
        Self::UnterminatedTag { pos }
    }

    pub fn invalid_reference(pos: usize, reference: impl Into<String>) -> Self {
        Self::InvalidReference {
            pos,
            reference: reference.into(),
        }
    }
}
