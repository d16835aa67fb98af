use yac_core::{Error, Span};

/// A lex or parse failure, carrying only what the parser knows locally.
/// Converted to [`yac_core::Error::Parse`] at the boundary where a caller
/// outside this crate wants the unified diagnostic taxonomy.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub span: Span,
    pub message: String,
}

impl SyntaxError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        SyntaxError {
            span,
            message: message.into(),
        }
    }
}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Error {
        Error::parse(err.span, err.message)
    }
}

pub type Result<T> = std::result::Result<T, SyntaxError>;
