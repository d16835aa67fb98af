use crate::span::{Position, Span};

/// The three fatal diagnostic kinds a Yac compilation can produce. Compilation
/// halts at the first one: there is no accumulation and no warnings channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{pos} - ParseError: {message}")]
    Parse { pos: Position, message: String },

    #[error("{pos} - TypeError: {message}")]
    Type { pos: Position, message: String },

    #[error("{pos} - DefineError: {message}")]
    Define { pos: Position, message: String },
}

impl Error {
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        Error::Parse {
            pos: span.start,
            message: message.into(),
        }
    }

    pub fn type_error(span: Span, message: impl Into<String>) -> Self {
        Error::Type {
            pos: span.start,
            message: message.into(),
        }
    }

    pub fn define_error(span: Span, message: impl Into<String>) -> Self {
        Error::Define {
            pos: span.start,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
