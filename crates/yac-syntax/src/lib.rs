//! Lexing and parsing: turns Yac source text into the `yac-core` AST.
//!
//! The grammar is a straightforward recursive descent over a flat token
//! stream (no concrete syntax tree, no parent pointers) — declarations are
//! newline-separated, expressions fold left-associative application, and
//! `if`/lambda headers tolerate line breaks the way the original PEG
//! grammar's cross-line separator does.

mod error;
mod lexer;
mod parser;

pub use error::{Result, SyntaxError};
pub use lexer::{tokenize, LineIndex, Spanned, Token};
pub use parser::parse;
