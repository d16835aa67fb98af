use logos::Logos;

/// Token kinds produced by the lexer. Exact keyword tokens take priority
/// over the identifier regexes by logos's own longest-match-then-priority
/// rule, so `if`/`then`/`else`/`let`/`in`/`data`/`True`/`False` never reach
/// the caller as `LowerIdentifier`/`UpperIdentifier`.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
pub enum Token<'src> {
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token("->")]
    Arrow,
    #[token("\\")]
    Backslash,

    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("let")]
    Let,
    #[token("in")]
    In,
    #[token("data")]
    Data,
    #[token("True")]
    True,
    #[token("False")]
    False,

    #[regex(r"-?[0-9]+")]
    IntLit(&'src str),

    #[regex(r"'(?:[^'\\]|\\.)'")]
    CharLit(&'src str),

    #[regex(r"[A-Z][A-Za-z0-9_]*")]
    UpperIdent(&'src str),

    #[regex(r"[a-z][A-Za-z0-9_]*")]
    LowerIdent(&'src str),

    #[regex(r"--[^\n]*", logos::skip)]
    LineComment,

    #[token("\n")]
    Newline,

    Unknown(&'src str),
}

/// A `(Token, byte_span)` pair, the unit the parser consumes.
#[derive(Clone)]
pub struct Spanned<'src> {
    pub token: Token<'src>,
    pub span: std::ops::Range<usize>,
}

/// Collects the whole token stream up front, coalescing consecutive lex
/// failures into a single `Unknown` fragment the same way the original
/// PEG engine reports one "unexpected character" span rather than one per
/// byte.
pub fn tokenize(src: &str) -> Vec<Spanned<'_>> {
    let mut lexer = Token::lexer(src);
    let mut out = Vec::new();
    let mut error_span: Option<std::ops::Range<usize>> = None;

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => {
                if let Some(span) = error_span.take() {
                    out.push(Spanned {
                        token: Token::Unknown(&src[span.clone()]),
                        span,
                    });
                }
                out.push(Spanned {
                    token,
                    span: lexer.span(),
                });
            }
            Err(()) => {
                let span = lexer.span();
                match &mut error_span {
                    None => error_span = Some(span),
                    Some(existing) => existing.end = span.end,
                }
            }
        }
    }
    if let Some(span) = error_span.take() {
        out.push(Spanned {
            token: Token::Unknown(&src[span.clone()]),
            span,
        });
    }
    out
}

/// Converts byte offsets into 1-based line/column `Position`s, counting
/// columns in bytes from the start of their line.
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(src: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in src.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        LineIndex { line_starts }
    }

    pub fn position(&self, offset: usize) -> yac_core::Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let column = offset - self.line_starts[line];
        yac_core::Position {
            line: (line + 1) as u32,
            column: (column + 1) as u32,
        }
    }
}
