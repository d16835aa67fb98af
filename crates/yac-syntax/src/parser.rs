use std::ops::Range;

use yac_core::{Decl, Expr, LambdaParam, Program, Span, Type, TypeExpr};

use crate::error::{Result, SyntaxError};
use crate::lexer::{tokenize, LineIndex, Spanned, Token};

/// Parses a complete source file into a [`Program`].
pub fn parse(src: &str) -> Result<Program> {
    let tokens = tokenize(src);
    let line_index = LineIndex::new(src);
    let mut parser = Parser {
        tokens,
        pos: 0,
        line_index,
        src_len: src.len(),
    };
    parser.parse_program()
}

fn starts_atom(token: &Token) -> bool {
    matches!(
        token,
        Token::IntLit(_)
            | Token::CharLit(_)
            | Token::True
            | Token::False
            | Token::LowerIdent(_)
            | Token::ParenOpen
    )
}

struct Parser<'src> {
    tokens: Vec<Spanned<'src>>,
    pos: usize,
    line_index: LineIndex,
    src_len: usize,
}

impl<'src> Parser<'src> {
    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token<'src>> {
        self.tokens.get(self.pos + offset).map(|s| &s.token)
    }

    fn bump(&mut self) -> Spanned<'src> {
        let spanned = self.tokens[self.pos].clone();
        self.pos += 1;
        spanned
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek(), Some(Token::Newline)) {
            self.pos += 1;
        }
    }

    fn to_span(&self, range: Range<usize>) -> Span {
        Span::new(self.line_index.position(range.start), self.line_index.position(range.end))
    }

    /// The span of whatever sits at the current position, or of end-of-file
    /// if the token stream is exhausted, for attaching to a parse error.
    fn here_span(&self) -> Span {
        match self.tokens.get(self.pos) {
            Some(spanned) => self.to_span(spanned.span.clone()),
            None => self.to_span(self.src_len..self.src_len),
        }
    }

    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.here_span(), message.into())
    }

    fn expect_lower_ident(&mut self) -> Result<(Span, String)> {
        match self.peek() {
            Some(Token::LowerIdent(name)) => {
                let name = name.to_string();
                let spanned = self.bump();
                Ok((self.to_span(spanned.span), name))
            }
            _ => Err(self.error_here("expected a variable name")),
        }
    }

    fn expect_upper_ident(&mut self) -> Result<(Span, String)> {
        match self.peek() {
            Some(Token::UpperIdent(name)) => {
                let name = name.to_string();
                let spanned = self.bump();
                Ok((self.to_span(spanned.span), name))
            }
            _ => Err(self.error_here("expected a type name")),
        }
    }

    fn expect(&mut self, wanted: Token<'static>, desc: &str) -> Result<Span> {
        let matches_wanted = match (self.peek(), &wanted) {
            (Some(Token::Colon), Token::Colon) => true,
            (Some(Token::Equals), Token::Equals) => true,
            (Some(Token::Arrow), Token::Arrow) => true,
            (Some(Token::ParenOpen), Token::ParenOpen) => true,
            (Some(Token::ParenClose), Token::ParenClose) => true,
            (Some(Token::Then), Token::Then) => true,
            (Some(Token::Else), Token::Else) => true,
            (Some(Token::Newline), Token::Newline) => true,
            _ => false,
        };
        if matches_wanted {
            let spanned = self.bump();
            Ok(self.to_span(spanned.span))
        } else {
            Err(self.error_here(format!("expected {desc}")))
        }
    }

    fn parse_program(&mut self) -> Result<Program> {
        self.skip_newlines();
        let mut decls = Vec::new();
        while self.peek().is_some() {
            decls.push(self.parse_decl()?);
            if self.peek().is_some() {
                self.expect(Token::Newline, "a newline after the declaration")?;
                self.skip_newlines();
            }
        }
        Ok(Program { decls })
    }

    fn parse_decl(&mut self) -> Result<Decl> {
        match self.peek() {
            Some(Token::Data) => self.parse_type_alias(),
            Some(Token::LowerIdent(_)) => match self.peek_at(1) {
                Some(Token::Colon) => self.parse_type_assign(),
                Some(Token::Equals) => self.parse_value_assign(),
                _ => self.parse_output(),
            },
            Some(_) => self.parse_output(),
            None => Err(self.error_here("expected a declaration")),
        }
    }

    fn parse_type_alias(&mut self) -> Result<Decl> {
        let data_span = self.to_span(self.bump().span);
        let (name_span, name) = self.expect_upper_ident()?;
        self.expect(Token::Equals, "`=`")?;
        self.skip_newlines();
        let type_expr = self.parse_type()?;
        Ok(Decl::TypeAlias {
            span: data_span.to(type_expr.span()),
            name_span,
            name,
            type_expr,
        })
    }

    fn parse_type_assign(&mut self) -> Result<Decl> {
        let (name_span, name) = self.expect_lower_ident()?;
        self.expect(Token::Colon, "`:`")?;
        self.skip_newlines();
        let type_expr = self.parse_type()?;
        Ok(Decl::TypeAssign {
            span: name_span.to(type_expr.span()),
            name,
            type_expr,
        })
    }

    fn parse_value_assign(&mut self) -> Result<Decl> {
        let (name_span, name) = self.expect_lower_ident()?;
        self.expect(Token::Equals, "`=`")?;
        self.skip_newlines();
        let expr = self.parse_expression()?;
        Ok(Decl::ValueAssign {
            span: name_span.to(expr.span()),
            name,
            expr,
        })
    }

    fn parse_output(&mut self) -> Result<Decl> {
        let expr = self.parse_expression()?;
        Ok(Decl::Output {
            span: expr.span(),
            expr,
            result_type: Type::Undefined,
        })
    }

    fn parse_type(&mut self) -> Result<TypeExpr> {
        let mut components = vec![self.parse_type_atom()?];
        while matches!(self.peek(), Some(Token::Arrow)) {
            self.bump();
            self.skip_newlines();
            components.push(self.parse_type_atom()?);
        }
        if components.len() == 1 {
            Ok(components.pop().expect("just checked len == 1"))
        } else {
            let span = components[0].span().to(components.last().expect("non-empty").span());
            Ok(TypeExpr::Node { span, children: components })
        }
    }

    fn parse_type_atom(&mut self) -> Result<TypeExpr> {
        match self.peek() {
            Some(Token::ParenOpen) => {
                let open_span = self.to_span(self.bump().span);
                self.skip_newlines();
                let inner = self.parse_type()?;
                self.skip_newlines();
                let close_span = self.expect(Token::ParenClose, "`)`")?;
                let span = open_span.to(close_span);
                Ok(match inner {
                    TypeExpr::Name { name, .. } => TypeExpr::Name { span, name },
                    TypeExpr::Node { children, .. } => TypeExpr::Node { span, children },
                })
            }
            Some(Token::UpperIdent(_)) => {
                let (span, name) = self.expect_upper_ident()?;
                Ok(TypeExpr::Name { span, name })
            }
            _ => Err(self.error_here("expected a type name or `(`")),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::If) => self.parse_cond(),
            Some(Token::Backslash) => self.parse_lambda(),
            Some(Token::Let) => Err(self.error_here("`let` expressions are not supported")),
            _ => self.parse_application(),
        }
    }

    fn parse_application(&mut self) -> Result<Expr> {
        let mut atoms = vec![self.parse_atom()?];
        while self.peek().is_some_and(starts_atom) {
            atoms.push(self.parse_atom()?);
        }
        if atoms.len() == 1 {
            Ok(atoms.pop().expect("just checked len == 1"))
        } else {
            let span = atoms[0].span().to(atoms.last().expect("non-empty").span());
            Ok(Expr::Appl { span, children: atoms })
        }
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::IntLit(text)) => {
                let value = parse_int_literal(text);
                let spanned = self.bump();
                Ok(Expr::IntLit { span: self.to_span(spanned.span), value })
            }
            Some(Token::CharLit(text)) => {
                let value = parse_char_literal(text)
                    .ok_or_else(|| self.error_here(format!("invalid char literal {text}")))?;
                let spanned = self.bump();
                Ok(Expr::CharLit { span: self.to_span(spanned.span), value })
            }
            Some(Token::True) => {
                let spanned = self.bump();
                Ok(Expr::BoolLit { span: self.to_span(spanned.span), value: true })
            }
            Some(Token::False) => {
                let spanned = self.bump();
                Ok(Expr::BoolLit { span: self.to_span(spanned.span), value: false })
            }
            Some(Token::LowerIdent(name)) => {
                let name = name.to_string();
                let spanned = self.bump();
                Ok(Expr::VarName { span: self.to_span(spanned.span), name })
            }
            Some(Token::ParenOpen) => {
                self.bump();
                self.skip_newlines();
                let inner = self.parse_expression()?;
                self.skip_newlines();
                self.expect(Token::ParenClose, "`)`")?;
                Ok(inner)
            }
            _ => Err(self.error_here("expected an expression")),
        }
    }

    fn parse_cond(&mut self) -> Result<Expr> {
        let if_span = self.to_span(self.bump().span);
        self.skip_newlines();
        let cond = Box::new(self.parse_expression()?);
        self.skip_newlines();
        self.expect(Token::Then, "`then`")?;
        self.skip_newlines();
        let then_branch = Box::new(self.parse_expression()?);
        self.skip_newlines();
        self.expect(Token::Else, "`else`")?;
        self.skip_newlines();
        let else_branch = Box::new(self.parse_expression()?);
        let span = if_span.to(else_branch.span());
        Ok(Expr::Cond { span, cond, then_branch, else_branch })
    }

    fn parse_lambda(&mut self) -> Result<Expr> {
        let backslash_span = self.to_span(self.bump().span);
        self.skip_newlines();
        let mut params = vec![self.parse_lambda_param()?];
        loop {
            self.skip_newlines();
            if matches!(self.peek(), Some(Token::LowerIdent(_))) {
                params.push(self.parse_lambda_param()?);
            } else {
                break;
            }
        }
        self.skip_newlines();
        self.expect(Token::Arrow, "`->`")?;
        self.skip_newlines();
        let body = Box::new(self.parse_expression()?);
        let span = backslash_span.to(body.span());
        Ok(Expr::Lambda { span, params, body })
    }

    fn parse_lambda_param(&mut self) -> Result<LambdaParam> {
        let (name_span, name) = self.expect_lower_ident()?;
        self.skip_newlines();
        self.expect(Token::Colon, "`:`")?;
        self.skip_newlines();
        let type_expr = self.parse_type_atom()?;
        Ok(LambdaParam {
            span: name_span.to(type_expr.span()),
            name,
            type_expr,
        })
    }
}

/// Digit-by-digit accumulation that masks to 31 bits after *every* digit
/// (not just on final overflow), then negates at the end — rather than
/// rejecting out-of-range literals. A plain wrapping `i32` accumulation is
/// not equivalent: the mask-after-each-digit recurrence diverges from two's
/// complement wraparound for long literals.
fn parse_int_literal(text: &str) -> i32 {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let mut value: u64 = 0;
    for byte in digits.bytes() {
        value = (value * 10 + (byte - b'0') as u64) & 0x7FFF_FFFF;
    }
    let value = value as i32;
    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

fn parse_char_literal(text: &str) -> Option<char> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    if let Some(escape) = inner.strip_prefix('\\') {
        let mut chars = escape.chars();
        let code = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Some(match code {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            '0' => '\0',
            _ => return None,
        })
    } else {
        let mut chars = inner.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl_count(src: &str) -> usize {
        parse(src).unwrap().decls.len()
    }

    #[test]
    fn parses_the_four_top_level_forms() {
        let program = parse(indoc::indoc! {"
            data MyInt = Int
            x : MyInt
            x = 7
            add x 1
        "})
        .unwrap();
        assert_eq!(program.decls.len(), 4);
        assert!(matches!(program.decls[0], Decl::TypeAlias { .. }));
        assert!(matches!(program.decls[1], Decl::TypeAssign { .. }));
        assert!(matches!(program.decls[2], Decl::ValueAssign { .. }));
        assert!(matches!(program.decls[3], Decl::Output { .. }));
    }

    #[test]
    fn application_does_not_cross_a_newline() {
        assert_eq!(decl_count("x\ny\n"), 2);
    }

    #[test]
    fn lambda_and_cond_allow_line_breaks_in_their_own_keywords() {
        let program = parse(indoc::indoc! {"
            \\x : Int
              -> x
            if True
            then 1
            else 2
        "})
        .unwrap();
        assert_eq!(program.decls.len(), 2);
    }

    #[test]
    fn negative_int_literal_wraps() {
        let program = parse("-5\n").unwrap();
        let Decl::Output { expr: Expr::IntLit { value, .. }, .. } = &program.decls[0] else {
            panic!("expected an int literal output");
        };
        assert_eq!(*value, -5);
    }

    #[test]
    fn long_int_literal_masks_to_31_bits_after_every_digit() {
        // Masking after each digit (31-bit accumulator) is not the same as
        // letting the whole accumulation wrap in i32 at the very end.
        let program = parse("878400575668\n").unwrap();
        let Decl::Output { expr: Expr::IntLit { value, .. }, .. } = &program.decls[0] else {
            panic!("expected an int literal output");
        };
        assert_eq!(*value, 79763636);
    }

    #[test]
    fn char_escape_newline() {
        let program = parse("'\\n'\n").unwrap();
        let Decl::Output { expr: Expr::CharLit { value, .. }, .. } = &program.decls[0] else {
            panic!("expected a char literal output");
        };
        assert_eq!(*value, '\n');
    }

    #[test]
    fn let_is_reserved_but_rejected() {
        assert!(parse("let x = 1 in x\n").is_err());
    }

    #[test]
    fn function_type_lambda_param_requires_parens() {
        assert!(parse("\\f : Int -> Int -> f 1\n").is_err());
        assert!(parse("\\f : (Int -> Int) -> f 1\n").is_ok());
    }
}
