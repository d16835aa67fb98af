use crate::span::Span;
use crate::types::Type;

/// A complete source file: an ordered sequence of top-level declarations.
#[derive(Debug, Clone)]
pub struct Program {
    pub decls: Vec<Decl>,
}

/// A type expression as written in source — either a bare type name or a
/// `->`-separated list. The parser folds a single-element list down to its
/// sole child, so a `Node` reaching the checker always has at least two.
#[derive(Debug, Clone)]
pub enum TypeExpr {
    Name { span: Span, name: String },
    Node { span: Span, children: Vec<TypeExpr> },
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Name { span, .. } | TypeExpr::Node { span, .. } => *span,
        }
    }
}

/// One parameter of a lambda: a name and its declared type.
#[derive(Debug, Clone)]
pub struct LambdaParam {
    pub span: Span,
    pub name: String,
    pub type_expr: TypeExpr,
}

/// An expression node. The last three variants are produced only by lowering
/// (§4.4): a fully parsed tree never contains them, and a fully lowered tree
/// never contains `IntLit`/`BoolLit`/`CharLit`/`VarName`.
#[derive(Debug, Clone)]
pub enum Expr {
    IntLit { span: Span, value: i32 },
    BoolLit { span: Span, value: bool },
    CharLit { span: Span, value: char },
    VarName { span: Span, name: String },
    Appl { span: Span, children: Vec<Expr> },
    Cond {
        span: Span,
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Lambda {
        span: Span,
        params: Vec<LambdaParam>,
        body: Box<Expr>,
    },
    /// Reserved by the grammar (`let`/`in` are keywords) but never produced
    /// by the parser — see the parser's handling of `Token::Let`. Kept here,
    /// and handled by every later pass, purely for completeness of the node
    /// kind enumerated by the language.
    Let {
        span: Span,
        decls: Vec<Decl>,
        body: Box<Expr>,
    },
    /// A literal payload, folded in by lowering: the source integer, 0/1 for
    /// a boolean, or a char's code point.
    Val { span: Span, value: i32 },
    /// A lambda argument, addressed by De Bruijn-style depth from lowering.
    Arg { span: Span, index: i32 },
    /// A slot in the evaluator's append-only global table.
    Global { span: Span, index: i32 },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::IntLit { span, .. }
            | Expr::BoolLit { span, .. }
            | Expr::CharLit { span, .. }
            | Expr::VarName { span, .. }
            | Expr::Appl { span, .. }
            | Expr::Cond { span, .. }
            | Expr::Lambda { span, .. }
            | Expr::Let { span, .. }
            | Expr::Val { span, .. }
            | Expr::Arg { span, .. }
            | Expr::Global { span, .. } => *span,
        }
    }

    /// True once lowering has replaced every name-bearing node below this
    /// one — used by the "lowering completeness" property test.
    pub fn is_fully_lowered(&self) -> bool {
        match self {
            Expr::IntLit { .. } | Expr::BoolLit { .. } | Expr::CharLit { .. } | Expr::VarName { .. } => false,
            Expr::Val { .. } | Expr::Arg { .. } | Expr::Global { .. } => true,
            Expr::Appl { children, .. } => children.iter().all(Expr::is_fully_lowered),
            Expr::Cond { cond, then_branch, else_branch, .. } => {
                cond.is_fully_lowered() && then_branch.is_fully_lowered() && else_branch.is_fully_lowered()
            }
            Expr::Lambda { body, .. } => body.is_fully_lowered(),
            Expr::Let { decls, body, .. } => {
                decls.iter().all(Decl::is_fully_lowered) && body.is_fully_lowered()
            }
        }
    }
}

/// A top-level (or let-bound) declaration.
#[derive(Debug, Clone)]
pub enum Decl {
    /// `name_span` is the `TypeName` token's own position, one token after
    /// `span`'s leading `data` keyword — the position a redefinition
    /// diagnostic for this name is reported at.
    TypeAlias { span: Span, name_span: Span, name: String, type_expr: TypeExpr },
    TypeAssign { span: Span, name: String, type_expr: TypeExpr },
    ValueAssign { span: Span, name: String, expr: Expr },
    /// A bare top-level expression. `result_type` is `Type::Undefined` until
    /// the checker records the expression's type on it.
    Output { span: Span, expr: Expr, result_type: Type },
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::TypeAlias { span, .. }
            | Decl::TypeAssign { span, .. }
            | Decl::ValueAssign { span, .. }
            | Decl::Output { span, .. } => *span,
        }
    }

    pub fn is_fully_lowered(&self) -> bool {
        match self {
            Decl::TypeAlias { .. } | Decl::TypeAssign { .. } => true,
            Decl::ValueAssign { expr, .. } | Decl::Output { expr, .. } => expr.is_fully_lowered(),
        }
    }
}
