use std::rc::Rc;

use yac_core::Expr;

use crate::context::Context;

/// A runtime value (§3.4): either a saturated `i32` payload (encoding an
/// int, a 0/1 bool, or a char's code point) or a closure with zero or more
/// arguments still outstanding.
#[derive(Clone)]
pub enum Value {
    Val(i32),
    Closure(Rc<Closure>),
}

/// A function with `captured` already bound and `arity_remaining` parameters
/// still to come. `arity_remaining == 0` means `body` is ready to reduce.
pub struct Closure {
    pub captured: Context,
    pub arity_remaining: u32,
    pub body: Body,
}

/// What a saturated closure reduces by evaluating: either a lowered AST
/// subtree (a user lambda's body) or one of the 15 built-in operators,
/// which read their arguments out of `captured` by position instead of
/// walking an `Expr`.
#[derive(Clone)]
pub enum Body {
    Ast(Rc<Expr>),
    Builtin(fn(&Context) -> i32),
}

impl Value {
    /// Unwraps a `Val` payload. Every call site is reached only after
    /// checking has confirmed the value's type is primitive, so a `Closure`
    /// here would mean checking let an ill-typed program through.
    pub fn as_val(&self) -> i32 {
        match self {
            Value::Val(v) => *v,
            Value::Closure(_) => unreachable!("checker guarantees a primitive-typed value here"),
        }
    }

    /// `Closure.apply` from §4.5: binds one more argument, call-by-value (the
    /// caller has already evaluated `arg`).
    pub fn apply(self, arg: Value) -> Value {
        match self {
            Value::Closure(closure) => Value::Closure(Rc::new(Closure {
                captured: closure.captured.cons(arg),
                arity_remaining: closure
                    .arity_remaining
                    .checked_sub(1)
                    .expect("checker guarantees a closure is never over-applied"),
                body: closure.body.clone(),
            })),
            Value::Val(_) => unreachable!("checker guarantees only functions are applied"),
        }
    }

    /// Reduces a saturated closure by evaluating its body; anything else
    /// (a `Val`, or a closure still missing arguments) is already final.
    pub fn reduce(self, globals: &crate::globals::GlobalTable) -> Value {
        match self {
            Value::Closure(ref closure) if closure.arity_remaining == 0 => match &closure.body {
                Body::Ast(body) => crate::eval::eval(body, &closure.captured, globals),
                Body::Builtin(f) => Value::Val(f(&closure.captured)),
            },
            other => other,
        }
    }
}
