use std::rc::Rc;

use yac_core::BUILTINS;

use crate::context::Context;
use crate::globals::GlobalTable;
use crate::value::{Body, Closure, Value};

/// Seeds `globals` with the fifteen built-in operators at slots 0..=14, in
/// the exact order `yac_core::BUILTINS` enumerates them — the same order
/// the lowering pass assumes when it resolves a builtin name to a slot, so
/// the two can never disagree about which slot a name resolves to.
pub fn install(globals: &GlobalTable) {
    for builtin in BUILTINS {
        let closure = Closure {
            captured: Context::empty(),
            arity_remaining: builtin.arity as u32,
            body: Body::Builtin(native_fn(builtin.name)),
        };
        globals.push(Value::Closure(Rc::new(closure)));
    }
}

/// The native Rust implementation of one builtin. Reads its arguments from
/// `captured` by position: for a binary operator the first-applied
/// parameter sits at `index(1)` and the second-applied at `index(0)` (the
/// most recently `cons`ed argument is always at the head), which is the same
/// convention lowering's De Bruijn indices use for lambda parameters.
fn native_fn(name: &str) -> fn(&Context) -> i32 {
    match name {
        "negate" => |ctx| -ctx.index(0).as_val(),
        "not" => |ctx| i32::from(ctx.index(0).as_val() == 0),
        "add" => |ctx| ctx.index(1).as_val() + ctx.index(0).as_val(),
        "sub" => |ctx| ctx.index(1).as_val() - ctx.index(0).as_val(),
        "mul" => |ctx| ctx.index(1).as_val() * ctx.index(0).as_val(),
        // Division and modulo by zero propagate Rust's native panic, per
        // the language's documented (unguarded) behavior for this case.
        "div" => |ctx| ctx.index(1).as_val() / ctx.index(0).as_val(),
        "mod" => |ctx| ctx.index(1).as_val() % ctx.index(0).as_val(),
        "eq" => |ctx| i32::from(ctx.index(1).as_val() == ctx.index(0).as_val()),
        "neq" => |ctx| i32::from(ctx.index(1).as_val() != ctx.index(0).as_val()),
        "lt" => |ctx| i32::from(ctx.index(1).as_val() < ctx.index(0).as_val()),
        "gt" => |ctx| i32::from(ctx.index(1).as_val() > ctx.index(0).as_val()),
        "leq" => |ctx| i32::from(ctx.index(1).as_val() <= ctx.index(0).as_val()),
        "geq" => |ctx| i32::from(ctx.index(1).as_val() >= ctx.index(0).as_val()),
        "and" => |ctx| i32::from(ctx.index(1).as_val() != 0 && ctx.index(0).as_val() != 0),
        "or" => |ctx| i32::from(ctx.index(1).as_val() != 0 || ctx.index(0).as_val() != 0),
        other => unreachable!("`{other}` is not one of the fifteen builtins"),
    }
}
