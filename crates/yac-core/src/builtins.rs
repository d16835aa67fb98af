use crate::types::Type;

/// One of the 15 operators seeded into the global table before any
/// user declaration is processed. `arity` is the number of parameters
/// (never counting the result), matching `Type::function`'s convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
}

/// Seeded in this exact order at global slots 0..=14. The lowering pass and
/// the evaluator both iterate this list to assign/read those slots, so the
/// two passes can never disagree about which slot a name resolves to.
///
/// This is the order the global table is actually built in,
/// negate/add/sub/mul/div/mod before the comparisons, and/or before not —
/// not the order the language's operator list happens to be written in.
pub const BUILTINS: &[Builtin] = &[
    Builtin { name: "negate", arity: 1 },
    Builtin { name: "add", arity: 2 },
    Builtin { name: "sub", arity: 2 },
    Builtin { name: "mul", arity: 2 },
    Builtin { name: "div", arity: 2 },
    Builtin { name: "mod", arity: 2 },
    Builtin { name: "eq", arity: 2 },
    Builtin { name: "neq", arity: 2 },
    Builtin { name: "lt", arity: 2 },
    Builtin { name: "gt", arity: 2 },
    Builtin { name: "leq", arity: 2 },
    Builtin { name: "geq", arity: 2 },
    Builtin { name: "and", arity: 2 },
    Builtin { name: "or", arity: 2 },
    Builtin { name: "not", arity: 1 },
];

/// The declared type of a builtin by name. Panics if `name` isn't one of
/// [`BUILTINS`] — callers look a name up in `BUILTINS` (or a chain map
/// seeded from it) before ever reaching here.
pub fn builtin_type(name: &str) -> Type {
    match name {
        "negate" => Type::function(vec![Type::Int, Type::Int]),
        "not" => Type::function(vec![Type::Bool, Type::Bool]),
        "add" | "sub" | "mul" | "div" | "mod" => {
            Type::function(vec![Type::Int, Type::Int, Type::Int])
        }
        "eq" | "neq" | "lt" | "gt" | "leq" | "geq" => {
            Type::function(vec![Type::Int, Type::Int, Type::Bool])
        }
        "and" | "or" => Type::function(vec![Type::Bool, Type::Bool, Type::Bool]),
        other => panic!("`{other}` is not a builtin"),
    }
}
