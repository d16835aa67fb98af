use std::rc::Rc;

use yac_core::{Decl, Expr, Program, Type};

use crate::builtins;
use crate::context::Context;
use crate::globals::GlobalTable;
use crate::value::{Body, Closure, Value};

/// Evaluates every declaration in a lowered `program` in source order and
/// returns the `(payload, type)` pair recorded for each output expression
/// (§4.6). Consumes nothing: the AST is only read, never mutated, by this
/// pass.
pub fn evaluate(program: &Program) -> Vec<(i32, Type)> {
    let globals = GlobalTable::new();
    builtins::install(&globals);

    let mut outputs = Vec::new();
    for decl in &program.decls {
        match decl {
            Decl::TypeAlias { .. } | Decl::TypeAssign { .. } => {}
            Decl::ValueAssign { expr, .. } => {
                let value = eval(expr, &Context::empty(), &globals);
                globals.push(value);
            }
            Decl::Output { expr, result_type, .. } => {
                let value = eval(expr, &Context::empty(), &globals);
                outputs.push((value.as_val(), result_type.clone()));
            }
        }
    }
    outputs
}

/// `eval(context) -> Value` for every lowered node kind (§4.5). `context`
/// addresses lambda arguments; `globals` addresses top-level (and
/// let-bound) slots. A name-bearing node (`VarName`/`IntLit`/`BoolLit`/
/// `CharLit`) reaching here means lowering's completeness invariant was
/// violated upstream.
pub fn eval(expr: &Expr, context: &Context, globals: &GlobalTable) -> Value {
    match expr {
        Expr::Val { value, .. } => Value::Val(*value),
        Expr::Arg { index, .. } => context.index(*index as usize),
        Expr::Global { index, .. } => globals.get(*index as usize),
        Expr::Lambda { params, body, .. } => Value::Closure(Rc::new(Closure {
            captured: context.clone(),
            arity_remaining: params.len() as u32,
            body: Body::Ast(Rc::new((**body).clone())),
        })),
        Expr::Appl { children, .. } => {
            let mut head = eval(&children[0], context, globals);
            for arg_expr in &children[1..] {
                let arg_value = eval(arg_expr, context, globals);
                head = head.apply(arg_value);
            }
            head.reduce(globals)
        }
        Expr::Cond { cond, then_branch, else_branch, .. } => {
            // Any primitive payload is a valid condition (§4.3): nonzero is
            // truthy, regardless of whether it encodes an int, bool, or char.
            if eval(cond, context, globals).as_val() != 0 {
                eval(then_branch, context, globals)
            } else {
                eval(else_branch, context, globals)
            }
        }
        Expr::Let { decls, body, .. } => {
            for decl in decls {
                match decl {
                    Decl::ValueAssign { expr, .. } => {
                        let value = eval(expr, &Context::empty(), globals);
                        globals.push(value);
                    }
                    Decl::TypeAlias { .. } | Decl::TypeAssign { .. } => {}
                    Decl::Output { .. } => unreachable!(
                        "the parser never emits a Let, so an output nested inside one is unreachable"
                    ),
                }
            }
            eval(body, context, globals)
        }
        Expr::IntLit { .. } | Expr::BoolLit { .. } | Expr::CharLit { .. } | Expr::VarName { .. } => {
            unreachable!("lowering completeness: no name-bearing node survives lowering")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Vec<(i32, Type)> {
        let mut program = yac_syntax::parse(src).unwrap();
        yac_compiler::check(&mut program).unwrap();
        yac_compiler::lower(&mut program);
        evaluate(&program)
    }

    #[test]
    fn s1_arithmetic() {
        assert_eq!(run("add 2 (mul 3 4)\n"), vec![(14, Type::Int)]);
    }

    #[test]
    fn s2_conditional_with_shadowing() {
        let out = run(indoc::indoc! {"
            x : Int
            x = 5
            if lt x 10 then 'y' else 'n'
        "});
        assert_eq!(out, vec![('y' as i32, Type::Char)]);
    }

    #[test]
    fn s3_lambda_and_partial_application() {
        let out = run(indoc::indoc! {"
            inc : Int -> Int
            inc = \\n : Int -> add n 1
            inc 41
        "});
        assert_eq!(out, vec![(42, Type::Int)]);
    }

    #[test]
    fn s4_higher_order() {
        let out = run(indoc::indoc! {"
            twice : (Int -> Int) -> Int -> Int
            twice = \\f : (Int -> Int) g : Int -> f (f g)
            twice (\\n : Int -> add n 3) 10
        "});
        assert_eq!(out, vec![(16, Type::Int)]);
    }

    #[test]
    fn s5_recursion_via_global_slot() {
        let out = run(indoc::indoc! {"
            fact : Int -> Int
            fact = \\n : Int -> if eq n 0 then 1 else mul n (fact (sub n 1))
            fact 5
        "});
        assert_eq!(out, vec![(120, Type::Int)]);
    }

    #[test]
    fn s6_type_alias_equivalence() {
        let out = run(indoc::indoc! {"
            data MyInt = Int
            x : MyInt
            x = 7
            add x 1
        "});
        assert_eq!(out, vec![(8, Type::Int)]);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let src = "fact : Int -> Int\nfact = \\n : Int -> if eq n 0 then 1 else mul n (fact (sub n 1))\nfact 6\n";
        assert_eq!(run(src), run(src));
    }

    #[test]
    fn recursion_terminates_like_an_eager_lambda_calculus_would() {
        let out = run(indoc::indoc! {"
            count_down : Int -> Int
            count_down = \\n : Int -> if eq n 0 then 0 else count_down (sub n 1)
            count_down 1000
        "});
        assert_eq!(out, vec![(0, Type::Int)]);
    }
}
