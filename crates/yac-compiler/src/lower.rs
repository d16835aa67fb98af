use std::rc::Rc;

use yac_core::{ChainMap, Decl, Expr, Program, BUILTINS};

/// Rewrites a type-checked AST in place, replacing every `VarName`,
/// `IntLit`, `BoolLit`, `CharLit` with a positional node (`Val`, `Arg`, or
/// `Global`) the evaluator can address without a name lookup. Never fails:
/// by the time lowering runs, checking has already ruled out every
/// undefined or ill-typed construct.
pub fn lower(program: &mut Program) {
    let mut lowerer = Lowerer::new();
    for decl in &mut program.decls {
        lowerer.lower_decl(decl);
    }
}

struct Lowerer {
    /// Names bound to a literal value, for constant folding at use sites.
    val: Rc<ChainMap<i32>>,
    /// Names bound to a slot in the evaluator's global table.
    global: Rc<ChainMap<i32>>,
    /// Names bound to a lambda argument, keyed by the depth at which they
    /// were introduced (not yet converted to a De Bruijn index).
    arg: Rc<ChainMap<i32>>,
    global_count: i32,
    arg_count: i32,
}

impl Lowerer {
    fn new() -> Self {
        let global = ChainMap::new();
        for (slot, builtin) in BUILTINS.iter().enumerate() {
            global.set(builtin.name, slot as i32);
        }
        Lowerer {
            val: ChainMap::new(),
            global,
            arg: ChainMap::new(),
            global_count: BUILTINS.len() as i32,
            arg_count: 0,
        }
    }

    fn lower_decl(&mut self, decl: &mut Decl) {
        match decl {
            Decl::TypeAlias { .. } | Decl::TypeAssign { .. } => {}
            Decl::ValueAssign { name, expr, .. } => {
                let slot = self.global_count;
                self.global_count += 1;
                self.global.set(name.clone(), slot);
                self.lower_expr(expr);
                if let Expr::Val { value, .. } = expr {
                    self.val.set(name.clone(), *value);
                }
            }
            Decl::Output { expr, .. } => self.lower_expr(expr),
        }
    }

    fn lower_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::IntLit { span, value } => *expr = Expr::Val { span: *span, value: *value },
            Expr::BoolLit { span, value } => {
                *expr = Expr::Val { span: *span, value: i32::from(*value) }
            }
            Expr::CharLit { span, value } => {
                *expr = Expr::Val { span: *span, value: *value as i32 }
            }
            Expr::VarName { span, name } => {
                *expr = if self.arg.contains(name) {
                    let depth = self.arg.get(name);
                    Expr::Arg { span: *span, index: self.arg_count - 1 - depth }
                } else if self.val.contains(name) {
                    Expr::Val { span: *span, value: self.val.get(name) }
                } else {
                    Expr::Global { span: *span, index: self.global.get(name) }
                };
            }
            Expr::Appl { children, .. } => {
                for child in children {
                    self.lower_expr(child);
                }
            }
            Expr::Cond { cond, then_branch, else_branch, .. } => {
                self.lower_expr(cond);
                self.lower_expr(then_branch);
                self.lower_expr(else_branch);
            }
            Expr::Lambda { params, body, .. } => {
                let outer_arg = Rc::clone(&self.arg);
                self.arg = self.arg.new_child();
                for param in params.iter() {
                    self.arg.set(param.name.clone(), self.arg_count);
                    self.arg_count += 1;
                }
                self.lower_expr(body);
                self.arg = outer_arg;
                self.arg_count -= params.len() as i32;
            }
            Expr::Let { decls, body, .. } => {
                let outer_val = Rc::clone(&self.val);
                let outer_global = Rc::clone(&self.global);
                self.val = self.val.new_child();
                self.global = self.global.new_child();
                for decl in decls {
                    self.lower_decl(decl);
                }
                self.lower_expr(body);
                self.val = outer_val;
                self.global = outer_global;
            }
            Expr::Val { .. } | Expr::Arg { .. } | Expr::Global { .. } => {
                unreachable!("lower_expr called twice on the same node")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::check;

    fn lower_source(src: &str) -> Program {
        let mut program = yac_syntax::parse(src).unwrap();
        check(&mut program).unwrap();
        lower(&mut program);
        program
    }

    #[test]
    fn lowering_is_complete() {
        let program = lower_source("x = 1\nadd x 2\n");
        for decl in &program.decls {
            assert!(decl.is_fully_lowered());
        }
    }

    #[test]
    fn global_slots_are_assigned_in_source_order() {
        // f and g are functions, so their uses resolve through `global`
        // rather than being literal-folded into `val` like a plain integer
        // would be; the 15 builtins occupy slots 0..=14.
        let program = lower_source(indoc::indoc! {"
            f = \\x : Int -> x
            g = \\x : Int -> x
            f g
        "});
        let Decl::Output { expr: Expr::Appl { children, .. }, .. } = &program.decls[2] else {
            panic!("expected the trailing application output");
        };
        assert!(matches!(children[0], Expr::Global { index: 15, .. }));
    }

    #[test]
    fn lambda_argument_uses_de_bruijn_depth_from_innermost_binder() {
        let program = lower_source("\\x : Int -> \\y : Int -> x\n");
        let Decl::Output { expr: Expr::Lambda { body: outer_body, .. }, .. } = &program.decls[0] else {
            panic!("expected a lambda output");
        };
        let Expr::Lambda { body: inner_body, .. } = outer_body.as_ref() else {
            panic!("expected a nested lambda");
        };
        assert!(matches!(inner_body.as_ref(), Expr::Arg { index: 1, .. }));
    }

    /// Renders a lowered expression's shape without spans, so the snapshot
    /// reflects node structure and resolved indices rather than source
    /// position noise.
    fn describe(expr: &Expr) -> String {
        match expr {
            Expr::Val { value, .. } => format!("Val({value})"),
            Expr::Arg { index, .. } => format!("Arg({index})"),
            Expr::Global { index, .. } => format!("Global({index})"),
            Expr::Appl { children, .. } => {
                let parts: Vec<_> = children.iter().map(describe).collect();
                format!("Appl[{}]", parts.join(", "))
            }
            Expr::Cond { cond, then_branch, else_branch, .. } => {
                format!("Cond({}, {}, {})", describe(cond), describe(then_branch), describe(else_branch))
            }
            Expr::Lambda { body, .. } => format!("Lambda({})", describe(body)),
            Expr::Let { body, .. } => format!("Let({})", describe(body)),
            Expr::IntLit { .. } | Expr::BoolLit { .. } | Expr::CharLit { .. } | Expr::VarName { .. } => {
                unreachable!("describe is only called on lowered output")
            }
        }
    }

    #[test]
    fn lowered_shape_of_a_nested_application_snapshot() {
        let program = lower_source("add 2 (mul 3 4)\n");
        let Decl::Output { expr, .. } = &program.decls[0] else {
            panic!("expected an output declaration");
        };
        insta::assert_snapshot!(describe(expr), @"Appl[Global(1), Val(2), Appl[Global(3), Val(3), Val(4)]]");
    }

    #[test]
    fn recursive_value_sees_its_own_global_slot() {
        let program = lower_source(indoc::indoc! {"
            fact : Int -> Int
            fact = \\n : Int -> if n then 1 else fact n
        "});
        let Decl::ValueAssign { expr: Expr::Lambda { body, .. }, .. } = &program.decls[1] else {
            panic!("expected the lambda value assignment");
        };
        let Expr::Cond { else_branch, .. } = body.as_ref() else {
            panic!("expected the conditional body");
        };
        let Expr::Appl { children, .. } = else_branch.as_ref() else {
            panic!("expected the recursive application");
        };
        assert!(matches!(children[0], Expr::Global { .. }));
    }
}
