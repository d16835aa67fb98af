use std::rc::Rc;

use yac_core::{builtin_type, ChainMap, Decl, Error, Expr, Program, Result, Type, TypeExpr, BUILTINS};

/// Threads the two chain maps described in §4.2/§4.3 of the language's type
/// discipline: `type` (names to `Type`, shared between type-alias and
/// variable-type lookups) and `defined` (names to "has a value been bound").
struct Checker {
    type_scope: Rc<ChainMap<Type>>,
    defined_scope: Rc<ChainMap<()>>,
}

/// Type-checks every declaration in `program` in source order, writing the
/// checked result type onto each `Output` declaration for the emitter to
/// read later. Fails fast: the first ill-typed or undefined construct halts
/// the whole pass.
pub fn check(program: &mut Program) -> Result<()> {
    let checker = Checker::new();
    for decl in &mut program.decls {
        checker.check_decl(decl)?;
    }
    Ok(())
}

impl Checker {
    fn new() -> Self {
        let type_scope = ChainMap::new();
        let defined_scope = ChainMap::new();
        type_scope.set("Int", Type::Int);
        type_scope.set("Bool", Type::Bool);
        type_scope.set("Char", Type::Char);
        for builtin in BUILTINS {
            type_scope.set(builtin.name, builtin_type(builtin.name));
            defined_scope.set(builtin.name, ());
        }
        Checker { type_scope, defined_scope }
    }

    fn child(&self) -> Checker {
        Checker {
            type_scope: self.type_scope.new_child(),
            defined_scope: self.defined_scope.new_child(),
        }
    }

    fn check_type_expr(&self, type_expr: &TypeExpr) -> Result<Type> {
        match type_expr {
            TypeExpr::Name { span, name } => {
                if self.type_scope.contains(name) {
                    Ok(self.type_scope.get(name))
                } else {
                    Err(Error::type_error(*span, "Type name doesn't exist."))
                }
            }
            TypeExpr::Node { children, .. } => {
                let mut components = Vec::with_capacity(children.len());
                for child in children {
                    components.push(self.check_type_expr(child)?);
                }
                let mut ty = Type::function(components);
                ty.flatten();
                Ok(ty)
            }
        }
    }

    fn check_expr(&self, expr: &Expr) -> Result<Type> {
        match expr {
            Expr::IntLit { .. } => Ok(Type::Int),
            Expr::BoolLit { .. } => Ok(Type::Bool),
            Expr::CharLit { .. } => Ok(Type::Char),
            Expr::VarName { span, name } => {
                if !self.defined_scope.contains(name) {
                    return Err(Error::define_error(*span, "Variable hasn't been defined."));
                }
                if !self.type_scope.contains(name) {
                    return Err(Error::define_error(*span, "Variable hasn't been assigned type."));
                }
                Ok(self.type_scope.get(name))
            }
            Expr::Appl { children, .. } => {
                let mut ty = self.check_expr(&children[0])?;
                for arg in &children[1..] {
                    let arg_ty = self.check_expr(arg)?;
                    ty.apply(&arg_ty)
                        .map_err(|_| Error::type_error(arg.span(), "Not applicable"))?;
                }
                Ok(ty)
            }
            Expr::Cond { cond, then_branch, else_branch, .. } => {
                let cond_ty = self.check_expr(cond)?;
                if cond_ty.is_function() {
                    return Err(Error::type_error(cond.span(), "If-expression can not be function."));
                }
                let then_ty = self.check_expr(then_branch)?;
                let else_ty = self.check_expr(else_branch)?;
                if then_ty != else_ty {
                    return Err(Error::type_error(
                        then_branch.span(),
                        "The type of then-expression should be the same as\
                         the type of else-expression.",
                    ));
                }
                Ok(then_ty)
            }
            Expr::Lambda { params, body, .. } => {
                let inner = self.child();
                let mut param_types = Vec::with_capacity(params.len() + 1);
                for param in params {
                    let param_ty = inner.check_type_expr(&param.type_expr)?;
                    inner.type_scope.set(param.name.clone(), param_ty.clone());
                    inner.defined_scope.set(param.name.clone(), ());
                    param_types.push(param_ty);
                }
                let body_ty = inner.check_expr(body)?;
                param_types.push(body_ty);
                // No flatten here: a higher-order parameter's own function
                // structure must survive, unlike a `TypeNode`'s flattening.
                Ok(Type::function(param_types))
            }
            Expr::Let { decls, body, .. } => {
                let inner = self.child();
                for decl in decls {
                    inner.check_decl(decl)?;
                }
                inner.check_expr(body)
            }
            Expr::Val { .. } | Expr::Arg { .. } | Expr::Global { .. } => {
                unreachable!("check runs before lowering, so lowered nodes never appear here")
            }
        }
    }

    fn check_decl(&self, decl: &mut Decl) -> Result<Type> {
        match decl {
            Decl::TypeAlias { name_span, name, type_expr, .. } => {
                if self.type_scope.local_contains(name) {
                    return Err(Error::type_error(*name_span, "Type name has already been defined."));
                }
                let ty = self.check_type_expr(type_expr)?;
                self.type_scope.set(name.clone(), ty);
                Ok(Type::Undefined)
            }
            Decl::TypeAssign { span, name, type_expr } => {
                if self.type_scope.local_contains(name) {
                    return Err(Error::type_error(*span, "Variable has already been assigned type."));
                }
                let ty = self.check_type_expr(type_expr)?;
                self.type_scope.set(name.clone(), ty);
                Ok(Type::Undefined)
            }
            Decl::ValueAssign { span, name, expr } => {
                if self.defined_scope.local_contains(name) {
                    return Err(Error::define_error(*span, "Variable has already been defined."));
                }
                self.defined_scope.set(name.clone(), ());
                let expr_ty = self.check_expr(expr)?;
                if self.type_scope.local_contains(name) {
                    if self.type_scope.get(name) != expr_ty {
                        return Err(Error::type_error(expr.span(), "Can not match the assigned type."));
                    }
                } else {
                    self.type_scope.set(name.clone(), expr_ty.clone());
                }
                Ok(expr_ty)
            }
            Decl::Output { expr, result_type, .. } => {
                let ty = self.check_expr(expr)?;
                if ty.is_function() {
                    return Err(Error::type_error(expr.span(), "Output expression can not be function type."));
                }
                *result_type = ty.clone();
                Ok(ty)
            }
        }
    }
}
