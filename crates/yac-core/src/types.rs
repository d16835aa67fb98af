/// A structural type: primitives, a right-flattened curried function type,
/// or the `Undefined` sentinel produced by default construction.
///
/// `Function` components are always `len() >= 2` — the last is the result,
/// the rest are curried parameter types in left-to-right order. Constructors
/// enforce this; there is no way to build a one-component `Function`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Undefined,
    Int,
    Bool,
    Char,
    Function(Vec<Type>),
}

/// Returned by [`Type::apply`] when the receiver isn't a function or the
/// argument doesn't match its leading parameter. Carries no position —
/// callers attach the source span of the offending argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotApplicable;

impl Type {
    /// Builds a function type from `components`. Panics if fewer than two are
    /// given; a `Function` of arity < 2 is ill-formed and must never exist.
    pub fn function(components: Vec<Type>) -> Type {
        assert!(
            components.len() >= 2,
            "function type needs at least a parameter and a result"
        );
        Type::Function(components)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function(_))
    }

    /// Repeatedly splices a trailing function component into the outer
    /// sequence, so `t1 -> (t2 -> t3)` and `t1 -> t2 -> t3` converge to the
    /// same representation. Idempotent; does not recurse into parameters.
    pub fn flatten(&mut self) {
        let Type::Function(components) = self else {
            return;
        };
        loop {
            match components.last() {
                Some(Type::Function(_)) => {
                    let Some(Type::Function(inner)) = components.pop() else {
                        unreachable!()
                    };
                    components.extend(inner);
                }
                _ => break,
            }
        }
    }

    /// Mutates `self` from `Function([p0, p1, .., pn-1, r])` into
    /// `Function([p1, .., pn-1, r])`, or into `r` directly when only the
    /// parameter and result remain. Fails without mutating on any mismatch.
    pub fn apply(&mut self, arg: &Type) -> Result<(), NotApplicable> {
        let Type::Function(components) = self else {
            return Err(NotApplicable);
        };
        if components[0] != *arg {
            return Err(NotApplicable);
        }
        if components.len() == 2 {
            *self = components.pop().expect("len checked above");
        } else {
            components.remove(0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_splices_trailing_function() {
        let mut nested = Type::function(vec![Type::Int, Type::function(vec![Type::Int, Type::Int])]);
        nested.flatten();
        assert_eq!(nested, Type::function(vec![Type::Int, Type::Int, Type::Int]));
    }

    #[test]
    fn flatten_preserves_higher_order_parameter() {
        let higher_order = Type::function(vec![
            Type::function(vec![Type::Int, Type::Int]),
            Type::Int,
            Type::Int,
        ]);
        let mut flattened = higher_order.clone();
        flattened.flatten();
        assert_eq!(flattened, higher_order);
    }

    #[test]
    fn flatten_is_idempotent() {
        let mut t = Type::function(vec![Type::Int, Type::function(vec![Type::Bool, Type::Char])]);
        t.flatten();
        let once = t.clone();
        t.flatten();
        assert_eq!(t, once);
    }

    #[test]
    fn apply_consumes_one_parameter() {
        let mut f = Type::function(vec![Type::Int, Type::Int, Type::Bool]);
        f.apply(&Type::Int).unwrap();
        assert_eq!(f, Type::function(vec![Type::Int, Type::Bool]));
        f.apply(&Type::Int).unwrap();
        assert_eq!(f, Type::Bool);
    }

    #[test]
    fn apply_rejects_mismatched_argument() {
        let mut f = Type::function(vec![Type::Int, Type::Int]);
        assert_eq!(f.apply(&Type::Bool), Err(NotApplicable));
    }

    #[test]
    fn apply_rejects_non_function() {
        let mut not_a_function = Type::Int;
        assert_eq!(not_a_function.apply(&Type::Int), Err(NotApplicable));
    }

    #[test]
    fn apply_soundness() {
        // If apply(f, a) succeeds with result r, then f == Function([a, ..r's components..])
        // after flattening.
        let mut f = Type::function(vec![Type::Int, Type::Bool, Type::Char]);
        let original = f.clone();
        f.apply(&Type::Int).unwrap();
        let mut reconstructed = match f.clone() {
            Type::Function(mut rest) => {
                rest.insert(0, Type::Int);
                Type::Function(rest)
            }
            other => Type::function(vec![Type::Int, other]),
        };
        reconstructed.flatten();
        let mut expected = original;
        expected.flatten();
        assert_eq!(reconstructed, expected);
    }
}
