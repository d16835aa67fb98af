use std::rc::Rc;

use crate::value::Value;

/// A closure's captured argument list (§3.4, §4.5): an immutable,
/// structurally shared singly-linked list, addressed from the head by the
/// De Bruijn-style indices lowering produced. Cloning a `Context` is an
/// `Rc` bump, so the same tail can back many sibling closures at once.
#[derive(Clone)]
pub enum Context {
    Nil,
    Cons(Rc<Node>),
}

struct Node {
    head: Value,
    tail: Context,
}

impl Context {
    pub fn empty() -> Context {
        Context::Nil
    }

    /// Returns a new head with `value` bound at index 0; the tail (`self`)
    /// is shared, not copied.
    pub fn cons(&self, value: Value) -> Context {
        Context::Cons(Rc::new(Node {
            head: value,
            tail: self.clone(),
        }))
    }

    /// The `i`-th value from the head. A well-typed, fully lowered program
    /// never indexes past the end of its own context — checking guarantees
    /// every `Arg` index lowering produced corresponds to a binder that is
    /// live at that point, so running off the end of the list is an
    /// internal bug, not a user-facing failure.
    pub fn index(&self, i: usize) -> Value {
        match (self, i) {
            (Context::Cons(node), 0) => node.head.clone(),
            (Context::Cons(node), _) => node.tail.index(i - 1),
            (Context::Nil, _) => unreachable!(
                "argument index out of range: lowering or checking has an off-by-one bug"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cons_shares_the_tail() {
        let base = Context::empty().cons(Value::Val(1));
        let left = base.cons(Value::Val(2));
        let right = base.cons(Value::Val(3));
        assert!(matches!(left.index(1), Value::Val(1)));
        assert!(matches!(right.index(1), Value::Val(1)));
        assert!(matches!(left.index(0), Value::Val(2)));
        assert!(matches!(right.index(0), Value::Val(3)));
    }
}
