use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A scoped symbol table: a mapping plus an optional parent. Every checker
/// and lowering-pass scope is one of these, reference-counted so a fresh
/// child can be created without giving up the caller's handle to the parent.
///
/// Dropping the last `Rc` to a child is how a scope is "popped" — there is no
/// explicit pop operation, just letting the child go out of scope.
pub struct ChainMap<V> {
    bindings: RefCell<HashMap<String, V>>,
    parent: Option<Rc<ChainMap<V>>>,
}

impl<V: Clone> ChainMap<V> {
    pub fn new() -> Rc<Self> {
        Rc::new(ChainMap {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Returns a fresh child whose parent is `self`. `self` remains usable
    /// and independent: writes to the child never reach it.
    pub fn new_child(self: &Rc<Self>) -> Rc<Self> {
        Rc::new(ChainMap {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(Rc::clone(self)),
        })
    }

    /// Writes to this map only; shadows (without mutating) any ancestor
    /// binding of the same name.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.bindings.borrow_mut().insert(key.into(), value);
    }

    /// Nearest binding on the chain. Panics if absent — callers are expected
    /// to guard with `contains` first, per the invariant that every lookup
    /// site upstream has already checked definedness.
    pub fn get(&self, key: &str) -> V {
        if let Some(value) = self.bindings.borrow().get(key) {
            return value.clone();
        }
        match &self.parent {
            Some(parent) => parent.get(key),
            None => panic!("chain map: no binding for `{key}`"),
        }
    }

    /// True if `key` is bound in this map or any ancestor.
    pub fn contains(&self, key: &str) -> bool {
        if self.bindings.borrow().contains_key(key) {
            return true;
        }
        self.parent.as_ref().is_some_and(|parent| parent.contains(key))
    }

    /// True only if `key` is bound in this map (not an ancestor).
    pub fn local_contains(&self, key: &str) -> bool {
        self.bindings.borrow().contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_map_shadowing() {
        let parent = ChainMap::new();
        parent.set("k", 1);
        let child = parent.new_child();
        child.set("k", 2);
        assert_eq!(child.get("k"), 2);
        assert_eq!(parent.get("k"), 1);
    }

    #[test]
    fn contains_walks_ancestors() {
        let parent = ChainMap::new();
        parent.set("k", "v");
        let child = parent.new_child();
        assert!(child.contains("k"));
        assert!(!child.local_contains("k"));
        assert!(parent.local_contains("k"));
    }

    #[test]
    fn child_does_not_leak_into_parent() {
        let parent = ChainMap::new();
        let child = parent.new_child();
        child.set("only_in_child", 1);
        assert!(!parent.contains("only_in_child"));
    }
}
