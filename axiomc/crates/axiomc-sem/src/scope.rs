//! Lexically scoped environment.
//!
//! A stack of ribs, one per active scope. Name resolution walks outward
//! from the innermost rib; blocks push a rib on entry and pop it on exit,
//! so declarations inside a block do not leak into the surrounding
//! environment. The tree is generic over the bound value: the checker
//! binds types, the interpreter binds runtime values.

use rustc_hash::FxHashMap;

/// A single scope level.
type Rib<V> = FxHashMap<String, V>;

/// Scope stack for name resolution.
#[derive(Debug)]
pub struct ScopeTree<V> {
    /// Active ribs, innermost last. Never empty: the root rib holds the
    /// contract inputs and top-level declarations.
    ribs: Vec<Rib<V>>,
}

impl<V> ScopeTree<V> {
    /// Creates a scope tree with the root rib.
    pub fn new() -> Self {
        Self {
            ribs: vec![Rib::default()],
        }
    }

    /// Enters a new scope.
    pub fn enter_scope(&mut self) {
        self.ribs.push(Rib::default());
    }

    /// Exits the innermost scope, dropping its bindings. The root rib is
    /// never popped.
    pub fn exit_scope(&mut self) {
        if self.ribs.len() > 1 {
            self.ribs.pop();
        }
    }

    /// Binds a name in the innermost scope.
    pub fn declare(&mut self, name: impl Into<String>, value: V) {
        self.ribs
            .last_mut()
            .expect("scope tree always has a root rib")
            .insert(name.into(), value);
    }

    /// Resolves a name, walking outward through enclosing scopes.
    pub fn resolve(&self, name: &str) -> Option<&V> {
        self.ribs.iter().rev().find_map(|rib| rib.get(name))
    }

    /// True if the name is bound in any active scope.
    pub fn is_bound(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Overwrites the binding in whichever scope owns the name. Returns
    /// false if the name is unbound.
    pub fn assign(&mut self, name: &str, value: V) -> bool {
        for rib in self.ribs.iter_mut().rev() {
            if let Some(slot) = rib.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        false
    }
}

impl<V> Default for ScopeTree<V> {
    fn default() -> Self {
        Self::new()
    }
}
