//! Environment for host bindings
//!
//! The Environment is a single flat scope owned by the host. It maps
//! symbols of one interner to values and procedures.

use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::interner::{Interner, Symbol};
use crate::language::{Arguments, Value};

// ============================================================================
// Environment
// ============================================================================

/// Host-supplied bindings.
///
/// The Environment is cheap to clone (just an Arc increment) and clones
/// share their bindings. Concurrent reads are safe; hosts should not
/// define new bindings while an evaluation is running.
#[derive(Clone)]
pub struct Environment {
    interner: Interner,
    bindings: Arc<RwLock<FxHashMap<Symbol, Value>>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create a new, empty environment over the process-wide interner
    pub fn new() -> Self {
        Self::with_interner(Interner::global().clone())
    }

    pub fn with_interner(interner: Interner) -> Self {
        Environment {
            interner,
            bindings: Arc::new(RwLock::new(FxHashMap::default())),
        }
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Bind `name`, replacing any previous binding
    pub fn define(&self, name: &str, value: impl Into<Value>) {
        let symbol = self.interner.intern(name);
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        bindings.insert(symbol, value.into());
    }

    /// Bind `name` to a host closure
    pub fn define_fn<F>(&self, name: &str, f: F)
    where
        F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        self.define(name, Value::procedure(f));
    }

    /// Look up a symbol, failing when it is unbound
    pub fn lookup(&self, symbol: &Symbol) -> Result<Value> {
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        bindings
            .get(symbol)
            .cloned()
            .ok_or_else(|| Error::Unbound(symbol.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let symbol = self.interner.get(name)?;
        self.lookup(&symbol).ok()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: AsRef<str>, V: Into<Value>> Extend<(S, V)> for Environment {
    fn extend<I: IntoIterator<Item = (S, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.define(name.as_ref(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let env = Environment::with_interner(Interner::new());
        env.define("x", 42i64);
        let sym = env.interner().intern("x");
        assert_eq!(env.lookup(&sym).unwrap(), Value::Int(42));
        assert_eq!(env.get("x"), Some(Value::Int(42)));
    }

    #[test]
    fn test_unbound_lookup_fails() {
        let env = Environment::with_interner(Interner::new());
        let sym = env.interner().intern("missing");
        match env.lookup(&sym) {
            Err(Error::Unbound(name)) => assert_eq!(name, "missing"),
            other => panic!("expected unbound error, got {other:?}"),
        }
        assert!(!env.contains("missing"));
    }

    #[test]
    fn test_clones_share_bindings() {
        let env = Environment::with_interner(Interner::new());
        let other = env.clone();
        other.define("late", "bound");
        assert_eq!(env.get("late"), Some(Value::from("bound")));
    }

    #[test]
    fn test_extend_and_redefine() {
        let mut env = Environment::with_interner(Interner::new());
        env.extend([("a", 1i64), ("b", 2i64)]);
        env.define("a", 10i64);
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("a"), Some(Value::Int(10)));
    }

    #[test]
    fn test_define_fn() {
        let env = Environment::with_interner(Interner::new());
        env.define_fn("one", |_| Ok(Value::Int(1)));
        assert!(env.get("one").is_some_and(|v| v.is_procedure()));
    }
}
