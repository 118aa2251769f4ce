use std::collections::{HashMap, HashSet};

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// The single active binding table of a run.
///
/// There is one flat layer of names. Calls do not push scopes; they take a
/// [`Snapshot`] of the bindings and put it back when they return, so a
/// reassignment inside a call never reaches the caller while mutation of a
/// shared container does.
#[derive(Debug, Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
    constants: HashSet<String>,
    libraries: HashSet<String>,
}

/// The bindings saved at a call boundary.
#[derive(Debug)]
pub struct Snapshot(HashMap<String, Value>);

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a binding.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Looks up a binding, failing with `UndefinedVariable` when absent.
    pub fn lookup(&self, name: &str, line: usize) -> EvalResult<Value> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string(),
                                                             line })
    }

    /// Whether `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Whether `name` was declared with `lock`.
    #[must_use]
    pub fn is_constant(&self, name: &str) -> bool {
        self.constants.contains(name)
    }

    /// Binds `name`, creating or replacing it. Constness is untouched.
    pub fn define(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    /// Binds `name` and marks it constant.
    pub fn define_constant(&mut self, name: &str, value: Value) {
        self.define(name, value);
        self.constants.insert(name.to_string());
    }

    /// Removes a binding, as after a loop whose variable was new.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name)
    }

    /// Checks that `name` may be written through.
    ///
    /// # Errors
    /// - `UndefinedVariable` when `name` is unbound.
    /// - `ConstantModification` when `name` is constant.
    pub fn check_writable(&self, name: &str, line: usize) -> EvalResult<()> {
        if !self.contains(name) {
            return Err(RuntimeError::UndefinedVariable { name: name.to_string(),
                                                         line });
        }
        if self.is_constant(name) {
            return Err(RuntimeError::ConstantModification { name: name.to_string(),
                                                            line });
        }
        Ok(())
    }

    /// Reassigns an existing, non-constant binding.
    ///
    /// # Errors
    /// The errors of [`Environment::check_writable`].
    pub fn assign(&mut self, name: &str, value: Value, line: usize) -> EvalResult<()> {
        self.check_writable(name, line)?;
        self.define(name, value);
        Ok(())
    }

    /// Records a library import. Returns `false` if it was already imported.
    pub fn register_library(&mut self, path: &str) -> bool {
        self.libraries.insert(path.to_string())
    }

    /// Takes a shallow copy of every binding.
    ///
    /// Containers in the copy are the same shared handles as in the live
    /// table.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.variables.clone())
    }

    /// Puts saved bindings back, discarding whatever a call bound.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.variables = snapshot.0;
    }

    /// Every binding, sorted by name.
    #[must_use]
    pub fn bindings(&self) -> Vec<(String, Value)> {
        let mut bindings: Vec<_> = self.variables
                                       .iter()
                                       .map(|(name, value)| (name.clone(), value.clone()))
                                       .collect();
        bindings.sort_by(|a, b| a.0.cmp(&b.0));
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_discards_rebinding_but_keeps_mutation() {
        let mut env = Environment::new();
        let shared = Value::array_from([Value::Integer(1)]);
        env.define("g", Value::Integer(1));
        env.define("a", shared.clone());

        let saved = env.snapshot();
        env.define("g", Value::Integer(2));
        env.define("local", Value::None);
        if let Some(Value::Array(items)) = env.get("a") {
            items.borrow_mut().push(Value::Integer(2));
        }
        env.restore(saved);

        assert_eq!(env.get("g"), Some(&Value::Integer(1)));
        assert!(!env.contains("local"));
        assert_eq!(env.get("a").map(ToString::to_string), Some("[1, 2]".to_string()));
    }

    #[test]
    fn constants_reject_writes() {
        let mut env = Environment::new();
        env.define_constant("k", Value::Integer(1));
        let err = env.assign("k", Value::Integer(2), 4).unwrap_err();
        assert!(matches!(err, RuntimeError::ConstantModification { line: 4, .. }));
        assert_eq!(env.get("k"), Some(&Value::Integer(1)));
    }

    #[test]
    fn assigning_unbound_name_fails() {
        let mut env = Environment::new();
        assert!(matches!(env.assign("x", Value::None, 1),
                         Err(RuntimeError::UndefinedVariable { .. })));
    }
}
