use indexmap::IndexMap;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            function::core::{Arity, exact_args, map_key, map_ref},
        },
        value::core::Value,
    },
};

/// Lists the keys of a map in insertion order.
///
/// # Example
/// ```
/// use indexmap::IndexMap;
/// use puffing::interpreter::{
///     evaluator::function::map::keys,
///     value::{core::Value, key::Key},
/// };
///
/// let mut entries = IndexMap::new();
/// entries.insert(Key::Text("b".into()), Value::Integer(1));
/// entries.insert(Key::Text("a".into()), Value::Integer(2));
///
/// let entries: Value = entries.into();
/// let listed = keys(&[entries], 1).unwrap();
/// assert_eq!(listed.to_string(), r#"["b", "a"]"#);
/// ```
pub fn keys(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("keys", args, line)?;
    let entries = map_ref("keys", target, line)?;
    let listed = Value::array_from(entries.borrow().keys().map(|key| key.to_value()));
    Ok(listed)
}

/// Lists the values of a map in insertion order.
pub fn values(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("values", args, line)?;
    let entries = map_ref("values", target, line)?;
    let listed = Value::array_from(entries.borrow().values().cloned());
    Ok(listed)
}

/// Lists the entries of a map as `[key, value]` pairs in insertion order.
pub fn items(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("items", args, line)?;
    let entries = map_ref("items", target, line)?;
    let listed = Value::array_from(entries.borrow()
                                          .iter()
                                          .map(|(key, value)| {
                                              Value::array_from([key.to_value(), value.clone()])
                                          }));
    Ok(listed)
}

/// Tests whether a map has an entry for a key.
///
/// # Errors
/// `InvalidKeyType` when the key cannot be a map key.
pub fn has_key(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, key] = exact_args::<2>("has_key", args, line)?;
    let entries = map_ref("has_key", target, line)?;
    let key = map_key(key, line)?;
    Ok(Value::Bool(entries.borrow().contains_key(&key)))
}

/// Inserts or replaces the entry for a key.
///
/// # Returns
/// The same map.
pub fn set(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, key, value] = exact_args::<3>("set", args, line)?;
    let entries = map_ref("set", target, line)?;
    let key = map_key(key, line)?;
    entries.borrow_mut().insert(key, value.clone());
    Ok(Value::Map(entries))
}

/// Looks up a key without failing.
///
/// # Returns
/// The value for the key, else the default (third argument), else `none`.
///
/// # Example
/// ```
/// use indexmap::IndexMap;
/// use puffing::interpreter::{
///     evaluator::function::map::get,
///     value::{core::Value, key::Key},
/// };
///
/// let mut entries = IndexMap::new();
/// entries.insert(Key::Integer(1), Value::from("one"));
/// let entries: Value = entries.into();
///
/// assert_eq!(get(&[entries.clone(), Value::Integer(1)], 1).unwrap(), Value::from("one"));
/// assert_eq!(get(&[entries.clone(), Value::Integer(2)], 1).unwrap(), Value::None);
/// assert_eq!(get(&[entries, Value::Integer(2), Value::Integer(0)], 1).unwrap(),
///            Value::Integer(0));
/// ```
pub fn get(args: &[Value], line: usize) -> EvalResult<Value> {
    let (target, key, default) = match args {
        [target, key] => (target, key, Value::None),
        [target, key, default] => (target, key, default.clone()),
        _ => return Err(Arity::OneOf(&[2, 3]).mismatch("get", args.len(), line)),
    };
    let entries = map_ref("get", target, line)?;
    let key = map_key(key, line)?;
    let found = entries.borrow().get(&key).cloned();
    Ok(found.unwrap_or(default))
}

/// Removes the entry for a key if there is one.
pub fn delete_key(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, key] = exact_args::<2>("delete_key", args, line)?;
    let entries = map_ref("delete_key", target, line)?;
    let key = map_key(key, line)?;
    entries.borrow_mut().shift_remove(&key);
    Ok(Value::Map(entries))
}

/// Removes every entry of a map.
pub fn clear_dict(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("clear_dict", args, line)?;
    let entries = map_ref("clear_dict", target, line)?;
    entries.borrow_mut().clear();
    Ok(Value::Map(entries))
}

/// Copies every entry of the second map into the first.
///
/// Existing keys keep their position and take the new value.
pub fn update(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, source] = exact_args::<2>("update", args, line)?;
    let entries = map_ref("update", target, line)?;
    let source = map_ref("update", source, line)?;

    // Snapshot first so `update(m, m)` does not borrow the same cell twice.
    let incoming: Vec<_> = source.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    entries.borrow_mut().extend(incoming);
    Ok(Value::Map(entries))
}

/// Makes a shallow copy of a map.
pub fn copy_dict(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("copy_dict", args, line)?;
    let entries = map_ref("copy_dict", target, line)?;
    let copy = entries.borrow().clone();
    Ok(copy.into())
}

/// Combines two or more maps into a new one. Later maps win on shared keys.
///
/// # Errors
/// `InvalidArgument` when an argument is not a map.
pub fn merge(args: &[Value], line: usize) -> EvalResult<Value> {
    if args.len() < 2 {
        return Err(Arity::AtLeast(2).mismatch("merge", args.len(), line));
    }

    let mut merged = IndexMap::new();
    for arg in args {
        let entries = map_ref("merge", arg, line)?;
        merged.extend(entries.borrow().iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    Ok(merged.into())
}

/// Fetches the value stored under a key.
///
/// # Errors
/// - `InvalidKeyType` when the index cannot be a map key.
/// - `KeyNotFound` when no entry has that key.
pub(crate) fn lookup(target: &Value, index: &Value, line: usize) -> EvalResult<Value> {
    let Value::Map(entries) = target else {
        return Err(RuntimeError::NotIndexable { found: target.type_name(),
                                                line });
    };
    let key = map_key(index, line)?;
    entries.borrow()
           .get(&key)
           .cloned()
           .ok_or_else(|| RuntimeError::KeyNotFound { key: key.to_string(),
                                                      line })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::value::key::Key;

    fn sample() -> Value {
        let mut entries = IndexMap::new();
        entries.insert(Key::Text("x".into()), Value::Integer(1));
        entries.insert(Key::Text("y".into()), Value::Integer(2));
        entries.into()
    }

    #[test]
    fn merge_prefers_later_maps() {
        let mut other = IndexMap::new();
        other.insert(Key::Text("y".into()), Value::Integer(20));
        other.insert(Key::Text("z".into()), Value::Integer(30));

        let merged = merge(&[sample(), other.into()], 1).unwrap();
        assert_eq!(merged.to_string(), r#"{"x": 1, "y": 20, "z": 30}"#);
    }

    #[test]
    fn delete_key_ignores_missing_keys() {
        let entries = sample();
        delete_key(&[entries.clone(), Value::from("nope")], 1).unwrap();
        delete_key(&[entries.clone(), Value::from("x")], 1).unwrap();
        assert_eq!(entries.to_string(), r#"{"y": 2}"#);
    }

    #[test]
    fn none_is_not_a_map_key() {
        let err = set(&[sample(), Value::None, Value::Integer(1)], 4).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidKeyType { found: "none", line: 4 }));
    }

    #[test]
    fn missing_key_lookup_names_the_key() {
        let err = lookup(&sample(), &Value::from("q"), 2).unwrap_err();
        assert_eq!(err, RuntimeError::KeyNotFound { key: r#""q""#.into(),
                                                    line: 2 });
    }

    #[test]
    fn update_with_itself_is_harmless() {
        let entries = sample();
        update(&[entries.clone(), entries.clone()], 1).unwrap();
        assert_eq!(entries.to_string(), r#"{"x": 1, "y": 2}"#);
    }
}
