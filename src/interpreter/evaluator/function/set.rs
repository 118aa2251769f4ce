use indexmap::IndexSet;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            function::core::{Arity, array_ref, exact_args, set_element, set_ref},
        },
        value::{core::Value, key::Key},
    },
};

/// Adds an element to a set. Adding a present element changes nothing.
///
/// # Errors
/// `InvalidSetElement` when the element cannot be hashed.
pub fn add(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, element] = exact_args::<2>("set_add", args, line)?;
    let elements = set_ref("set_add", target, line)?;
    let element = set_element(element, line)?;
    elements.borrow_mut().insert(element);
    Ok(Value::Set(elements))
}

/// Removes an element that must be present.
///
/// # Errors
/// `ElementNotFound` when the set lacks the element.
pub fn remove(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, element] = exact_args::<2>("set_remove", args, line)?;
    let elements = set_ref("set_remove", target, line)?;
    let key = set_element(element, line)?;
    if !elements.borrow_mut().shift_remove(&key) {
        return Err(RuntimeError::ElementNotFound { value: key.to_string(),
                                                   line });
    }
    Ok(Value::Set(elements))
}

/// Removes an element if it is present.
pub fn discard(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, element] = exact_args::<2>("set_discard", args, line)?;
    let elements = set_ref("set_discard", target, line)?;
    let key = set_element(element, line)?;
    elements.borrow_mut().shift_remove(&key);
    Ok(Value::Set(elements))
}

/// Removes every element of a set.
pub fn clear(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("set_clear", args, line)?;
    let elements = set_ref("set_clear", target, line)?;
    elements.borrow_mut().clear();
    Ok(Value::Set(elements))
}

/// Tests membership.
pub fn contains(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, element] = exact_args::<2>("set_contains", args, line)?;
    let elements = set_ref("set_contains", target, line)?;
    let key = set_element(element, line)?;
    Ok(Value::Bool(elements.borrow().contains(&key)))
}

/// Copies every set argument, failing on the first non-set.
fn snapshots(function: &'static str,
             args: &[Value],
             line: usize)
             -> EvalResult<Vec<IndexSet<Key>>> {
    if args.len() < 2 {
        return Err(Arity::AtLeast(2).mismatch(function, args.len(), line));
    }
    args.iter()
        .map(|arg| set_ref(function, arg, line).map(|elements| elements.borrow().clone()))
        .collect()
}

/// Folds two or more sets into a new one with the given combining step.
fn fold_sets<F>(function: &'static str, args: &[Value], line: usize, step: F) -> EvalResult<Value>
    where F: Fn(IndexSet<Key>, &IndexSet<Key>) -> IndexSet<Key>
{
    let mut sets = snapshots(function, args, line)?.into_iter();
    let first = sets.next().unwrap_or_default();
    let result = sets.fold(first, |acc, next| step(acc, &next));
    Ok(result.into())
}

/// Elements found in any of the sets.
///
/// # Example
/// ```
/// use indexmap::IndexSet;
/// use puffing::interpreter::{
///     evaluator::function::set::union,
///     value::{core::Value, key::Key},
/// };
///
/// let a: Value = IndexSet::from([Key::Integer(1), Key::Integer(2)]).into();
/// let b: Value = IndexSet::from([Key::Integer(2), Key::Integer(3)]).into();
/// assert_eq!(union(&[a, b], 1).unwrap().to_string(), "#{1, 2, 3}");
/// ```
pub fn union(args: &[Value], line: usize) -> EvalResult<Value> {
    fold_sets("set_union", args, line, |mut acc, next| {
        acc.extend(next.iter().cloned());
        acc
    })
}

/// Elements found in every set.
pub fn intersection(args: &[Value], line: usize) -> EvalResult<Value> {
    fold_sets("set_intersection", args, line, |mut acc, next| {
        acc.retain(|key| next.contains(key));
        acc
    })
}

/// Elements of the first set found in none of the others.
pub fn difference(args: &[Value], line: usize) -> EvalResult<Value> {
    fold_sets("set_difference", args, line, |mut acc, next| {
        acc.retain(|key| !next.contains(key));
        acc
    })
}

/// Elements found in exactly one of two sets.
pub fn symmetric_difference(args: &[Value], line: usize) -> EvalResult<Value> {
    let [a, b] = exact_args::<2>("set_symmetric_difference", args, line)?;
    let a = set_ref("set_symmetric_difference", a, line)?;
    let b = set_ref("set_symmetric_difference", b, line)?;
    let (a, b) = (a.borrow(), b.borrow());
    let result: IndexSet<Key> = a.symmetric_difference(&*b).cloned().collect();
    Ok(result.into())
}

/// Applies a relation to two set arguments.
fn relation<F>(function: &'static str, args: &[Value], line: usize, test: F) -> EvalResult<Value>
    where F: Fn(&IndexSet<Key>, &IndexSet<Key>) -> bool
{
    let [a, b] = exact_args::<2>(function, args, line)?;
    let a = set_ref(function, a, line)?;
    let b = set_ref(function, b, line)?;
    let holds = test(&a.borrow(), &b.borrow());
    Ok(Value::Bool(holds))
}

/// Whether every element of the first set is in the second.
pub fn is_subset(args: &[Value], line: usize) -> EvalResult<Value> {
    relation("set_is_subset", args, line, |a, b| a.is_subset(b))
}

/// Whether every element of the second set is in the first.
pub fn is_superset(args: &[Value], line: usize) -> EvalResult<Value> {
    relation("set_is_superset", args, line, |a, b| a.is_superset(b))
}

/// Whether the two sets share no element.
pub fn is_disjoint(args: &[Value], line: usize) -> EvalResult<Value> {
    relation("set_is_disjoint", args, line, |a, b| a.is_disjoint(b))
}

/// Makes a copy of a set.
pub fn copy(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("set_copy", args, line)?;
    let elements = set_ref("set_copy", target, line)?;
    let copy = elements.borrow().clone();
    Ok(copy.into())
}

/// Lists the elements of a set in insertion order.
pub fn to_array(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("set_to_array", args, line)?;
    let elements = set_ref("set_to_array", target, line)?;
    let listed = Value::array_from(elements.borrow().iter().map(Key::to_value));
    Ok(listed)
}

/// Builds a set from the elements of an array, dropping duplicates.
///
/// # Errors
/// `InvalidSetElement` when an element cannot be hashed.
pub fn from_array(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("array_to_set", args, line)?;
    let items = array_ref("array_to_set", target, line)?;
    let elements = items.borrow()
                        .iter()
                        .map(|item| set_element(item, line))
                        .collect::<EvalResult<IndexSet<Key>>>()?;
    Ok(elements.into())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ints(values: &[i64]) -> Value {
        values.iter().copied().map(Key::Integer).collect::<IndexSet<_>>().into()
    }

    #[test]
    fn remove_requires_presence() {
        let err = remove(&[ints(&[1]), Value::Integer(5)], 3).unwrap_err();
        assert_eq!(err, RuntimeError::ElementNotFound { value: "5".into(),
                                                        line: 3 });
    }

    #[test]
    fn discard_tolerates_absence() {
        let elements = ints(&[1, 2]);
        discard(&[elements.clone(), Value::Integer(5)], 1).unwrap();
        discard(&[elements.clone(), Value::Integer(1)], 1).unwrap();
        assert_eq!(elements.to_string(), "#{2}");
    }

    #[test]
    fn none_is_a_valid_element() {
        let elements = ints(&[]);
        add(&[elements.clone(), Value::None], 1).unwrap();
        assert_eq!(contains(&[elements, Value::None], 1).unwrap(), Value::Bool(true));
    }

    #[test]
    fn arrays_are_rejected() {
        let err = add(&[ints(&[]), Value::array_from([])], 2).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidSetElement { found: "array", line: 2 }));
    }

    #[test]
    fn variadic_operations_fold_left() {
        let result = difference(&[ints(&[1, 2, 3, 4]), ints(&[1]), ints(&[4])], 1).unwrap();
        assert_eq!(result.to_string(), "#{2, 3}");

        let result = intersection(&[ints(&[1, 2, 3]), ints(&[2, 3]), ints(&[3])], 1).unwrap();
        assert_eq!(result.to_string(), "#{3}");
    }

    #[test]
    fn relations() {
        let small = ints(&[1]);
        let big = ints(&[1, 2]);
        assert_eq!(is_subset(&[small.clone(), big.clone()], 1).unwrap(), Value::Bool(true));
        assert_eq!(is_superset(&[small.clone(), big], 1).unwrap(), Value::Bool(false));
        assert_eq!(is_disjoint(&[small, ints(&[3])], 1).unwrap(), Value::Bool(true));
    }

    #[test]
    fn array_to_set_drops_duplicates() {
        let items = Value::array_from([Value::Integer(2), Value::Float(2.0), Value::Integer(1)]);
        let elements = from_array(&[items], 1).unwrap();
        assert_eq!(to_array(&[elements], 1).unwrap().to_string(), "[2, 1]");
    }
}
