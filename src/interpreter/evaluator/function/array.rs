use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            function::core::{Arity, array_ref, exact_args, integer, wrong_argument},
        },
        value::core::Value,
    },
    util::num::{normalize_index, usize_to_i64},
};

/// Appends a value to the end of an array.
///
/// # Returns
/// The same array, so the change is visible through every alias.
///
/// # Example
/// ```
/// use puffing::interpreter::{evaluator::function::array::push, value::core::Value};
///
/// let items = Value::array_from([Value::Integer(1)]);
/// push(&[items.clone(), Value::Integer(2)], 1).unwrap();
/// assert_eq!(items.to_string(), "[1, 2]");
/// ```
pub fn push(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, value] = exact_args::<2>("push", args, line)?;
    let items = array_ref("push", target, line)?;
    items.borrow_mut().push(value.clone());
    Ok(Value::Array(items))
}

/// Removes the last element of an array.
///
/// # Errors
/// `EmptyContainer` when the array is empty.
pub fn pop(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("pop", args, line)?;
    let items = array_ref("pop", target, line)?;
    let popped = items.borrow_mut().pop();
    if popped.is_none() {
        return Err(RuntimeError::EmptyContainer { operation: "pop",
                                                  container: "array",
                                                  line });
    }
    Ok(Value::Array(items))
}

/// Removes the first element of an array.
///
/// # Errors
/// `EmptyContainer` when the array is empty.
pub fn shift(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("shift", args, line)?;
    let items = array_ref("shift", target, line)?;
    if items.borrow().is_empty() {
        return Err(RuntimeError::EmptyContainer { operation: "shift",
                                                  container: "array",
                                                  line });
    }
    items.borrow_mut().remove(0);
    Ok(Value::Array(items))
}

/// Prepends a value to an array.
pub fn unshift(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, value] = exact_args::<2>("unshift", args, line)?;
    let items = array_ref("unshift", target, line)?;
    items.borrow_mut().insert(0, value.clone());
    Ok(Value::Array(items))
}

/// Inserts a value before the element at a 1-based or negative position.
///
/// Positions past either end clamp to the nearest end, so `insert(a, 99, v)`
/// appends.
///
/// # Errors
/// - `InvalidIndex` for position `0`.
/// - `InvalidArgument` when the position is not an int.
///
/// # Example
/// ```
/// use puffing::interpreter::{evaluator::function::array::insert, value::core::Value};
///
/// let items = Value::array_from([Value::Integer(1), Value::Integer(3)]);
/// insert(&[items.clone(), Value::Integer(2), Value::Integer(2)], 1).unwrap();
/// insert(&[items.clone(), Value::Integer(-1), Value::Integer(9)], 1).unwrap();
/// assert_eq!(items.to_string(), "[1, 2, 9, 3]");
/// ```
pub fn insert(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, position, value] = exact_args::<3>("insert", args, line)?;
    let items = array_ref("insert", target, line)?;
    let index = integer("insert", position, line)?;

    let len = usize_to_i64(items.borrow().len());
    let slot = match index {
        0 => return Err(RuntimeError::InvalidIndex { index, line }),
        k if k > 0 => (k - 1).min(len),
        k => len.saturating_add(k).max(0),
    };
    let slot = usize::try_from(slot).unwrap_or_default();

    items.borrow_mut().insert(slot, value.clone());
    Ok(Value::Array(items))
}

/// Removes the element at a 1-based or negative position.
///
/// # Errors
/// `IndexOutOfRange` when the position addresses no element.
pub fn remove(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, position] = exact_args::<2>("remove", args, line)?;
    let items = array_ref("remove", target, line)?;
    let index = integer("remove", position, line)?;

    let length = items.borrow().len();
    let out_of_range = RuntimeError::IndexOutOfRange { index,
                                                       container: "array",
                                                       length,
                                                       line };
    let slot = normalize_index(index, length).map_err(|_| out_of_range)?;
    items.borrow_mut().remove(slot);
    Ok(Value::Array(items))
}

/// Removes every element of an array.
pub fn clear(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("clear", args, line)?;
    let items = array_ref("clear", target, line)?;
    items.borrow_mut().clear();
    Ok(Value::Array(items))
}

/// Reverses an array in place.
pub fn reverse(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("reverse", args, line)?;
    let items = array_ref("reverse", target, line)?;
    items.borrow_mut().reverse();
    Ok(Value::Array(items))
}

/// Sorts an array in place in ascending order.
///
/// Numbers, text and arrays each sort among themselves.
///
/// # Errors
/// `InvalidSort` when two elements have no ordering; the array is left as
/// it was.
///
/// # Example
/// ```
/// use puffing::interpreter::{evaluator::function::array::sort, value::core::Value};
///
/// let items = Value::array_from([Value::Integer(3), Value::Float(1.5), Value::Integer(2)]);
/// sort(&[items.clone()], 1).unwrap();
/// assert_eq!(items.to_string(), "[1.5, 2, 3]");
///
/// let mixed = Value::array_from([Value::Integer(3), Value::from("a")]);
/// assert!(sort(&[mixed], 1).is_err());
/// ```
pub fn sort(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("sort", args, line)?;
    let items = array_ref("sort", target, line)?;

    // Taken out of the cell so comparisons can borrow nested arrays.
    let mut sorted = std::mem::take(&mut *items.borrow_mut());
    let original = sorted.clone();
    let mut failure = None;
    sorted.sort_by(|a, b| {
        a.compare(b).unwrap_or_else(|| {
            failure.get_or_insert_with(|| {
                format!("cannot compare {} with {}", a.type_name(), b.type_name())
            });
            Ordering::Equal
        })
    });

    if let Some(details) = failure {
        *items.borrow_mut() = original;
        return Err(RuntimeError::InvalidSort { details, line });
    }

    *items.borrow_mut() = sorted;
    Ok(Value::Array(items))
}

/// Tests whether an array holds a value equal to the given one.
pub fn contains(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, needle] = exact_args::<2>("contains", args, line)?;
    let items = array_ref("contains", target, line)?;
    let found = items.borrow().iter().any(|item| item == needle);
    Ok(Value::Bool(found))
}

/// Finds the 1-based position of the first element equal to a value.
///
/// # Returns
/// The position, or `-1` when absent.
pub fn index_of(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, needle] = exact_args::<2>("index_of", args, line)?;
    let items = array_ref("index_of", target, line)?;
    let position = items.borrow()
                        .iter()
                        .position(|item| item == needle)
                        .map_or(-1, |slot| usize_to_i64(slot) + 1);
    Ok(Value::Integer(position))
}

/// Copies the elements between two 1-based inclusive bounds into a new array.
///
/// `end` defaults to the last element. A start below 1 starts at the first
/// element, a negative end counts from the back, and bounds past the end
/// clamp.
///
/// # Example
/// ```
/// use puffing::interpreter::{evaluator::function::array::slice, value::core::Value};
///
/// let items = Value::array_from((1..=5).map(Value::Integer));
/// let middle = slice(&[items.clone(), Value::Integer(2), Value::Integer(4)], 1).unwrap();
/// assert_eq!(middle.to_string(), "[2, 3, 4]");
///
/// let tail = slice(&[items, Value::Integer(4)], 1).unwrap();
/// assert_eq!(tail.to_string(), "[4, 5]");
/// ```
pub fn slice(args: &[Value], line: usize) -> EvalResult<Value> {
    let (target, start, end) = match args {
        [target, start] => (target, start, None),
        [target, start, end] => (target, start, Some(end)),
        _ => return Err(Arity::OneOf(&[2, 3]).mismatch("slice", args.len(), line)),
    };
    let items = array_ref("slice", target, line)?;
    let items = items.borrow();
    let len = usize_to_i64(items.len());

    let start = integer("slice", start, line)?.saturating_sub(1).clamp(0, len);
    let end = match end {
        Some(end) => {
            let end = integer("slice", end, line)?;
            if end < 0 { len.saturating_add(end) } else { end }
        },
        None => len,
    }.clamp(0, len);

    let start = usize::try_from(start).unwrap_or_default();
    let end = usize::try_from(end).unwrap_or_default();
    let copied = items.get(start..end).map(<[Value]>::to_vec).unwrap_or_default();
    Ok(copied.into())
}

/// Joins the printed forms of an array's elements with a separator.
///
/// # Errors
/// `InvalidArgument` when the separator is not text.
pub fn join(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target, separator] = exact_args::<2>("join", args, line)?;
    let items = array_ref("join", target, line)?;
    let Value::Text(separator) = separator else {
        return Err(wrong_argument("join",
                                  format!("separator must be a str, got {}",
                                          separator.type_name()),
                                  line));
    };

    let parts: Vec<String> = items.borrow().iter().map(ToString::to_string).collect();
    Ok(Value::Text(parts.join(separator)))
}

/// Adds up the numbers of an array.
///
/// The sum stays an int while every element is an int. An empty array sums
/// to `0`.
///
/// # Errors
/// - `InvalidArgument` for a non-numeric element.
/// - `Overflow` when an int sum leaves the 64-bit range.
pub fn sum(args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>("sum", args, line)?;
    let items = array_ref("sum", target, line)?;

    let mut total = Value::Integer(0);
    for item in items.borrow().iter() {
        if !item.is_number() {
            return Err(wrong_argument("sum",
                                      format!("cannot add a value of type {}", item.type_name()),
                                      line));
        }
        total = Interpreter::eval_binary(BinaryOperator::Add, &total, item, line)?;
    }
    Ok(total)
}

/// Returns the smallest (`min`) or largest (`max`) element of an array.
///
/// Ties keep the earliest element.
///
/// # Parameters
/// - `name`: Either `"min"` or `"max"`.
/// - `args`: Slice containing one array.
/// - `line`: Line number for error reporting.
///
/// # Errors
/// - `EmptyContainer` for an empty array.
/// - `InvalidArgument` when two elements have no ordering.
///
/// # Example
/// ```
/// use puffing::interpreter::{evaluator::function::array::extreme, value::core::Value};
///
/// let items = Value::array_from([Value::Integer(4), Value::Float(-1.5), Value::Integer(9)]);
/// assert_eq!(extreme("min", &[items.clone()], 1).unwrap(), Value::Float(-1.5));
/// assert_eq!(extreme("max", &[items], 1).unwrap(), Value::Integer(9));
/// ```
pub fn extreme(name: &'static str, args: &[Value], line: usize) -> EvalResult<Value> {
    let [target] = exact_args::<1>(name, args, line)?;
    let items = array_ref(name, target, line)?;
    let items = items.borrow();

    let wanted = if name == "min" { Ordering::Less } else { Ordering::Greater };
    let mut iter = items.iter();
    let Some(mut best) = iter.next() else {
        return Err(RuntimeError::EmptyContainer { operation: name,
                                                  container: "array",
                                                  line });
    };

    for item in iter {
        match item.compare(best) {
            Some(ordering) if ordering == wanted => best = item,
            Some(_) => {},
            None => {
                return Err(wrong_argument(name,
                                          format!("cannot compare {} with {}",
                                                  item.type_name(),
                                                  best.type_name()),
                                          line));
            },
        }
    }
    Ok(best.clone())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn numbers(values: &[i64]) -> Value {
        Value::array_from(values.iter().copied().map(Value::Integer))
    }

    #[test]
    fn pop_on_empty_array_fails() {
        let err = pop(&[numbers(&[])], 7).unwrap_err();
        assert!(matches!(err, RuntimeError::EmptyContainer { operation: "pop", line: 7, .. }));
    }

    #[test]
    fn remove_uses_normalized_indices() {
        let items = numbers(&[1, 2, 3]);
        remove(&[items.clone(), Value::Integer(-1)], 1).unwrap();
        remove(&[items.clone(), Value::Integer(1)], 1).unwrap();
        assert_eq!(items.to_string(), "[2]");

        let err = remove(&[items, Value::Integer(0)], 1).unwrap_err();
        assert!(matches!(err, RuntimeError::IndexOutOfRange { index: 0, .. }));
    }

    #[test]
    fn insert_rejects_position_zero() {
        let err = insert(&[numbers(&[1]), Value::Integer(0), Value::None], 2).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidIndex { index: 0, line: 2 }));
    }

    #[test]
    fn insert_clamps_far_positions() {
        let items = numbers(&[1, 2]);
        insert(&[items.clone(), Value::Integer(10), Value::Integer(3)], 1).unwrap();
        insert(&[items.clone(), Value::Integer(-10), Value::Integer(0)], 1).unwrap();
        assert_eq!(items.to_string(), "[0, 1, 2, 3]");
    }

    #[test]
    fn failed_sort_leaves_array_untouched() {
        let items = Value::array_from([Value::Integer(2), Value::from("b"), Value::Integer(1)]);
        assert!(sort(&[items.clone()], 1).is_err());
        assert_eq!(items.to_string(), r#"[2, "b", 1]"#);
    }

    #[test]
    fn index_of_is_one_based() {
        let items = numbers(&[5, 6, 7]);
        assert_eq!(index_of(&[items.clone(), Value::Integer(7)], 1).unwrap(), Value::Integer(3));
        assert_eq!(index_of(&[items, Value::Integer(8)], 1).unwrap(), Value::Integer(-1));
    }

    #[test]
    fn sum_promotes_to_float() {
        let items = Value::array_from([Value::Integer(1), Value::Float(0.5)]);
        assert_eq!(sum(&[items], 1).unwrap(), Value::Float(1.5));
        assert_eq!(sum(&[numbers(&[])], 1).unwrap(), Value::Integer(0));
    }

    #[test]
    fn join_uses_printed_forms() {
        let items = Value::array_from([Value::Integer(1), Value::from("a"), Value::Float(2.0)]);
        assert_eq!(join(&[items, Value::from("-")], 1).unwrap(), Value::from("1-a-2.0"));
    }

    #[test]
    fn slice_with_negative_end() {
        let items = numbers(&[1, 2, 3, 4]);
        let result = slice(&[items, Value::Integer(0), Value::Integer(-1)], 1).unwrap();
        assert_eq!(result.to_string(), "[1, 2, 3]");
    }
}
