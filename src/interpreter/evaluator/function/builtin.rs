use crate::{
    interpreter::{
        evaluator::{
            core::EvalResult,
            function::core::{Arity, wrong_argument},
        },
        value::core::Value,
    },
    util::num::usize_to_i64,
};

/// Returns the length of an array, map, set, or text.
///
/// Text is measured in characters, not bytes.
///
/// # Parameters
/// - `args`: Slice containing one argument.
/// - `line`: Line number for error reporting.
///
/// # Returns
/// `Value::Integer` holding the length.
///
/// # Example
/// ```
/// use puffing::interpreter::{evaluator::function::builtin::len, value::core::Value};
///
/// assert_eq!(len(&[Value::from("héllo")], 1).unwrap(), Value::Integer(5));
/// assert!(len(&[Value::Integer(3)], 1).is_err());
/// ```
pub fn len(args: &[Value], line: usize) -> EvalResult<Value> {
    let [value] = args else {
        return Err(Arity::Exact(1).mismatch("len", args.len(), line));
    };

    let length = match value {
        Value::Text(s) => s.chars().count(),
        Value::Array(items) => items.borrow().len(),
        Value::Map(entries) => entries.borrow().len(),
        Value::Set(elements) => elements.borrow().len(),
        other => {
            return Err(wrong_argument("len",
                                      format!("a value of type {} has no length", other.type_name()),
                                      line));
        },
    };

    Ok(Value::Integer(usize_to_i64(length)))
}
