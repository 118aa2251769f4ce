use std::cmp::Ordering;

use super::arithmetic::unsupported;
use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates a comparison of the form `Value <Operator> Value`.
    ///
    /// `=` and `!=` use loose equality and never fail: values of unrelated
    /// kinds are simply unequal. Ordering operators accept two numbers, two
    /// texts or two arrays. Any comparison involving NaN is false.
    ///
    /// # Parameters
    /// - `op`: The comparison operator.
    /// - `left`: The left-hand value.
    /// - `right`: The right-hand value.
    /// - `line`: Current line number used for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing a boolean result.
    ///
    /// # Errors
    /// `InvalidComparison` when an ordering operator gets values with no
    /// ordering between them, `TypeMismatch` for a non comparison operator.
    ///
    /// # Example
    /// ```
    /// use puffing::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let a = Value::Float(3.0);
    /// let b = Value::Integer(5);
    ///
    /// let result = Interpreter::eval_comparison(BinaryOperator::Less, &a, &b, 1);
    /// assert_eq!(result.unwrap(), Value::Bool(true));
    ///
    /// let result = Interpreter::eval_comparison(BinaryOperator::Equal, &a, &Value::from("3"), 1);
    /// assert_eq!(result.unwrap(), Value::Bool(false));
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

        match op {
            Equal => return Ok(Value::Bool(left == right)),
            NotEqual => return Ok(Value::Bool(left != right)),
            Less | Greater | LessEqual | GreaterEqual => {},
            _ => return Err(unsupported(op, left, right, line)),
        }

        let ordering = match left.compare(right) {
            Some(ordering) => ordering,
            // NaN has no ordering with anything, yet is still a number.
            None if left.is_number() && right.is_number() => return Ok(Value::Bool(false)),
            None => {
                return Err(RuntimeError::InvalidComparison { left: left.type_name(),
                                                             op: op.to_string(),
                                                             right: right.type_name(),
                                                             line });
            },
        };

        Ok(Value::Bool(match op {
                           Less => ordering == Ordering::Less,
                           Greater => ordering == Ordering::Greater,
                           LessEqual => ordering != Ordering::Greater,
                           GreaterEqual => ordering != Ordering::Less,
                           _ => false,
                       }))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn nan_compares_false() {
        let nan = Value::Float(f64::NAN);
        for op in [BinaryOperator::Less, BinaryOperator::GreaterEqual] {
            assert_eq!(Interpreter::eval_comparison(op, &nan, &Value::Integer(1), 1).unwrap(),
                       Value::Bool(false));
        }
    }

    #[test]
    fn non_comparison_operators_are_rejected() {
        let err = Interpreter::eval_comparison(BinaryOperator::Add,
                                               &Value::Integer(1),
                                               &Value::Integer(2),
                                               3).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { line: 3, .. }));
    }

    #[test]
    fn text_orders_lexicographically() {
        let result = Interpreter::eval_comparison(BinaryOperator::LessEqual,
                                                  &Value::from("apple"),
                                                  &Value::from("apples"),
                                                  1);
        assert_eq!(result.unwrap(), Value::Bool(true));
    }

    #[test]
    fn mixed_kinds_cannot_be_ordered() {
        let err = Interpreter::eval_comparison(BinaryOperator::Greater,
                                               &Value::Integer(1),
                                               &Value::from("1"),
                                               4).unwrap_err();
        assert_eq!(err,
                   RuntimeError::InvalidComparison { left:  "int",
                                                     op:    ">".into(),
                                                     right: "str",
                                                     line:  4, });
    }

    #[test]
    fn booleans_are_not_equal_to_numbers() {
        let result = Interpreter::eval_comparison(BinaryOperator::NotEqual,
                                                  &Value::Bool(true),
                                                  &Value::Integer(1),
                                                  1);
        assert_eq!(result.unwrap(), Value::Bool(true));
    }
}
