use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: numeric negation for ints and floats.
    /// - `Not`: the negated truthiness of any value.
    ///
    /// # Parameters
    /// - `op`: Unary operator.
    /// - `value`: Input value.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The computed `Value` wrapped in `EvalResult`.
    ///
    /// # Errors
    /// - `InvalidUnaryOperand` when negating a non-number.
    /// - `Overflow` when negating the smallest int.
    ///
    /// # Example
    /// ```
    /// use puffing::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// // Negation
    /// let v = Interpreter::eval_unary(UnaryOperator::Negate, &Value::Integer(5), 1).unwrap();
    /// assert_eq!(v, Value::Integer(-5));
    ///
    /// // Logical not works on any value
    /// let v = Interpreter::eval_unary(UnaryOperator::Not, &Value::from(""), 1).unwrap();
    /// assert_eq!(v, Value::Bool(true));
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => match value {
                Value::Integer(n) => {
                    n.checked_neg().map(Value::Integer).ok_or(RuntimeError::Overflow { line })
                },
                Value::Float(f) => Ok(Value::Float(-f)),
                other => Err(RuntimeError::InvalidUnaryOperand { op: "-",
                                                                 found: other.type_name(),
                                                                 line }),
            },
            UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negating_text_fails() {
        let err = Interpreter::eval_unary(UnaryOperator::Negate, &Value::from("a"), 2);
        assert_eq!(err,
                   Err(RuntimeError::InvalidUnaryOperand { op:    "-",
                                                           found: "str",
                                                           line:  2, }));
    }

    #[test]
    fn negating_min_int_overflows() {
        let err = Interpreter::eval_unary(UnaryOperator::Negate, &Value::Integer(i64::MIN), 1);
        assert_eq!(err, Err(RuntimeError::Overflow { line: 1 }));
    }
}
