use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
    util::num::{floor_mod_f64, floor_mod_i64},
};

/// Builds the error for operands an arithmetic operator does not accept.
pub(super) fn unsupported(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> RuntimeError {
    RuntimeError::TypeMismatch { details: format!("unsupported operand types for {op}: {} and {}",
                                                  left.type_name(),
                                                  right.type_name()),
                                 line }
}

impl Interpreter {
    /// Evaluates `+`, `-`, `*`, `/` and `%`.
    ///
    /// `+` concatenates when either side is text, using the printed form of
    /// the other side, and joins two arrays into a new one. Otherwise both
    /// operands must be numbers. Two ints stay an int except for `/`, which
    /// always produces a float. Mixing an int with a float produces a float.
    /// `%` is floored: the result takes the sign of the divisor.
    ///
    /// # Parameters
    /// - `op`: One of `Add`, `Sub`, `Mul`, `Div`, `Mod`.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Errors
    /// - `DivisionByZero` / `ModuloByZero` for a zero right operand.
    /// - `Overflow` when int arithmetic leaves the 64-bit range.
    /// - `TypeMismatch` for any other operand kinds, or for an operator that
    ///   is not arithmetic.
    ///
    /// # Example
    /// ```
    /// use puffing::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let text = Interpreter::eval_arithmetic(BinaryOperator::Add,
    ///                                         &Value::from("n="),
    ///                                         &Value::Integer(4),
    ///                                         1).unwrap();
    /// assert_eq!(text, Value::from("n=4"));
    ///
    /// let rem = Interpreter::eval_arithmetic(BinaryOperator::Mod,
    ///                                        &Value::Integer(-7),
    ///                                        &Value::Integer(3),
    ///                                        1).unwrap();
    /// assert_eq!(rem, Value::Integer(2));
    /// ```
    pub fn eval_arithmetic(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        use BinaryOperator::{Add, Div, Mod, Mul, Sub};
        use Value::{Array, Float, Integer, Text};

        match (op, left, right) {
            (Add, Text(_), _) | (Add, _, Text(_)) => Ok(Text(format!("{left}{right}"))),
            (Add, Array(a), Array(b)) => {
                let mut joined = a.borrow().clone();
                joined.extend(b.borrow().iter().cloned());
                Ok(joined.into())
            },

            (Div, _, _) => {
                let divisor = Self::numeric_operand(op, left, right, line)?.1;
                if divisor == 0.0 {
                    return Err(RuntimeError::DivisionByZero { line });
                }
                Ok(Float(left.as_number(line)? / divisor))
            },

            (_, Integer(a), Integer(b)) => {
                let result = match op {
                    Add => a.checked_add(*b),
                    Sub => a.checked_sub(*b),
                    Mul => a.checked_mul(*b),
                    Mod => {
                        if *b == 0 {
                            return Err(RuntimeError::ModuloByZero { line });
                        }
                        Some(floor_mod_i64(*a, *b))
                    },
                    _ => return Err(unsupported(op, left, right, line)),
                };
                result.map(Integer).ok_or(RuntimeError::Overflow { line })
            },

            _ => {
                let (a, b) = Self::numeric_operand(op, left, right, line)?;
                Ok(Float(match op {
                             Add => a + b,
                             Sub => a - b,
                             Mul => a * b,
                             Mod => {
                                 if b == 0.0 {
                                     return Err(RuntimeError::ModuloByZero { line });
                                 }
                                 floor_mod_f64(a, b)
                             },
                             _ => return Err(unsupported(op, left, right, line)),
                         }))
            },
        }
    }

    /// Reads both operands as floats, failing unless both are numbers.
    fn numeric_operand(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<(f64, f64)> {
        if !(left.is_number() && right.is_number()) {
            return Err(unsupported(op, left, right, line));
        }
        Ok((left.as_number(line)?, right.as_number(line)?))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn apply(op: BinaryOperator, left: Value, right: Value) -> EvalResult<Value> {
        Interpreter::eval_arithmetic(op, &left, &right, 1)
    }

    #[test]
    fn division_always_produces_a_float() {
        assert_eq!(apply(BinaryOperator::Div, Value::Integer(6), Value::Integer(3)).unwrap(),
                   Value::Float(2.0));
    }

    #[test]
    fn zero_divisors_are_rejected() {
        assert_eq!(apply(BinaryOperator::Div, Value::Integer(1), Value::Float(0.0)),
                   Err(RuntimeError::DivisionByZero { line: 1 }));
        assert_eq!(apply(BinaryOperator::Mod, Value::Float(1.5), Value::Integer(0)),
                   Err(RuntimeError::ModuloByZero { line: 1 }));
    }

    #[test]
    fn float_modulo_is_floored() {
        assert_eq!(apply(BinaryOperator::Mod, Value::Float(-1.5), Value::Integer(2)).unwrap(),
                   Value::Float(0.5));
    }

    #[test]
    fn int_overflow_is_reported() {
        assert_eq!(apply(BinaryOperator::Mul, Value::Integer(i64::MAX), Value::Integer(2)),
                   Err(RuntimeError::Overflow { line: 1 }));
    }

    #[test]
    fn concatenation_uses_printed_forms() {
        let joined = apply(BinaryOperator::Add, Value::Float(1.0), Value::from("x")).unwrap();
        assert_eq!(joined, Value::from("1.0x"));
    }

    #[test]
    fn arrays_concatenate_into_a_new_array() {
        let a = Value::array_from([Value::Integer(1)]);
        let b = Value::array_from([Value::Integer(2)]);
        let joined = apply(BinaryOperator::Add, a.clone(), b).unwrap();
        assert_eq!(joined.to_string(), "[1, 2]");
        assert_eq!(a.to_string(), "[1]");
    }

    #[test]
    fn booleans_are_not_numbers() {
        let err = apply(BinaryOperator::Sub, Value::Bool(true), Value::Integer(1)).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { .. }));
    }

    #[test]
    fn non_arithmetic_operators_are_rejected() {
        let err = apply(BinaryOperator::Pow, Value::Integer(2), Value::Integer(3)).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { line: 1, .. }));
        let err = apply(BinaryOperator::Less, Value::Float(2.0), Value::Integer(3)).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { line: 1, .. }));
    }
}
