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
    /// Evaluates an exponentiation operation.
    ///
    /// Int–int exponentiation with a non-negative exponent uses checked
    /// arithmetic and stays an int. Bases `0`, `1` and `-1` accept any such
    /// exponent without overflowing. A negative int exponent, or any float
    /// operand, is computed in floating point.
    ///
    /// # Parameters
    /// - `base`: The base value.
    /// - `exponent`: The exponent value.
    /// - `line`: Line number for error reporting.
    ///
    /// # Errors
    /// - `DivisionByZero` for zero raised to a negative power.
    /// - `Overflow` when the result does not fit: an int past the 64-bit
    ///   range, or an infinite float from finite operands.
    /// - `MathDomain` when finite operands give no real result, such as a
    ///   negative base with a fractional exponent.
    /// - `TypeMismatch` for non-numeric operands.
    ///
    /// # Example
    /// ```
    /// use puffing::interpreter::{evaluator::core::Interpreter, value::core::Value};
    ///
    /// let result = Interpreter::eval_pow(&Value::Integer(2), &Value::Integer(10), 1).unwrap();
    /// assert_eq!(result, Value::Integer(1024));
    ///
    /// let result = Interpreter::eval_pow(&Value::Integer(2), &Value::Integer(-1), 1).unwrap();
    /// assert_eq!(result, Value::Float(0.5));
    /// ```
    pub fn eval_pow(base: &Value, exponent: &Value, line: usize) -> EvalResult<Value> {
        use Value::{Float, Integer};

        if let (Integer(b), Integer(e)) = (base, exponent)
           && *e >= 0
        {
            // These bases stay in range for any exponent.
            match *b {
                0 => return Ok(Integer(i64::from(*e == 0))),
                1 => return Ok(Integer(1)),
                -1 => return Ok(Integer(if e % 2 == 0 { 1 } else { -1 })),
                _ => {},
            }
            let e = u32::try_from(*e).map_err(|_| RuntimeError::Overflow { line })?;
            return b.checked_pow(e).map(Integer).ok_or(RuntimeError::Overflow { line });
        }

        if !(base.is_number() && exponent.is_number()) {
            return Err(unsupported(BinaryOperator::Pow, base, exponent, line));
        }

        let b = base.as_number(line)?;
        let e = exponent.as_number(line)?;
        if b == 0.0 && e < 0.0 {
            return Err(RuntimeError::DivisionByZero { line });
        }

        let result = b.powf(e);
        if result.is_nan() && !b.is_nan() && !e.is_nan() {
            return Err(RuntimeError::MathDomain { function: "**".to_string(),
                                                  line });
        }
        if result.is_infinite() && b.is_finite() && e.is_finite() {
            return Err(RuntimeError::Overflow { line });
        }
        Ok(Float(result))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn zero_to_a_negative_power() {
        assert_eq!(Interpreter::eval_pow(&Value::Integer(0), &Value::Integer(-2), 3),
                   Err(RuntimeError::DivisionByZero { line: 3 }));
    }

    #[test]
    fn huge_int_powers_overflow() {
        assert_eq!(Interpreter::eval_pow(&Value::Integer(10), &Value::Integer(40), 1),
                   Err(RuntimeError::Overflow { line: 1 }));
        assert_eq!(Interpreter::eval_pow(&Value::Integer(2), &Value::Integer(i64::MAX), 1),
                   Err(RuntimeError::Overflow { line: 1 }));
    }

    #[test]
    fn unit_bases_take_any_exponent() {
        let pow = |b, e| Interpreter::eval_pow(&Value::Integer(b), &Value::Integer(e), 1);
        assert_eq!(pow(1, 5_000_000_000), Ok(Value::Integer(1)));
        assert_eq!(pow(-1, 5_000_000_001), Ok(Value::Integer(-1)));
        assert_eq!(pow(-1, i64::MAX - 1), Ok(Value::Integer(1)));
        assert_eq!(pow(0, i64::MAX), Ok(Value::Integer(0)));
        assert_eq!(pow(0, 0), Ok(Value::Integer(1)));
        assert_eq!(pow(2, 5_000_000_000), Err(RuntimeError::Overflow { line: 1 }));
    }

    #[test]
    fn fractional_power_of_negative_base() {
        let err = Interpreter::eval_pow(&Value::Integer(-8), &Value::Float(0.5), 1).unwrap_err();
        assert!(matches!(err, RuntimeError::MathDomain { .. }));
    }

    #[test]
    fn float_powers() {
        assert_eq!(Interpreter::eval_pow(&Value::Float(9.0), &Value::Float(0.5), 1).unwrap(),
                   Value::Float(3.0));
    }
}
