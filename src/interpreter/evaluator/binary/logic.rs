use super::arithmetic::unsupported;
use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates `and` or `or` on two already evaluated operands.
    ///
    /// Both sides always run before this is reached, so a failing right
    /// operand fails the whole expression. Operands are judged by truthiness
    /// and the result is always a boolean.
    ///
    /// # Example
    /// ```
    /// use puffing::{execute, interpreter::value::core::Value};
    ///
    /// let run = execute(r#"true or "x";"#).unwrap();
    /// assert_eq!(run.value, Value::Bool(true));
    ///
    /// // The right side still runs.
    /// assert!(execute("false and 1 / 0 = 1;").is_err());
    /// ```
    pub(crate) fn eval_logic(op: BinaryOperator,
                             left: &Value,
                             right: &Value,
                             line: usize)
                             -> EvalResult<Value> {
        match op {
            BinaryOperator::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
            BinaryOperator::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
            _ => Err(unsupported(op, left, right, line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::RuntimeError;

    #[test]
    fn truthiness_decides() {
        let empty = Value::array_from([]);
        let result = Interpreter::eval_logic(BinaryOperator::Or, &empty, &Value::from("x"), 1);
        assert_eq!(result.unwrap(), Value::Bool(true));
        let result = Interpreter::eval_logic(BinaryOperator::And, &Value::Integer(1), &empty, 1);
        assert_eq!(result.unwrap(), Value::Bool(false));
    }

    #[test]
    fn other_operators_are_rejected() {
        let err = Interpreter::eval_logic(BinaryOperator::Add, &Value::None, &Value::None, 6).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { line: 6, .. }));
    }
}
