use crate::{
    ast::CastType,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
    util::num::{f64_to_i64_truncated, format_float, i64_to_f64},
};

impl Interpreter {
    /// Evaluates a type cast such as `(int)x` or `x(str)`.
    ///
    /// - `int`: truncates floats toward zero, maps booleans to `0`/`1` and
    ///   parses text after trimming surrounding whitespace.
    /// - `float`: the same sources, producing a float.
    /// - `str`: the printed form of any value.
    /// - `bool`: the truthiness of any value.
    ///
    /// # Errors
    /// `InvalidCast` when the value cannot be converted, including text that
    /// does not parse and non-finite floats cast to `int`.
    ///
    /// # Example
    /// ```
    /// use puffing::{
    ///     ast::CastType,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let n = Interpreter::eval_cast(CastType::Int, &Value::Float(-3.9), 1).unwrap();
    /// assert_eq!(n, Value::Integer(-3));
    ///
    /// let n = Interpreter::eval_cast(CastType::Int, &Value::from(" 42 "), 1).unwrap();
    /// assert_eq!(n, Value::Integer(42));
    ///
    /// let text = Interpreter::eval_cast(CastType::Str, &Value::Float(2.0), 1).unwrap();
    /// assert_eq!(text, Value::from("2.0"));
    ///
    /// assert!(Interpreter::eval_cast(CastType::Int, &Value::from("4x"), 1).is_err());
    /// ```
    pub fn eval_cast(target: CastType, value: &Value, line: usize) -> EvalResult<Value> {
        let invalid = || RuntimeError::InvalidCast { value: value.to_string(),
                                                     target: target.keyword(),
                                                     line };

        match target {
            CastType::Int => match value {
                Value::Integer(n) => Ok(Value::Integer(*n)),
                Value::Float(f) => f64_to_i64_truncated(*f, invalid()).map(Value::Integer),
                Value::Bool(b) => Ok(Value::Integer(i64::from(*b))),
                Value::Text(s) => s.trim().parse().map(Value::Integer).map_err(|_| invalid()),
                _ => Err(invalid()),
            },
            CastType::Float => match value {
                Value::Integer(n) => Ok(Value::Float(i64_to_f64(*n))),
                Value::Float(f) => Ok(Value::Float(*f)),
                Value::Bool(b) => Ok(Value::Float(f64::from(u8::from(*b)))),
                Value::Text(s) => s.trim().parse().map(Value::Float).map_err(|_| invalid()),
                _ => Err(invalid()),
            },
            CastType::Str => Ok(Value::Text(value.to_string())),
            CastType::Bool => Ok(Value::Bool(value.is_truthy())),
        }
    }

    /// Renders a number with a fixed count of decimals, as in `x.2f`.
    ///
    /// # Errors
    /// `InvalidFormat` when the value is not a number.
    ///
    /// # Example
    /// ```
    /// use puffing::interpreter::{evaluator::core::Interpreter, value::core::Value};
    ///
    /// let text = Interpreter::eval_format(&Value::Float(3.14159), 2, 1).unwrap();
    /// assert_eq!(text, Value::from("3.14"));
    ///
    /// let text = Interpreter::eval_format(&Value::Integer(7), 3, 1).unwrap();
    /// assert_eq!(text, Value::from("7.000"));
    /// ```
    pub fn eval_format(value: &Value, precision: usize, line: usize) -> EvalResult<Value> {
        let number = match value {
            Value::Integer(n) => i64_to_f64(*n),
            Value::Float(f) => *f,
            other => {
                return Err(RuntimeError::InvalidFormat { value: other.to_string(),
                                                         line });
            },
        };

        if !number.is_finite() {
            return Ok(Value::Text(format_float(number)));
        }
        Ok(Value::Text(format!("{number:.precision$}")))
    }

    /// Reads one line for `input()` / `input(type)`.
    ///
    /// Without a type the line is returned as text. `int` and `float` parse
    /// the trimmed line. `bool` is true for `true`, `1`, `yes` or `y` in any
    /// letter case, and false for anything else.
    ///
    /// # Errors
    /// - `InvalidInput` when the line does not convert or input has ended.
    /// - `InputUnavailable` when reading fails.
    pub(crate) fn eval_input(&mut self,
                             target: Option<CastType>,
                             line: usize)
                             -> EvalResult<Value> {
        let keyword = target.map_or("str", CastType::keyword);
        let Some(text) = self.read_line(line)? else {
            return Err(RuntimeError::InvalidInput { target: keyword,
                                                    details: "end of input".to_string(),
                                                    line });
        };

        let invalid = |details: String| RuntimeError::InvalidInput { target: keyword,
                                                                     details,
                                                                     line };
        match target {
            None | Some(CastType::Str) => Ok(Value::Text(text)),
            Some(CastType::Int) => {
                text.trim()
                    .parse()
                    .map(Value::Integer)
                    .map_err(|e: std::num::ParseIntError| invalid(format!("{text:?}: {e}")))
            },
            Some(CastType::Float) => {
                text.trim()
                    .parse()
                    .map(Value::Float)
                    .map_err(|e: std::num::ParseFloatError| invalid(format!("{text:?}: {e}")))
            },
            Some(CastType::Bool) => {
                let truthy = matches!(text.to_lowercase().as_str(), "true" | "1" | "yes" | "y");
                Ok(Value::Bool(truthy))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::config::InterpreterConfig;

    fn reader(input: &'static str) -> Interpreter {
        Interpreter::new(InterpreterConfig::default()).with_input(Cursor::new(input))
    }

    #[test]
    fn casting_infinity_to_int_fails() {
        let err = Interpreter::eval_cast(CastType::Int, &Value::Float(f64::INFINITY), 5);
        assert_eq!(err,
                   Err(RuntimeError::InvalidCast { value:  "inf".into(),
                                                   target: "int",
                                                   line:   5, }));
    }

    #[test]
    fn booleans_cast_to_numbers() {
        assert_eq!(Interpreter::eval_cast(CastType::Float, &Value::Bool(true), 1).unwrap(),
                   Value::Float(1.0));
        assert_eq!(Interpreter::eval_cast(CastType::Int, &Value::Bool(false), 1).unwrap(),
                   Value::Integer(0));
    }

    #[test]
    fn containers_do_not_cast_to_numbers() {
        let err = Interpreter::eval_cast(CastType::Float, &Value::array_from([]), 1).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidCast { target: "float", .. }));
    }

    #[test]
    fn text_is_not_formattable() {
        let err = Interpreter::eval_format(&Value::from("1.5"), 1, 2).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidFormat { line: 2, .. }));
    }

    #[test]
    fn input_reads_lines_in_order() {
        let mut interpreter = reader("7\n2.5\nYes\nplain text\n");
        assert_eq!(interpreter.eval_input(Some(CastType::Int), 1).unwrap(), Value::Integer(7));
        assert_eq!(interpreter.eval_input(Some(CastType::Float), 1).unwrap(), Value::Float(2.5));
        assert_eq!(interpreter.eval_input(Some(CastType::Bool), 1).unwrap(), Value::Bool(true));
        assert_eq!(interpreter.eval_input(None, 1).unwrap(), Value::from("plain text"));
    }

    #[test]
    fn input_past_the_end_fails() {
        let mut interpreter = reader("");
        let err = interpreter.eval_input(Some(CastType::Int), 4).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidInput { target: "int", line: 4, .. }));
    }

    #[test]
    fn unparsable_input_fails() {
        let mut interpreter = reader("seven\n");
        let err = interpreter.eval_input(Some(CastType::Int), 1).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidInput { target: "int", .. }));
    }
}
