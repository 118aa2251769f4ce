use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Flow, Interpreter},
            function::{core::map_key, map},
        },
        value::core::Value,
    },
    util::num::normalize_index,
};

impl Interpreter {
    /// Reads one element of a container.
    ///
    /// Arrays and text take 1-based int positions, with negative positions
    /// counting back from the end (`-1` is the last element). Text yields a
    /// one-character text. Maps take a key.
    ///
    /// # Parameters
    /// - `container`: The value being indexed.
    /// - `index`: Position or key.
    /// - `line`: Line number for error reporting.
    ///
    /// # Errors
    /// - `InvalidIndexType` for a non-int position.
    /// - `IndexOutOfRange` for position `0` or a position past either end.
    /// - `InvalidKeyType` / `KeyNotFound` for map lookups.
    /// - `NotIndexable` for any other container.
    ///
    /// # Example
    /// ```
    /// use puffing::interpreter::{evaluator::core::Interpreter, value::core::Value};
    ///
    /// let items = Value::array_from([Value::Integer(10), Value::Integer(20), Value::Integer(30)]);
    ///
    /// let first = Interpreter::eval_index(&items, &Value::Integer(1), 1).unwrap();
    /// assert_eq!(first, Value::Integer(10));
    ///
    /// let last = Interpreter::eval_index(&items, &Value::Integer(-1), 1).unwrap();
    /// assert_eq!(last, Value::Integer(30));
    ///
    /// let letter = Interpreter::eval_index(&Value::from("puff"), &Value::Integer(2), 1).unwrap();
    /// assert_eq!(letter, Value::from("u"));
    ///
    /// assert!(Interpreter::eval_index(&items, &Value::Integer(0), 1).is_err());
    /// ```
    pub fn eval_index(container: &Value, index: &Value, line: usize) -> EvalResult<Value> {
        match container {
            Value::Array(items) => {
                let items = items.borrow();
                let slot = Self::position(index, "array", items.len(), line)?;
                Ok(items[slot].clone())
            },
            Value::Text(text) => {
                let slot = Self::position(index, "str", text.chars().count(), line)?;
                Ok(text.chars().nth(slot).map(String::from).unwrap_or_default().into())
            },
            Value::Map(_) => map::lookup(container, index, line),
            other => Err(RuntimeError::NotIndexable { found: other.type_name(),
                                                      line }),
        }
    }

    /// Turns a user-facing position into a storage offset.
    fn position(index: &Value,
                container: &'static str,
                length: usize,
                line: usize)
                -> EvalResult<usize> {
        let Value::Integer(index) = *index else {
            return Err(RuntimeError::InvalidIndexType { found: index.type_name(),
                                                        line });
        };
        normalize_index(index, length).map_err(|_| RuntimeError::IndexOutOfRange { index,
                                                                                   container,
                                                                                   length,
                                                                                   line })
    }

    /// Executes `name[i]...[n] as value;`.
    ///
    /// The value is evaluated first, then the indices from the outermost
    /// inwards. Every index but the last walks into nested containers the way
    /// a read would. The last one replaces an existing array element or
    /// inserts/replaces a map entry. Because containers are shared, the
    /// change is visible through every name holding them.
    ///
    /// # Errors
    /// - `UndefinedVariable` / `ConstantModification` for the root name.
    /// - `StringIndexAssignment` when the final container is text.
    /// - Any error of [`Interpreter::eval_index`] along the chain.
    pub(crate) fn exec_index_assign(&mut self,
                                    target: &str,
                                    indices: &[Expr],
                                    value: &Expr,
                                    line: usize)
                                    -> EvalResult<Flow> {
        let value = self.eval(value)?;
        let keys = self.eval_arguments(indices)?;
        self.env.check_writable(target, line)?;

        let Some((last, prefix)) = keys.split_last() else {
            self.env.assign(target, value.clone(), line)?;
            return Ok(Flow::Normal(value));
        };

        let mut current = self.env.lookup(target, line)?;
        for key in prefix {
            current = Self::eval_index(&current, key, line)?;
        }

        match &current {
            Value::Array(items) => {
                let mut items = items.borrow_mut();
                let slot = Self::position(last, "array", items.len(), line)?;
                items[slot] = value.clone();
            },
            Value::Map(entries) => {
                let key = map_key(last, line)?;
                entries.borrow_mut().insert(key, value.clone());
            },
            Value::Text(_) => return Err(RuntimeError::StringIndexAssignment { line }),
            other => {
                return Err(RuntimeError::NotIndexable { found: other.type_name(),
                                                        line });
            },
        }

        Ok(Flow::Normal(value))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn float_positions_are_rejected() {
        let items = Value::array_from([Value::Integer(1)]);
        let err = Interpreter::eval_index(&items, &Value::Float(1.0), 3).unwrap_err();
        assert_eq!(err, RuntimeError::InvalidIndexType { found: "float", line: 3 });
    }

    #[test]
    fn out_of_range_reports_length() {
        let err = Interpreter::eval_index(&Value::from("abc"), &Value::Integer(-4), 1).unwrap_err();
        assert_eq!(err,
                   RuntimeError::IndexOutOfRange { index:     -4,
                                                   container: "str",
                                                   length:    3,
                                                   line:      1, });
    }

    #[test]
    fn numbers_are_not_indexable() {
        let err = Interpreter::eval_index(&Value::Integer(5), &Value::Integer(1), 1).unwrap_err();
        assert!(matches!(err, RuntimeError::NotIndexable { found: "int", .. }));
    }

    #[test]
    fn text_indexing_counts_characters() {
        let letter = Interpreter::eval_index(&Value::from("héllo"), &Value::Integer(3), 1);
        assert_eq!(letter.unwrap(), Value::from("l"));
    }
}
