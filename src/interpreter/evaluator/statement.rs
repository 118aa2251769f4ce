use crate::{
    ast::{BinaryOperator, Block, Expr, Stmt},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::{core::Value, key::Key},
    },
    util::num::i64_to_f64,
};

impl Interpreter {
    /// Executes one statement.
    ///
    /// Declarations, assignments and expression statements complete with the
    /// value they produced. `print`, `lib` and an `if` with no taken branch
    /// complete with `none`. `break`, `continue` and `return` complete with
    /// the matching signal for the enclosing loop or call to consume.
    ///
    /// # Parameters
    /// - `stmt`: The statement to execute.
    ///
    /// # Returns
    /// How the statement finished.
    pub fn exec_statement(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::Let { name,
                        value,
                        constant,
                        .. } => {
                let value = self.eval(value)?;
                if *constant {
                    self.env.define_constant(name, value.clone());
                } else {
                    self.env.define(name, value.clone());
                }
                Ok(Flow::Normal(value))
            },
            Stmt::Destructure { names,
                                value,
                                constant,
                                line, } => self.exec_destructure(names, value, *constant, *line),
            Stmt::Assign { name, value, line } => {
                self.env.check_writable(name, *line)?;
                let value = self.eval(value)?;
                self.env.define(name, value.clone());
                Ok(Flow::Normal(value))
            },
            Stmt::IndexAssign { target,
                                indices,
                                value,
                                line, } => self.exec_index_assign(target, indices, value, *line),
            Stmt::CompoundAssign { name,
                                   op,
                                   value,
                                   line, } => self.exec_compound(name, *op, value, *line),
            Stmt::Increment { name,
                              delta,
                              prefix,
                              line, } => self.exec_increment(name, *delta, *prefix, *line),
            Stmt::Print { arguments, .. } => {
                let values = self.eval_arguments(arguments)?;
                let text: String = values.iter().map(ToString::to_string).collect();
                self.emit(&text);
                Ok(Flow::Normal(Value::None))
            },
            Stmt::If { branches,
                       else_branch,
                       .. } => self.exec_if(branches, else_branch.as_ref()),
            Stmt::For { var,
                        iterable,
                        body,
                        line, } => self.exec_for(var, iterable, body, *line),
            Stmt::While { condition, body, .. } => self.exec_while(condition, body),
            Stmt::DoWhile { body, condition, .. } => self.exec_do_while(body, condition),
            Stmt::Break { line } => Ok(Flow::Break { line: *line }),
            Stmt::Continue { line } => Ok(Flow::Continue { line: *line }),
            Stmt::Return { value, line } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::None,
                };
                Ok(Flow::Return { value,
                                  line: *line })
            },
            Stmt::FunctionDef { decl, line } => {
                if self.env.is_constant(&decl.name) {
                    return Err(RuntimeError::ConstantModification { name: decl.name.clone(),
                                                                    line: *line });
                }
                let function = Value::Function(decl.clone());
                self.env.define(&decl.name, function.clone());
                Ok(Flow::Normal(function))
            },
            Stmt::Import { path, line } => {
                self.import_library(path, *line)?;
                Ok(Flow::Normal(Value::None))
            },
            Stmt::Expression { expr, .. } => self.eval(expr).map(Flow::Normal),
        }
    }

    /// Executes `let [a, b, ...] as value;`.
    ///
    /// Arrays unpack by element, text by character and sets in insertion
    /// order. Extra values are ignored.
    ///
    /// # Returns
    /// An array of every unpacked value.
    ///
    /// # Errors
    /// - `InvalidDestructureType` for maps and non-containers.
    /// - `DestructureMismatch` when there are fewer values than names.
    fn exec_destructure(&mut self,
                        names: &[String],
                        value: &Expr,
                        constant: bool,
                        line: usize)
                        -> EvalResult<Flow> {
        let value = self.eval(value)?;
        let items: Vec<Value> = match &value {
            Value::Array(items) => items.borrow().clone(),
            Value::Text(text) => text.chars().map(|c| Value::Text(c.to_string())).collect(),
            Value::Set(elements) => elements.borrow().iter().map(Key::to_value).collect(),
            other => {
                return Err(RuntimeError::InvalidDestructureType { found: other.type_name(),
                                                                  line });
            },
        };

        if items.len() < names.len() {
            return Err(RuntimeError::DestructureMismatch { expected: names.len(),
                                                           found: items.len(),
                                                           line });
        }

        for (name, item) in names.iter().zip(&items) {
            if constant {
                self.env.define_constant(name, item.clone());
            } else {
                self.env.define(name, item.clone());
            }
        }
        Ok(Flow::Normal(items.into()))
    }

    /// Executes `+e x;` and the other operator-prefixed updates.
    ///
    /// The target is checked before the operand is evaluated, then updated to
    /// `x op e`.
    fn exec_compound(&mut self,
                     name: &str,
                     op: BinaryOperator,
                     value: &Expr,
                     line: usize)
                     -> EvalResult<Flow> {
        self.env.check_writable(name, line)?;
        let current = self.env.lookup(name, line)?;
        let operand = self.eval(value)?;
        let updated = Self::eval_binary(op, &current, &operand, line)?;
        self.env.define(name, updated.clone());
        Ok(Flow::Normal(updated))
    }

    /// Executes `x++`, `++x`, `x--` and `--x`.
    ///
    /// # Returns
    /// The new value for the prefix forms, the old value for the postfix
    /// forms.
    ///
    /// # Errors
    /// - `InvalidIncrement` when `x` is not a number.
    /// - `Overflow` when an int leaves the 64-bit range.
    fn exec_increment(&mut self,
                      name: &str,
                      delta: i64,
                      prefix: bool,
                      line: usize)
                      -> EvalResult<Flow> {
        self.env.check_writable(name, line)?;
        let current = self.env.lookup(name, line)?;
        let updated = match current {
            Value::Integer(n) => {
                Value::Integer(n.checked_add(delta).ok_or(RuntimeError::Overflow { line })?)
            },
            Value::Float(f) => Value::Float(f + i64_to_f64(delta)),
            ref other => {
                return Err(RuntimeError::InvalidIncrement { name: name.to_string(),
                                                            found: other.type_name(),
                                                            line });
            },
        };
        self.env.define(name, updated.clone());
        Ok(Flow::Normal(if prefix { updated } else { current }))
    }

    /// Runs the first branch whose condition is truthy, else the `else`
    /// body.
    fn exec_if(&mut self,
               branches: &[(Expr, Block)],
               else_branch: Option<&Block>)
               -> EvalResult<Flow> {
        for (condition, body) in branches {
            if self.eval(condition)?.is_truthy() {
                return self.exec_block(body);
            }
        }
        match else_branch {
            Some(body) => self.exec_block(body),
            None => Ok(Flow::Normal(Value::None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        error::{Error, RuntimeError},
        execute,
        interpreter::value::core::Value,
    };

    fn runtime_error(source: &str) -> RuntimeError {
        match execute(source) {
            Err(Error::Runtime(err)) => err,
            other => panic!("expected a runtime error, got {other:?}"),
        }
    }

    #[test]
    fn postfix_yields_old_value() {
        let run = execute("let i as 1; let a as i++; let b as ++i; print(a, b, i);").unwrap();
        assert_eq!(run.output, "133");
    }

    #[test]
    fn increment_of_text_fails() {
        let err = runtime_error(r#"let s as "a"; s++;"#);
        assert!(matches!(err, RuntimeError::InvalidIncrement { found: "str", .. }));
    }

    #[test]
    fn compound_assignment_applies_operator() {
        let run = execute("let x as 10; +5x; *2x; -1x; %4x; print(x);").unwrap();
        assert_eq!(run.output, "1");
    }

    #[test]
    fn destructuring_text_and_short_values() {
        let run = execute(r#"let [a, b] as "hey"; print(a, b);"#).unwrap();
        assert_eq!(run.output, "he");

        let err = runtime_error("let [a, b, c] as [1, 2];");
        assert_eq!(err,
                   RuntimeError::DestructureMismatch { expected: 3,
                                                       found:    2,
                                                       line:     1, });
    }

    #[test]
    fn maps_cannot_be_destructured() {
        let err = runtime_error(r#"let [a] as {"k": 1};"#);
        assert!(matches!(err, RuntimeError::InvalidDestructureType { found: "map", .. }));
    }

    #[test]
    fn locked_destructure_is_constant() {
        let err = runtime_error("lock [a, b] as [1, 2]; b as 3;");
        assert!(matches!(err, RuntimeError::ConstantModification { .. }));
    }

    #[test]
    fn if_without_taken_branch_is_none() {
        let run = execute("if false { 1; }").unwrap();
        assert_eq!(run.value, Value::None);
    }

    #[test]
    fn function_definition_cannot_replace_constant() {
        let err = runtime_error("lock f as 1;\nfun f() { return 2; }");
        assert_eq!(err,
                   RuntimeError::ConstantModification { name: "f".into(),
                                                        line: 2, });
    }
}
