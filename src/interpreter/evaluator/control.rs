use crate::{
    ast::{Block, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::{core::Value, key::Key},
    },
    util::num::f64_to_i64_truncated,
};

/// What a loop does after one run of its body.
enum Step {
    Next,
    Exit,
    Propagate(Flow),
}

/// Consumes the loop signals of one body run, recording its value.
fn absorb(flow: Flow, last: &mut Value) -> Step {
    match flow {
        Flow::Normal(value) => {
            *last = value;
            Step::Next
        },
        Flow::Continue { .. } => Step::Next,
        Flow::Break { .. } => Step::Exit,
        signal @ Flow::Return { .. } => Step::Propagate(signal),
    }
}

impl Interpreter {
    /// Executes `for var in iterable { body }`.
    ///
    /// Arrays are iterated over a copy taken before the first run, text by
    /// character, sets by element and maps by key, all in insertion order.
    /// The loop variable is bound in the single environment; afterwards its
    /// previous binding is put back, or it is removed if it had none.
    ///
    /// # Returns
    /// The value of the last body run that completed normally, `none` if
    /// there was none, or a `return` travelling outward.
    ///
    /// # Errors
    /// `NotIterable` for numbers, booleans, `none` and callables.
    pub(crate) fn exec_for(&mut self,
                           var: &str,
                           iterable: &Expr,
                           body: &Block,
                           line: usize)
                           -> EvalResult<Flow> {
        let iterable = self.eval(iterable)?;
        let items: Vec<Value> = match &iterable {
            Value::Array(items) => items.borrow().clone(),
            Value::Text(text) => text.chars().map(|c| Value::Text(c.to_string())).collect(),
            Value::Set(elements) => elements.borrow().iter().map(Key::to_value).collect(),
            Value::Map(entries) => entries.borrow().keys().map(Key::to_value).collect(),
            other => {
                return Err(RuntimeError::NotIterable { found: other.type_name(),
                                                       line });
            },
        };

        let previous = self.env.get(var).cloned();
        let outcome = self.run_for(var, items, body);
        match previous {
            Some(value) => self.env.define(var, value),
            None => {
                self.env.remove(var);
            },
        }
        outcome
    }

    fn run_for(&mut self, var: &str, items: Vec<Value>, body: &Block) -> EvalResult<Flow> {
        let mut last = Value::None;
        for item in items {
            self.env.define(var, item);
            match absorb(self.exec_block(body)?, &mut last) {
                Step::Next => {},
                Step::Exit => break,
                Step::Propagate(signal) => return Ok(signal),
            }
        }
        Ok(Flow::Normal(last))
    }

    /// Executes `while condition { body }`.
    pub(crate) fn exec_while(&mut self, condition: &Expr, body: &Block) -> EvalResult<Flow> {
        let mut last = Value::None;
        while self.eval(condition)?.is_truthy() {
            match absorb(self.exec_block(body)?, &mut last) {
                Step::Next => {},
                Step::Exit => break,
                Step::Propagate(signal) => return Ok(signal),
            }
        }
        Ok(Flow::Normal(last))
    }

    /// Executes `do { body } while condition;`.
    ///
    /// The body runs once before the first check. A `continue` still goes
    /// through the condition check.
    pub(crate) fn exec_do_while(&mut self, body: &Block, condition: &Expr) -> EvalResult<Flow> {
        let mut last = Value::None;
        loop {
            match absorb(self.exec_block(body)?, &mut last) {
                Step::Next => {},
                Step::Exit => break,
                Step::Propagate(signal) => return Ok(signal),
            }
            if !self.eval(condition)?.is_truthy() {
                break;
            }
        }
        Ok(Flow::Normal(last))
    }

    /// Builds the array of `range(start, stop, step)`.
    ///
    /// Both ends are included when the step lands on them, in either
    /// direction. Float bounds are truncated toward zero. The step defaults
    /// to `1`.
    ///
    /// # Errors
    /// `InvalidRange` for a zero step or a bound that is not a finite number.
    ///
    /// # Example
    /// ```
    /// use puffing::execute;
    ///
    /// let run = execute("print(range(3), range(10, 1, -4));").unwrap();
    /// assert_eq!(run.output, "[1, 2, 3][10, 6, 2]");
    /// ```
    pub(crate) fn eval_range(&mut self,
                             start: &Expr,
                             stop: &Expr,
                             step: Option<&Expr>,
                             line: usize)
                             -> EvalResult<Value> {
        let start = self.eval(start)?;
        let stop = self.eval(stop)?;
        let step = match step {
            Some(step) => self.eval(step)?,
            None => Value::Integer(1),
        };

        let start = range_bound(&start, "start", line)?;
        let stop = range_bound(&stop, "stop", line)?;
        let step = range_bound(&step, "step", line)?;
        if step == 0 {
            return Err(RuntimeError::InvalidRange { details: "step must not be zero".to_string(),
                                                    line });
        }

        let mut items = Vec::new();
        let mut current = start;
        while (step > 0 && current <= stop) || (step < 0 && current >= stop) {
            items.push(Value::Integer(current));
            match current.checked_add(step) {
                Some(next) => current = next,
                None => break,
            }
        }
        Ok(items.into())
    }
}

/// Reads one `range` argument as an int.
fn range_bound(value: &Value, role: &str, line: usize) -> EvalResult<i64> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Float(f) => {
            let error = RuntimeError::InvalidRange { details: format!("{role} {value} is not finite"),
                                                     line };
            f64_to_i64_truncated(*f, error)
        },
        other => Err(RuntimeError::InvalidRange { details: format!("{role} must be a number, got {}",
                                                                   other.type_name()),
                                                  line }),
    }
}
