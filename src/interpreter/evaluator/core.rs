use std::io::{self, BufRead, BufReader, Write};

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::{
    ast::{Block, Expr},
    error::RuntimeError,
    interpreter::{
        config::InterpreterConfig,
        environment::Environment,
        evaluator::function::core::{map_key, set_element},
        value::core::Value,
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// How a statement finished.
///
/// `break`, `continue` and `return` travel outward as values of this type
/// until a loop or a call consumes them. Whatever reaches the top of a run
/// unconsumed becomes the matching "outside of" error.
#[derive(Debug, Clone)]
pub enum Flow {
    /// Ran to completion, producing a value.
    Normal(Value),
    /// A `break` looking for its loop.
    Break {
        /// The line of the `break`.
        line: usize,
    },
    /// A `continue` looking for its loop.
    Continue {
        /// The line of the `continue`.
        line: usize,
    },
    /// A `return` looking for its call.
    Return {
        /// The returned value, `none` for a bare `return;`.
        value: Value,
        /// The line of the `return`.
        line:  usize,
    },
}

/// Executes one program against one environment.
///
/// An `Interpreter` owns every piece of run state: the bindings, the text
/// written by `print`, the source of `input()` lines and the current call
/// depth. Create one per run; nothing is shared between instances.
///
/// ## Usage
///
/// ```
/// use puffing::{
///     interpreter::{config::InterpreterConfig, evaluator::core::Interpreter},
///     parse, tokenize,
/// };
///
/// let tokens = tokenize("let x as 2; print(x * 21);").unwrap();
/// let program = parse(&tokens).unwrap();
///
/// let mut interpreter = Interpreter::new(InterpreterConfig::default());
/// interpreter.run(&program).unwrap();
///
/// assert_eq!(interpreter.output(), "42");
/// ```
pub struct Interpreter {
    pub(crate) env:    Environment,
    pub(crate) config: InterpreterConfig,
    pub(crate) depth:  usize,
    output:            String,
    input:             Box<dyn BufRead>,
}

impl Interpreter {
    /// Creates an interpreter with an empty environment that reads input
    /// from stdin.
    #[must_use]
    pub fn new(config: InterpreterConfig) -> Self {
        Self { env: Environment::new(),
               config,
               depth: 0,
               output: String::new(),
               input: Box::new(BufReader::new(io::stdin())) }
    }

    /// Replaces the source of `input()` lines.
    ///
    /// # Example
    /// ```
    /// use std::io::Cursor;
    ///
    /// use puffing::{
    ///     interpreter::{config::InterpreterConfig, evaluator::core::Interpreter},
    ///     parse, tokenize,
    /// };
    ///
    /// let tokens = tokenize("print(input(int) + 1);").unwrap();
    /// let program = parse(&tokens).unwrap();
    ///
    /// let mut interpreter =
    ///     Interpreter::new(InterpreterConfig::default()).with_input(Cursor::new("41\n"));
    /// interpreter.run(&program).unwrap();
    ///
    /// assert_eq!(interpreter.output(), "42");
    /// ```
    #[must_use]
    pub fn with_input(mut self, input: impl BufRead + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Runs a program and returns the value of its last statement.
    ///
    /// # Errors
    /// Any runtime error aborts the run. Output printed before the failure and
    /// bindings made before it stay observable through [`Interpreter::output`]
    /// and [`Interpreter::bindings`].
    pub fn run(&mut self, program: &Block) -> EvalResult<Value> {
        debug!(statements = program.len(), "evaluating program");

        let value = match self.exec_block(program)? {
            Flow::Normal(value) => value,
            Flow::Break { line } => return Err(RuntimeError::BreakOutsideLoop { line }),
            Flow::Continue { line } => return Err(RuntimeError::ContinueOutsideLoop { line }),
            Flow::Return { line, .. } => return Err(RuntimeError::ReturnOutsideFunction { line }),
        };

        debug!(bytes = self.output.len(), "program finished");
        Ok(value)
    }

    /// Everything printed so far, in emission order.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Every binding of the environment, sorted by name.
    #[must_use]
    pub fn bindings(&self) -> Vec<(String, Value)> {
        self.env.bindings()
    }

    /// The live environment.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.env
    }

    /// Appends printed text, echoing it to stdout when configured to.
    pub(crate) fn emit(&mut self, text: &str) {
        self.output.push_str(text);
        if self.config.echo_output {
            let mut stdout = io::stdout().lock();
            // Echo failures leave the captured output intact.
            let _ = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush());
        }
    }

    /// Reads one line for `input()`, without its line terminator.
    ///
    /// # Returns
    /// `None` at end of input.
    pub(crate) fn read_line(&mut self, line: usize) -> EvalResult<Option<String>> {
        let mut buffer = String::new();
        let read =
            self.input
                .read_line(&mut buffer)
                .map_err(|e| RuntimeError::InputUnavailable { details: e.to_string(),
                                                              line })?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = buffer.trim_end_matches(['\n', '\r']).len();
        buffer.truncate(trimmed);
        Ok(Some(buffer))
    }

    /// Executes statements in order.
    ///
    /// # Returns
    /// `Flow::Normal` with the value of the last statement, or the first
    /// control-flow signal raised by a statement.
    pub fn exec_block(&mut self, block: &Block) -> EvalResult<Flow> {
        let mut last = Value::None;
        for statement in block {
            match self.exec_statement(statement)? {
                Flow::Normal(value) => last = value,
                signal => return Ok(signal),
            }
        }
        Ok(Flow::Normal(last))
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The evaluator
    /// dispatches on the expression variant and delegates to the handler for
    /// operators, indexing, calls, casts, formats, ranges and input.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    ///
    /// # Returns
    /// The value of the expression.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.into()),
            Expr::Variable { name, line } => self.env.lookup(name, *line),
            Expr::ArrayLiteral { elements, .. } => {
                let values = self.eval_arguments(elements)?;
                Ok(values.into())
            },
            Expr::SetLiteral { elements, line } => {
                let mut set = IndexSet::new();
                for element in elements {
                    let value = self.eval(element)?;
                    set.insert(set_element(&value, *line)?);
                }
                Ok(set.into())
            },
            Expr::MapLiteral { entries, line } => {
                let mut map = IndexMap::new();
                for (key, value) in entries {
                    let key = self.eval(key)?;
                    let value = self.eval(value)?;
                    map.insert(map_key(&key, *line)?, value);
                }
                Ok(map.into())
            },
            Expr::Index { container,
                          index,
                          line, } => {
                let container = self.eval(container)?;
                let index = self.eval(index)?;
                Self::eval_index(&container, &index, *line)
            },
            Expr::UnaryOp { op, expr, line } => {
                let operand = self.eval(expr)?;
                Self::eval_unary(*op, &operand, *line)
            },
            Expr::BinaryOp { left,
                             op,
                             right,
                             line, } => self.eval_binary_op(left, *op, right, *line),
            Expr::Cast { target, expr, line } => {
                let value = self.eval(expr)?;
                Self::eval_cast(*target, &value, *line)
            },
            Expr::Format { expr,
                           precision,
                           line, } => {
                let value = self.eval(expr)?;
                Self::eval_format(&value, *precision, *line)
            },
            Expr::Call { callee,
                         arguments,
                         line, } => self.eval_call(callee, arguments, *line),
            Expr::Lambda { decl, .. } => Ok(Value::Lambda(decl.clone())),
            Expr::Range { start,
                          stop,
                          step,
                          line, } => self.eval_range(start, stop, step.as_deref(), *line),
            Expr::Input { target, line } => self.eval_input(*target, *line),
        }
    }

    /// Evaluates expressions left to right.
    pub(crate) fn eval_arguments(&mut self, arguments: &[Expr]) -> EvalResult<Vec<Value>> {
        arguments.iter().map(|argument| self.eval(argument)).collect()
    }
}
