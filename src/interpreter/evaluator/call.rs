use tracing::trace;

use crate::{
    ast::{Block, Expr, LambdaBody},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Flow, Interpreter},
            function::core::{Arity, lookup_builtin},
        },
        value::core::Value,
    },
};

/// What a user-defined callable runs.
enum Body<'a> {
    Block(&'a Block),
    Expression(&'a Expr),
}

impl Interpreter {
    /// Evaluates a call expression.
    ///
    /// A bare name resolves in this order: a bound function or lambda, a
    /// builtin, a bound library native. Any other callee expression is
    /// evaluated and must produce something callable.
    ///
    /// # Errors
    /// - `FunctionNotFound` for a name that is neither bound nor a builtin.
    /// - `NotCallable` when the callee is bound to a plain value.
    /// - `ArgumentCount`, `RecursionTooDeep`, and anything the body raises.
    pub(crate) fn eval_call(&mut self,
                            callee: &Expr,
                            arguments: &[Expr],
                            line: usize)
                            -> EvalResult<Value> {
        if let Expr::Variable { name, .. } = callee {
            return self.call_by_name(name, arguments, line);
        }

        let target = self.eval(callee)?;
        if !target.is_callable() {
            return Err(RuntimeError::NotCallable { name: target.to_string(),
                                                   line });
        }
        let args = self.eval_arguments(arguments)?;
        self.call_value(&target, args, line)
    }

    fn call_by_name(&mut self, name: &str, arguments: &[Expr], line: usize) -> EvalResult<Value> {
        let bound = self.env.get(name).cloned();

        if let Some(user @ (Value::Function(_) | Value::Lambda(_))) = &bound {
            let args = self.eval_arguments(arguments)?;
            return self.call_value(user, args, line);
        }

        if let Some(builtin) = lookup_builtin(name) {
            return self.call_builtin(builtin, arguments, line);
        }

        match bound {
            Some(native @ Value::Native(_)) => {
                let args = self.eval_arguments(arguments)?;
                self.call_value(&native, args, line)
            },
            Some(_) => Err(RuntimeError::NotCallable { name: name.to_string(),
                                                       line }),
            None => Err(RuntimeError::FunctionNotFound { name: name.to_string(),
                                                         line }),
        }
    }

    /// Calls a callable value with already evaluated arguments.
    ///
    /// # Example
    /// ```
    /// use puffing::{
    ///     execute,
    ///     interpreter::{
    ///         config::InterpreterConfig, evaluator::core::Interpreter, value::core::Value,
    ///     },
    /// };
    ///
    /// let run = execute("let twice as lamb (x) => x * 2;").unwrap();
    /// let (_, twice) = run.bindings.into_iter().find(|(name, _)| name == "twice").unwrap();
    ///
    /// let mut interpreter = Interpreter::new(InterpreterConfig::default());
    /// let result = interpreter.call_value(&twice, vec![Value::Integer(21)], 1).unwrap();
    /// assert_eq!(result, Value::Integer(42));
    /// ```
    pub fn call_value(&mut self,
                      callee: &Value,
                      args: Vec<Value>,
                      line: usize)
                      -> EvalResult<Value> {
        match callee {
            Value::Function(decl) => {
                self.invoke(&decl.name, &decl.params, Body::Block(&decl.body), args, line)
            },
            Value::Lambda(decl) => {
                let body = match &decl.body {
                    LambdaBody::Expression(expr) => Body::Expression(expr),
                    LambdaBody::Block(block) => Body::Block(block),
                };
                self.invoke("lambda", &decl.params, body, args, line)
            },
            Value::Native(native) => {
                if !native.arity.check(args.len()) {
                    return Err(native.arity.mismatch(native.name, args.len(), line));
                }
                trace!(native = native.name, args = args.len(), "calling native");
                (native.func)(&args, line)
            },
            other => Err(RuntimeError::NotCallable { name: other.to_string(),
                                                     line }),
        }
    }

    /// Runs a user-defined body against a snapshot of the environment.
    ///
    /// Parameters are bound over the caller's bindings, the body runs, and
    /// the caller's bindings are put back whether the body succeeded or
    /// failed.
    fn invoke(&mut self,
              name: &str,
              params: &[String],
              body: Body<'_>,
              args: Vec<Value>,
              line: usize)
              -> EvalResult<Value> {
        if args.len() != params.len() {
            return Err(Arity::Exact(params.len()).mismatch(name, args.len(), line));
        }
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::RecursionTooDeep { limit: self.config.max_call_depth,
                                                        line });
        }

        let saved = self.env.snapshot();
        for (param, arg) in params.iter().zip(args) {
            self.env.define(param, arg);
        }

        self.depth += 1;
        trace!(function = name, depth = self.depth, "entering call");
        let outcome = match body {
            Body::Block(block) => self.exec_block(block),
            Body::Expression(expr) => self.eval(expr).map(Flow::Normal),
        };
        self.depth -= 1;
        self.env.restore(saved);

        match outcome? {
            Flow::Normal(value) | Flow::Return { value, .. } => Ok(value),
            Flow::Break { line } => Err(RuntimeError::BreakOutsideLoop { line }),
            Flow::Continue { line } => Err(RuntimeError::ContinueOutsideLoop { line }),
        }
    }
}
