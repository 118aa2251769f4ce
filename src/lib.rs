//! # puffing
//!
//! Puffing is a small dynamically typed scripting language. This crate lexes,
//! parses and evaluates Puffing programs with a tree-walking interpreter that
//! supports integers, floats, text, booleans, shared arrays, maps and sets,
//! first-class functions and lambdas, and importable math and text libraries.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use tracing::debug;

use crate::{
    ast::Block,
    error::{LexError, ParseError},
    interpreter::{
        config::InterpreterConfig, evaluator::core::Interpreter, lexer::SpannedToken,
        parser::core::parse_program, value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Stmt` enums and related types that
/// represent the syntactic structure of source code as a tree. The AST is
/// built by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches the source line to every node for error reporting.
/// - Shares function and lambda declarations with the runtime values that
///   hold them.
pub mod ast;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// This module defines all errors that can be raised while running code. It
/// standardizes error reporting and carries detailed information about
/// failures, including error kinds, descriptions, and source locations.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Wraps the three categories in one [`Error`] for the composed pipeline.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations, libraries and configuration to provide a complete runtime
/// for Puffing programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides reusable helpers and conversion routines that are used
/// throughout the interpreter, parser, and evaluator. These include safe
/// conversions between integer and floating-point types, 1-based index
/// normalization and the printed form of floats.
///
/// # Responsibilities
/// - Safely convert between `i64`, `usize`, and `f64` without silent data
///   loss.
/// - Provide general utility functions used in multiple modules.
pub mod util;

pub use error::Error;

/// Splits source text into tokens.
///
/// The returned list always ends with an end-of-input token.
///
/// # Errors
/// The first [`LexError`] in the source.
///
/// # Example
/// ```
/// use puffing::tokenize;
///
/// let tokens = tokenize("print(1);").unwrap();
/// assert_eq!(tokens.len(), 6);
///
/// assert!(tokenize("let s as \"open;").is_err());
/// ```
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    debug!(bytes = source.len(), "lexing");
    let tokens = interpreter::lexer::tokenize(source)?;
    debug!(tokens = tokens.len(), "lexing finished");
    Ok(tokens)
}

/// Builds the syntax tree of a program from its tokens.
///
/// # Errors
/// The first [`ParseError`] in the token stream.
///
/// # Example
/// ```
/// use puffing::{parse, tokenize};
///
/// let program = parse(&tokenize("let x as 1; x++;").unwrap()).unwrap();
/// assert_eq!(program.len(), 2);
///
/// assert!(parse(&tokenize("let as 1;").unwrap()).is_err());
/// ```
pub fn parse(tokens: &[SpannedToken]) -> Result<Block, ParseError> {
    debug!(tokens = tokens.len(), "parsing");
    let program = parse_program(&mut tokens.iter().peekable())?;
    debug!(statements = program.len(), "parsing finished");
    Ok(program)
}

/// The outcome of a successful run.
#[derive(Debug, Clone)]
pub struct Execution {
    /// The value of the last top-level statement, `none` for an empty program.
    pub value:    Value,
    /// Everything the program printed, in order.
    pub output:   String,
    /// The final bindings, sorted by name.
    pub bindings: Vec<(String, Value)>,
}

/// Lexes, parses and runs a program with the default configuration.
///
/// Input for `input(...)` is read from stdin and printed text is captured in
/// [`Execution::output`] without being echoed.
///
/// # Errors
/// The first lexical, syntax or runtime error, wrapped in [`Error`].
///
/// # Examples
/// ```
/// use puffing::execute;
///
/// let run = execute("let x as 5; let y as 10; print(x + y * 2);").unwrap();
/// assert_eq!(run.output, "25");
///
/// // Integer overflow is an error, not a wrap-around.
/// assert!(execute("let big as 9223372036854775807; big++;").is_err());
/// ```
pub fn execute(source: &str) -> Result<Execution, Error> {
    execute_with(source, InterpreterConfig::default())
}

/// Lexes, parses and runs a program with the given configuration.
///
/// # Errors
/// The first lexical, syntax or runtime error, wrapped in [`Error`].
///
/// # Example
/// ```
/// use puffing::{Error, error::RuntimeError, execute_with, interpreter::config::InterpreterConfig};
///
/// let config = InterpreterConfig::default().with_max_call_depth(10);
/// let err = execute_with("fun f(n) { return f(n + 1); } f(0);", config).unwrap_err();
///
/// assert!(matches!(err, Error::Runtime(RuntimeError::RecursionTooDeep { limit: 10, .. })));
/// ```
pub fn execute_with(source: &str, config: InterpreterConfig) -> Result<Execution, Error> {
    let tokens = tokenize(source)?;
    let program = parse(&tokens)?;

    let mut interpreter = Interpreter::new(config);
    let value = interpreter.run(&program)?;

    Ok(Execution { value,
                   output: interpreter.output().to_string(),
                   bindings: interpreter.bindings() })
}
